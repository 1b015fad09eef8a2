//! Turn log records and replay.

use std::collections::BTreeMap;

use craftsmen_core::{Event, Side};
use craftsmen_system_territory::TerritoryClassifier;
use craftsmen_world::{apply_batch, Board};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actions::{decode_batch, ChildAction};

/// Actions submitted for one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnActions {
    /// Turn the actions are addressed to.
    pub turn: u32,
    /// Submitted actions.
    #[serde(default)]
    pub actions: Vec<ChildAction>,
}

/// Replays a server log onto the board.
///
/// The log may hold several records for the same turn; only the last one
/// counts. Turns are resolved in ascending order up to and including
/// `through_turn` (every turn when `None`), each followed by a territory
/// recomputation. Events of every resolved action are appended to
/// `out_events`. Returns the number of turns resolved.
pub fn replay(
    board: &mut Board,
    log: &[TurnActions],
    through_turn: Option<u32>,
    out_events: &mut Vec<Event>,
) -> usize {
    let mut latest = BTreeMap::new();
    for record in log {
        if through_turn.map_or(true, |last| record.turn <= last) {
            let _ = latest.insert(record.turn, record);
        }
    }

    let mut classifier = TerritoryClassifier::new();
    for (turn, record) in &latest {
        board.begin_turn();
        let batch = decode_batch(&record.actions);
        let first_event = out_events.len();
        apply_batch(board, &batch, out_events);
        classifier.recompute(board);
        debug!(
            turn,
            actions = batch.len(),
            events = out_events.len() - first_event,
            "turn replayed"
        );
    }
    latest.len()
}

/// Turn a side's next submission must be addressed to.
///
/// Submissions target the turn after `current_turn`. Side A plays even turns
/// and side B odd turns, so the target is pushed back by one when its parity
/// belongs to the opponent.
#[must_use]
pub const fn submission_turn(current_turn: u32, side: Side) -> u32 {
    let next = current_turn.saturating_add(1);
    let even = next % 2 == 0;
    match (side, even) {
        (Side::A, true) | (Side::B, false) => next,
        _ => next.saturating_add(1),
    }
}
