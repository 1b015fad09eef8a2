#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Territory classifier that derives closed and open claims from wall enclosures.
//!
//! For each side a cell is enclosed when, treating the side's own walls as
//! absorbing boundaries, no orthogonal path reaches the outer ring of the
//! board. Opposing walls, ponds and castles do not stop the fill. The per-side
//! results then drive a one-way state update: fresh enclosures become closed
//! claims, and breached closed claims decay to open claims.

mod enclosure;

use craftsmen_core::{Position, Side, TerrainKind, TerritoryState};
use craftsmen_world::Board;
use tracing::debug;

use enclosure::EnclosureField;

/// Territory classification system that reuses its fill buffers between turns.
#[derive(Debug, Default)]
pub struct TerritoryClassifier {
    field_a: EnclosureField,
    field_b: EnclosureField,
}

impl TerritoryClassifier {
    /// Creates a classifier with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every cell's territory claim on the board.
    pub fn recompute(&mut self, board: &mut Board) {
        let (width, height) = board.dimensions();
        {
            let cells = board.cells();
            let terrain = |cell: Position| -> TerrainKind {
                let index = u64::from(cell.y()) * u64::from(width) + u64::from(cell.x());
                usize::try_from(index)
                    .ok()
                    .and_then(|index| cells.get(index))
                    .map_or(TerrainKind::Neutral, |cell| cell.terrain)
            };
            self.field_a
                .rebuild_with(width, height, |cell| terrain(cell) == TerrainKind::WallA);
            self.field_b
                .rebuild_with(width, height, |cell| terrain(cell) == TerrainKind::WallB);
        }

        let (field_a, field_b) = (&self.field_a, &self.field_b);
        let mut tally = Tally::default();
        board.update_territory(|position, cell| {
            let state = next_state(
                cell.territory,
                cell.terrain,
                field_a.is_enclosed(position),
                field_b.is_enclosed(position),
            );
            tally.count(state);
            state
        });

        debug!(
            closed_a = tally.closed_a,
            closed_b = tally.closed_b,
            closed_both = tally.closed_both,
            open_a = tally.open_a,
            open_b = tally.open_b,
            "territory recomputed"
        );
    }
}

/// Recomputes territory with a throwaway classifier.
pub fn recompute(board: &mut Board) {
    TerritoryClassifier::new().recompute(board);
}

/// Derives a cell's next claim from its previous claim and fresh enclosure results.
///
/// A side's own wall never counts as that side's territory, so the owner's
/// enclosure flag is ignored on wall cells and any leftover claim by the owner
/// is dropped.
#[must_use]
pub fn next_state(
    previous: TerritoryState,
    terrain: TerrainKind,
    enclosed_a: bool,
    enclosed_b: bool,
) -> TerritoryState {
    let enclosed_a = enclosed_a && terrain != TerrainKind::WallA;
    let enclosed_b = enclosed_b && terrain != TerrainKind::WallB;

    let state = match (enclosed_a, enclosed_b) {
        (true, true) => TerritoryState::ClosedBoth,
        (true, false) => TerritoryState::ClosedA,
        (false, true) => TerritoryState::ClosedB,
        (false, false) => match previous {
            TerritoryState::ClosedA => TerritoryState::OpenA,
            TerritoryState::ClosedB => TerritoryState::OpenB,
            unchanged => unchanged,
        },
    };

    match terrain.wall_owner() {
        Some(owner) => strip_claim(state, owner),
        None => state,
    }
}

fn strip_claim(state: TerritoryState, owner: Side) -> TerritoryState {
    if !state.claims(owner) {
        return state;
    }
    match state {
        TerritoryState::ClosedBoth => TerritoryState::closed_by(owner.opponent()),
        _ => TerritoryState::None,
    }
}

#[derive(Debug, Default)]
struct Tally {
    closed_a: usize,
    closed_b: usize,
    closed_both: usize,
    open_a: usize,
    open_b: usize,
}

impl Tally {
    fn count(&mut self, state: TerritoryState) {
        match state {
            TerritoryState::None => {}
            TerritoryState::OpenA => self.open_a += 1,
            TerritoryState::OpenB => self.open_b += 1,
            TerritoryState::ClosedA => self.closed_a += 1,
            TerritoryState::ClosedB => self.closed_b += 1,
            TerritoryState::ClosedBoth => self.closed_both += 1,
        }
    }
}
