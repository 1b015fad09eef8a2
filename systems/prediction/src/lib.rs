#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Look-ahead system that projects a board forward without touching the source board.
//!
//! Projection clones the board, resolves the prospective batch on the clone
//! and reclassifies its territory. The source board is only ever borrowed
//! immutably, so projections can run alongside normal play.

use craftsmen_core::{ActionBatch, Event, Score, ScoreCoefficients};
use craftsmen_system_scoring::compute_points;
use craftsmen_system_territory::TerritoryClassifier;
use craftsmen_world::{apply_batch, Board};
use tracing::debug;

/// Board projected one turn ahead together with its score and resolution events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    /// Independent copy of the board after the prospective turn.
    pub board: Board,
    /// Scores of the projected board.
    pub score: Score,
    /// One event per action of the prospective batch.
    pub events: Vec<Event>,
}

impl Projection {
    /// Number of prospective actions that would be dropped.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, Event::ActionRejected { .. }))
            .count()
    }
}

/// Prediction system that keeps its territory scratch buffers between calls.
#[derive(Debug, Default)]
pub struct Predictor {
    classifier: TerritoryClassifier,
}

impl Predictor {
    /// Creates a predictor with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the board that would result from resolving `batch` on `board`.
    #[must_use]
    pub fn project(&mut self, board: &Board, batch: &ActionBatch) -> Board {
        let mut events = Vec::with_capacity(batch.len());
        self.project_into(board, batch, &mut events)
    }

    /// Projects the board and scores the result with the provided coefficients.
    #[must_use]
    pub fn project_scored(
        &mut self,
        board: &Board,
        batch: &ActionBatch,
        coeffs: &ScoreCoefficients,
    ) -> Projection {
        let mut events = Vec::with_capacity(batch.len());
        let projected = self.project_into(board, batch, &mut events);
        let score = compute_points(&projected, coeffs);
        Projection {
            board: projected,
            score,
            events,
        }
    }

    fn project_into(
        &mut self,
        board: &Board,
        batch: &ActionBatch,
        events: &mut Vec<Event>,
    ) -> Board {
        let mut projected = board.clone();
        apply_batch(&mut projected, batch, events);
        self.classifier.recompute(&mut projected);
        debug!(actions = batch.len(), events = events.len(), "board projected");
        projected
    }
}

/// Projects a board with a throwaway predictor.
#[must_use]
pub fn project(board: &Board, batch: &ActionBatch) -> Board {
    Predictor::new().project(board, batch)
}
