#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring system that tallies walls, claimed ground and castles.

use craftsmen_core::{Cell, Score, ScoreCoefficients, Side, TerrainKind};
use craftsmen_world::Board;

/// Computes both sides' scores for a classified board.
///
/// Every wall is worth `coeffs.wall` to its owner. Every cell whose territory
/// claims a side is worth `coeffs.castle` (castles) or `coeffs.territory`
/// (anything else) to that side. Both claims are evaluated independently, so a
/// single cell may score for both sides, including a wall counted for its
/// owner and as enclosed ground for the opponent.
#[must_use]
pub fn compute_points(board: &Board, coeffs: &ScoreCoefficients) -> Score {
    board
        .cells()
        .iter()
        .fold(Score::default(), |mut score, cell| {
            score_cell(cell, coeffs, &mut score);
            score
        })
}

fn score_cell(cell: &Cell, coeffs: &ScoreCoefficients, score: &mut Score) {
    if let Some(owner) = cell.terrain.wall_owner() {
        score.award(owner, coeffs.wall);
    }

    let claim_value = if cell.terrain == TerrainKind::Castle {
        coeffs.castle
    } else {
        coeffs.territory
    };
    for side in Side::BOTH {
        if cell.territory.claims(side) {
            score.award(side, claim_value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftsmen_core::TerritoryState;

    fn scored(cell: Cell) -> Score {
        let mut score = Score::default();
        score_cell(&cell, &ScoreCoefficients::default(), &mut score);
        score
    }

    #[test]
    fn walls_score_regardless_of_territory() {
        assert_eq!(scored(Cell::with_terrain(TerrainKind::WallA)), Score { a: 1, b: 0 });
        assert_eq!(scored(Cell::with_terrain(TerrainKind::WallB)), Score { a: 0, b: 1 });
    }

    #[test]
    fn closed_both_castle_scores_for_each_side() {
        let cell = Cell {
            terrain: TerrainKind::Castle,
            territory: TerritoryState::ClosedBoth,
        };
        assert_eq!(scored(cell), Score { a: 10, b: 10 });
    }

    #[test]
    fn open_claims_keep_scoring() {
        let cell = Cell {
            terrain: TerrainKind::Neutral,
            territory: TerritoryState::OpenB,
        };
        assert_eq!(scored(cell), Score { a: 0, b: 1 });
    }

    #[test]
    fn unclaimed_ground_scores_nothing() {
        assert_eq!(scored(Cell::default()), Score::default());
        assert_eq!(scored(Cell::with_terrain(TerrainKind::Pond)), Score::default());
    }
}
