//! Starting layout published by the game service.

use craftsmen_core::{
    Position, ScoreCoefficients, Side, UnitId, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH,
};
use craftsmen_world::{Board, PlacementError, Unit};
use serde::{de::DeserializeOwned, de::Error as _, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors raised while turning a snapshot into a board.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot text is not a valid field document.
    #[error("could not parse field snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// A coordinate cannot be represented on any board.
    #[error("coordinate ({x}, {y}) is negative or too large")]
    InvalidCoordinate {
        /// Column as sent by the service.
        x: i64,
        /// Row as sent by the service.
        y: i64,
    },
    /// The layout does not fit the declared board.
    #[error(transparent)]
    Layout(#[from] PlacementError),
}

/// Bare coordinate used for ponds and castles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointResp {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

impl PointResp {
    fn to_position(self) -> Result<Position, SnapshotError> {
        position(self.x, self.y)
    }
}

/// Craftsman entry of a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftsmanResp {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
    /// Owning side.
    pub side: Side,
    /// Identifier used by action submissions.
    pub id: UnitId,
}

impl CraftsmanResp {
    fn to_unit(&self) -> Result<Unit, SnapshotError> {
        Ok(Unit::new(self.id.clone(), self.side, position(self.x, self.y)?))
    }
}

/// Field snapshot describing board size, scoring and the initial layout.
///
/// The service encodes the three layout lists as strings holding a JSON
/// array; plain arrays are accepted as well. Missing or `null` entries fall
/// back to the [`Default`] field: an empty 25x25 board with the standard
/// coefficients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldDocument")]
pub struct Field {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Points for each claimed castle cell.
    pub castle_coeff: i64,
    /// Points for each wall cell.
    pub wall_coeff: i64,
    /// Points for each claimed non-castle cell.
    pub territory_coeff: i64,
    /// Pond cells.
    pub ponds: Vec<PointResp>,
    /// Castle cells.
    pub castles: Vec<PointResp>,
    /// Craftsmen on both sides.
    pub craftsmen: Vec<CraftsmanResp>,
}

/// Field as it appears on the wire, every entry optional.
#[derive(Deserialize)]
struct FieldDocument {
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    castle_coeff: Option<i64>,
    #[serde(default)]
    wall_coeff: Option<i64>,
    #[serde(default)]
    territory_coeff: Option<i64>,
    #[serde(default, deserialize_with = "embedded_list")]
    ponds: Vec<PointResp>,
    #[serde(default, deserialize_with = "embedded_list")]
    castles: Vec<PointResp>,
    #[serde(default, deserialize_with = "embedded_list")]
    craftsmen: Vec<CraftsmanResp>,
}

impl From<FieldDocument> for Field {
    fn from(document: FieldDocument) -> Self {
        let fallback = Self::default();
        Self {
            width: document.width.unwrap_or(fallback.width),
            height: document.height.unwrap_or(fallback.height),
            castle_coeff: document.castle_coeff.unwrap_or(fallback.castle_coeff),
            wall_coeff: document.wall_coeff.unwrap_or(fallback.wall_coeff),
            territory_coeff: document.territory_coeff.unwrap_or(fallback.territory_coeff),
            ponds: document.ponds,
            castles: document.castles,
            craftsmen: document.craftsmen,
        }
    }
}

impl Field {
    /// Parses a snapshot document.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Scoring coefficients announced by the snapshot.
    #[must_use]
    pub const fn coefficients(&self) -> ScoreCoefficients {
        ScoreCoefficients {
            castle: self.castle_coeff,
            wall: self.wall_coeff,
            territory: self.territory_coeff,
        }
    }

    /// Builds the starting board described by the snapshot.
    pub fn to_board(&self) -> Result<Board, SnapshotError> {
        let ponds = self
            .ponds
            .iter()
            .map(|point| point.to_position())
            .collect::<Result<Vec<_>, _>>()?;
        let castles = self
            .castles
            .iter()
            .map(|point| point.to_position())
            .collect::<Result<Vec<_>, _>>()?;
        let units = self
            .craftsmen
            .iter()
            .map(CraftsmanResp::to_unit)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Board::from_layout(self.width, self.height, ponds, castles, units)?)
    }
}

impl Default for Field {
    fn default() -> Self {
        let coeffs = ScoreCoefficients::default();
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            castle_coeff: coeffs.castle,
            wall_coeff: coeffs.wall,
            territory_coeff: coeffs.territory,
            ponds: Vec::new(),
            castles: Vec::new(),
            craftsmen: Vec::new(),
        }
    }
}

fn position(x: i64, y: i64) -> Result<Position, SnapshotError> {
    match (u32::try_from(x), u32::try_from(y)) {
        (Ok(column), Ok(row)) => Ok(Position::new(column, row)),
        _ => Err(SnapshotError::InvalidCoordinate { x, y }),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Embedded<T> {
    List(Vec<T>),
    Encoded(String),
}

fn embedded_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Embedded<T>>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Embedded::List(items)) => Ok(items),
        Some(Embedded::Encoded(text)) if text.trim().is_empty() => Ok(Vec::new()),
        Some(Embedded::Encoded(text)) => serde_json::from_str(&text).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftsmen_core::TerrainKind;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let field = Field::from_json("{}").expect("empty document");
        assert_eq!(field, Field::default());
        assert_eq!(field.coefficients(), ScoreCoefficients::default());
    }

    #[test]
    fn null_scalars_fall_back_to_defaults() {
        let field = Field::from_json(
            r#"{"width": null, "height": 7, "castle_coeff": null,
                "wall_coeff": 3, "territory_coeff": null}"#,
        )
        .expect("field");
        assert_eq!(field.width, DEFAULT_BOARD_WIDTH);
        assert_eq!(field.height, 7);
        assert_eq!(
            field.coefficients(),
            ScoreCoefficients {
                castle: 10,
                wall: 3,
                territory: 1,
            }
        );
    }

    #[test]
    fn null_lists_are_empty() {
        let field =
            Field::from_json(r#"{"width": 3, "height": 3, "ponds": null, "castles": ""}"#)
                .expect("field");
        assert!(field.ponds.is_empty());
        assert!(field.castles.is_empty());
    }

    #[test]
    fn negative_coordinates_are_rejected() {
        let field = Field {
            width: 3,
            height: 3,
            ponds: vec![PointResp { x: -1, y: 0 }],
            ..Field::default()
        };
        assert!(matches!(
            field.to_board(),
            Err(SnapshotError::InvalidCoordinate { x: -1, y: 0 })
        ));
    }

    #[test]
    fn out_of_bounds_layouts_are_rejected() {
        let field = Field {
            width: 3,
            height: 3,
            castles: vec![PointResp { x: 3, y: 0 }],
            ..Field::default()
        };
        assert!(matches!(
            field.to_board(),
            Err(SnapshotError::Layout(PlacementError::OutOfBounds(_)))
        ));
    }

    #[test]
    fn castles_are_laid_before_ponds() {
        let field = Field {
            width: 3,
            height: 3,
            ponds: vec![PointResp { x: 1, y: 1 }],
            castles: vec![PointResp { x: 1, y: 1 }],
            ..Field::default()
        };
        let board = field.to_board().expect("board");
        assert_eq!(board.terrain_at(Position::new(1, 1)), Ok(TerrainKind::Pond));
    }
}
