#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the craftsmen territory engine.
//!
//! This crate defines the vocabulary that connects adapters, the authoritative
//! board, and the pure systems. Adapters decode snapshots and submissions into
//! [`Action`] values grouped in an [`ActionBatch`], the world resolves a batch
//! through its `apply_batch` entry point and reports one [`Event`] per
//! submitted action, and systems (territory, scoring, prediction) read the
//! resulting board deterministically.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the board used when no snapshot has been received yet.
pub const DEFAULT_BOARD_WIDTH: u32 = 25;
/// Height of the board used when no snapshot has been received yet.
pub const DEFAULT_BOARD_HEIGHT: u32 = 25;

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new board position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Shifts the position by a unit delta.
    ///
    /// Returns `None` when the result would have a negative coordinate; the
    /// upper bound is the board's concern.
    #[must_use]
    pub fn offset(self, (dx, dy): (i32, i32)) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Self { x, y })
    }

    /// Orthogonal neighbours that remain on a `width` x `height` board.
    pub fn neighbors4(self, width: u32, height: u32) -> impl Iterator<Item = Position> {
        Direction4::ALL
            .into_iter()
            .filter_map(move |direction| self.offset(direction.delta()))
            .filter(move |cell| cell.x < width && cell.y < height)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the two competing players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// First player.
    A,
    /// Second player.
    B,
}

impl Side {
    /// Both sides in canonical order.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// The competing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Ground covering a single cell. Exactly one kind applies at any time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open ground; passable and buildable.
    #[default]
    Neutral,
    /// Castle; passable and worth the castle coefficient when claimed.
    Castle,
    /// Pond; impassable and never created or destroyed by actions.
    Pond,
    /// Wall owned by side A.
    WallA,
    /// Wall owned by side B.
    WallB,
}

impl TerrainKind {
    /// Wall kind built by the provided side.
    #[must_use]
    pub const fn wall_of(side: Side) -> Self {
        match side {
            Side::A => Self::WallA,
            Side::B => Self::WallB,
        }
    }

    /// Side owning the wall, or `None` for non-wall terrain.
    #[must_use]
    pub const fn wall_owner(self) -> Option<Side> {
        match self {
            Self::WallA => Some(Side::A),
            Self::WallB => Some(Side::B),
            Self::Neutral | Self::Castle | Self::Pond => None,
        }
    }

    /// Reports whether the terrain is either side's wall.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        self.wall_owner().is_some()
    }

    /// Reports whether a unit of `side` may stand on this terrain.
    #[must_use]
    pub fn is_passable_for(self, side: Side) -> bool {
        match self {
            Self::Neutral | Self::Castle => true,
            Self::Pond => false,
            Self::WallA | Self::WallB => self.wall_owner() == Some(side),
        }
    }
}

/// Territory claim recorded on a cell after enclosure analysis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerritoryState {
    /// Nobody claims the cell.
    #[default]
    None,
    /// Previously enclosed by A, since breached.
    OpenA,
    /// Previously enclosed by B, since breached.
    OpenB,
    /// Enclosed by A's walls.
    ClosedA,
    /// Enclosed by B's walls.
    ClosedB,
    /// Enclosed by both sides' walls simultaneously.
    ClosedBoth,
}

impl TerritoryState {
    /// Reports whether the state awards the cell to `side` when scoring.
    #[must_use]
    pub const fn claims(self, side: Side) -> bool {
        match side {
            Side::A => matches!(self, Self::ClosedA | Self::OpenA | Self::ClosedBoth),
            Side::B => matches!(self, Self::ClosedB | Self::OpenB | Self::ClosedBoth),
        }
    }

    /// Closed state for a single side.
    #[must_use]
    pub const fn closed_by(side: Side) -> Self {
        match side {
            Side::A => Self::ClosedA,
            Side::B => Self::ClosedB,
        }
    }
}

/// Contents of a single board cell. Units are tracked separately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Ground covering the cell.
    pub terrain: TerrainKind,
    /// Territory claim derived by the classifier.
    pub territory: TerritoryState,
}

impl Cell {
    /// Creates a cell with the provided terrain and no territory claim.
    #[must_use]
    pub const fn with_terrain(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            territory: TerritoryState::None,
        }
    }
}

/// Stable identifier assigned to a craftsman by the game service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    /// Creates a new unit identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the textual representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directions available to a moving craftsman, diagonals included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction8 {
    /// Toward decreasing rows.
    Up,
    /// Toward increasing rows.
    Down,
    /// Toward decreasing columns.
    Left,
    /// Toward increasing columns.
    Right,
    /// Up and left.
    UpperLeft,
    /// Up and right.
    UpperRight,
    /// Down and left.
    LowerLeft,
    /// Down and right.
    LowerRight,
}

impl Direction8 {
    /// Every movement direction.
    pub const ALL: [Direction8; 8] = [
        Direction8::Up,
        Direction8::Down,
        Direction8::Left,
        Direction8::Right,
        Direction8::UpperLeft,
        Direction8::UpperRight,
        Direction8::LowerLeft,
        Direction8::LowerRight,
    ];

    /// Unit `(dx, dy)` step for the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::UpperLeft => (-1, -1),
            Self::UpperRight => (1, -1),
            Self::LowerLeft => (-1, 1),
            Self::LowerRight => (1, 1),
        }
    }
}

/// Orthogonal directions used when building or destroying walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction4 {
    /// The cell above.
    Above,
    /// The cell below.
    Below,
    /// The cell to the left.
    Left,
    /// The cell to the right.
    Right,
}

impl Direction4 {
    /// Every orthogonal direction.
    pub const ALL: [Direction4; 4] = [
        Direction4::Above,
        Direction4::Below,
        Direction4::Left,
        Direction4::Right,
    ];

    /// Unit `(dx, dy)` step for the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Above => (0, -1),
            Self::Below => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// What a craftsman attempts during a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Do nothing, but count as having played.
    Stay,
    /// Step onto a neighbouring cell.
    Move(Direction8),
    /// Raise a wall on an orthogonal neighbour.
    Build(Direction4),
    /// Tear down a wall on an orthogonal neighbour.
    Destroy(Direction4),
}

impl ActionKind {
    /// Offset of the targeted cell, or `None` for [`ActionKind::Stay`].
    #[must_use]
    pub const fn delta(self) -> Option<(i32, i32)> {
        match self {
            Self::Stay => None,
            Self::Move(direction) => Some(direction.delta()),
            Self::Build(direction) | Self::Destroy(direction) => Some(direction.delta()),
        }
    }
}

/// Single craftsman action tagged with the acting unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Action {
    /// Unit performing the action.
    pub unit: UnitId,
    /// Requested action.
    pub kind: ActionKind,
}

impl Action {
    /// Creates a new action for the provided unit.
    #[must_use]
    pub fn new(unit: UnitId, kind: ActionKind) -> Self {
        Self { unit, kind }
    }
}

/// Ordered collection of at most one action per unit, representing one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionBatch {
    actions: Vec<Action>,
}

impl ActionBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an action, replacing any earlier action submitted by the same unit.
    ///
    /// A replacement moves to the end of the batch order.
    pub fn submit(&mut self, action: Action) {
        self.actions.retain(|existing| existing.unit != action.unit);
        self.actions.push(action);
    }

    /// Action currently submitted for the unit, if any.
    #[must_use]
    pub fn get(&self, unit: &UnitId) -> Option<&Action> {
        self.actions.iter().find(|action| &action.unit == unit)
    }

    /// Iterator over the submitted actions in batch order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Number of submitted actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Reports whether nothing was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl FromIterator<Action> for ActionBatch {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut batch = Self::new();
        for action in iter {
            batch.submit(action);
        }
        batch
    }
}

impl<'a> IntoIterator for &'a ActionBatch {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Per-game scoring multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreCoefficients {
    /// Points for each claimed castle cell.
    pub castle: i64,
    /// Points for each wall cell owned.
    pub wall: i64,
    /// Points for each claimed non-castle cell.
    pub territory: i64,
}

impl Default for ScoreCoefficients {
    fn default() -> Self {
        Self {
            castle: 10,
            wall: 1,
            territory: 1,
        }
    }
}

/// Pair of scores produced for a board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    /// Points accumulated by side A.
    pub a: i64,
    /// Points accumulated by side B.
    pub b: i64,
}

impl Score {
    /// Adds points to the provided side, saturating at the `i64` range.
    pub fn award(&mut self, side: Side, points: i64) {
        let slot = match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        };
        *slot = slot.saturating_add(points);
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A:{} B:{}", self.a, self.b)
    }
}

/// Reasons an action is dropped during resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum Rejection {
    /// The targeted cell lies outside the board.
    #[error("target lies outside the board")]
    OutOfBounds,
    /// The targeted cell has the wrong terrain or is occupied.
    #[error("target terrain or occupancy does not allow the action")]
    IllegalTarget,
    /// No unit with the submitted identifier exists on the board.
    #[error("unit is not on the board")]
    UnknownUnit,
}

/// Outcome reported for every action of a resolved batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The action changed the board (or was a stay).
    ActionApplied {
        /// Unit that acted.
        unit: UnitId,
        /// Action that was carried out.
        kind: ActionKind,
    },
    /// The action was dropped without touching the board.
    ActionRejected {
        /// Unit named by the action.
        unit: UnitId,
        /// Action that was requested.
        kind: ActionKind,
        /// Why the action was dropped.
        rejection: Rejection,
    },
}

/// Raised by public accessors when a coordinate falls outside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("position {position} lies outside the {width}x{height} board")]
pub struct BoundsError {
    /// Offending position.
    pub position: Position,
    /// Board width.
    pub width: u32,
    /// Board height.
    pub height: u32,
}
