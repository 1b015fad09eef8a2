#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state and action resolution for the craftsmen engine.

mod units;

use craftsmen_core::{
    Action, ActionBatch, ActionKind, BoundsError, Cell, Event, Position, Rejection, Side,
    TerrainKind, TerritoryState, UnitId, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH,
};
use thiserror::Error;
use tracing::{debug, trace};

pub use units::Unit;
use units::Roster;

/// Reasons a unit cannot be placed on or moved around the board directly.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The destination lies outside the board.
    #[error(transparent)]
    OutOfBounds(#[from] BoundsError),
    /// Another unit already stands on the destination.
    #[error("position {0} is already occupied")]
    Occupied(Position),
    /// A unit with the same identifier is already on the board.
    #[error("unit {0} is already on the board")]
    DuplicateUnit(UnitId),
    /// No unit with the identifier exists.
    #[error("unit {0} is not on the board")]
    UnknownUnit(UnitId),
}

/// Grid of cells plus the craftsmen standing on it.
///
/// Cells are stored row-major. Cloning produces a fully independent copy,
/// so a projection never touches the board it was taken from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    units: Roster,
}

impl Board {
    /// Creates a board covered in neutral ground with no units.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![Cell::default(); capacity],
            units: Roster::default(),
        }
    }

    /// Creates the empty board shown before any snapshot arrives.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BOARD_WIDTH, DEFAULT_BOARD_HEIGHT)
    }

    /// Builds a board from a snapshot layout.
    ///
    /// Castles are laid first and ponds second, so a position listed in both
    /// ends up as a pond. Units are placed in order after the terrain.
    pub fn from_layout<P, C, U>(
        width: u32,
        height: u32,
        ponds: P,
        castles: C,
        units: U,
    ) -> Result<Self, PlacementError>
    where
        P: IntoIterator<Item = Position>,
        C: IntoIterator<Item = Position>,
        U: IntoIterator<Item = Unit>,
    {
        let mut board = Self::new(width, height);
        for castle in castles {
            board.set_terrain(castle, TerrainKind::Castle)?;
        }
        for pond in ponds {
            board.set_terrain(pond, TerrainKind::Pond)?;
        }
        for unit in units {
            board.place_unit(unit)?;
        }
        Ok(board)
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Board dimensions as `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Reports whether the position lies within the board.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x() < self.width && position.y() < self.height
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Every position on the board in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Contents of the cell at `position`.
    pub fn cell(&self, position: Position) -> Result<Cell, BoundsError> {
        self.index(position)
            .map(|index| self.cells[index])
            .ok_or_else(|| self.bounds_error(position))
    }

    /// Terrain covering the cell at `position`.
    pub fn terrain_at(&self, position: Position) -> Result<TerrainKind, BoundsError> {
        self.cell(position).map(|cell| cell.terrain)
    }

    /// Territory claim recorded on the cell at `position`.
    pub fn territory_at(&self, position: Position) -> Result<TerritoryState, BoundsError> {
        self.cell(position).map(|cell| cell.territory)
    }

    /// Replaces the terrain of the cell at `position`.
    ///
    /// This is the layout entry point used when building a board from a
    /// snapshot; turn resolution goes through [`apply_batch`].
    pub fn set_terrain(
        &mut self,
        position: Position,
        kind: TerrainKind,
    ) -> Result<(), BoundsError> {
        let index = self
            .index(position)
            .ok_or_else(|| self.bounds_error(position))?;
        self.cells[index].terrain = kind;
        Ok(())
    }

    /// Rewrites every cell's territory claim.
    ///
    /// `classify` receives each position with its current cell and returns the
    /// new claim. Terrain is left untouched.
    pub fn update_territory<F>(&mut self, mut classify: F)
    where
        F: FnMut(Position, Cell) -> TerritoryState,
    {
        let width = usize::try_from(self.width).unwrap_or(0);
        if width == 0 {
            return;
        }
        for (index, cell) in self.cells.iter_mut().enumerate() {
            let (Ok(x), Ok(y)) = (u32::try_from(index % width), u32::try_from(index / width))
            else {
                continue;
            };
            cell.territory = classify(Position::new(x, y), *cell);
        }
    }

    /// Units in the order they were placed.
    #[must_use]
    pub fn units(&self) -> &[Unit] {
        self.units.as_slice()
    }

    /// Units belonging to `side`.
    pub fn units_of(&self, side: Side) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |unit| unit.side() == side)
    }

    /// Unit with the provided identifier.
    #[must_use]
    pub fn unit(&self, id: &UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    /// Identifier of the unit standing at `position`, if any.
    #[must_use]
    pub fn unit_at(&self, position: Position) -> Option<&UnitId> {
        self.units.at(position).map(Unit::id)
    }

    /// Puts a new unit on the board.
    pub fn place_unit(&mut self, unit: Unit) -> Result<(), PlacementError> {
        if !self.contains(unit.position()) {
            return Err(self.bounds_error(unit.position()).into());
        }
        if self.units.get(unit.id()).is_some() {
            return Err(PlacementError::DuplicateUnit(unit.id().clone()));
        }
        if self.units.at(unit.position()).is_some() {
            return Err(PlacementError::Occupied(unit.position()));
        }
        self.units.push(unit);
        Ok(())
    }

    /// Relocates a unit without applying any terrain rule.
    pub fn move_unit(&mut self, id: &UnitId, to: Position) -> Result<(), PlacementError> {
        if !self.contains(to) {
            return Err(self.bounds_error(to).into());
        }
        match self.units.at(to) {
            Some(occupant) if occupant.id() != id => return Err(PlacementError::Occupied(to)),
            _ => {}
        }
        if self.units.relocate(id, to) {
            Ok(())
        } else {
            Err(PlacementError::UnknownUnit(id.clone()))
        }
    }

    /// Clears every unit's played flag ahead of a new turn.
    pub fn begin_turn(&mut self) {
        self.units.clear_played(None);
    }

    /// Selects the next unit of `side` that has not played yet and marks it played.
    ///
    /// Once every unit of the side has played the side's flags are cleared and
    /// selection starts over from the first unit.
    pub fn next_unplayed(&mut self, side: Side) -> Option<UnitId> {
        let pending = |board: &Self| {
            board
                .units_of(side)
                .find(|unit| !unit.played())
                .map(|unit| unit.id().clone())
        };

        let chosen = match pending(self) {
            Some(id) => id,
            None => {
                self.units.clear_played(Some(side));
                pending(self)?
            }
        };
        self.units.mark_played(&chosen);
        Some(chosen)
    }

    fn index(&self, position: Position) -> Option<usize> {
        if self.contains(position) {
            let row = usize::try_from(position.y()).ok()?;
            let column = usize::try_from(position.x()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }

    fn bounds_error(&self, position: Position) -> BoundsError {
        BoundsError {
            position,
            width: self.width,
            height: self.height,
        }
    }

    fn target_of(
        &self,
        origin: Position,
        kind: ActionKind,
    ) -> Result<(Position, usize), Rejection> {
        let delta = kind.delta().ok_or(Rejection::IllegalTarget)?;
        let target = origin.offset(delta).ok_or(Rejection::OutOfBounds)?;
        let index = self.index(target).ok_or(Rejection::OutOfBounds)?;
        Ok((target, index))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Resolution pass an action belongs to. Passes run in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    Destroy,
    Build,
    Move,
}

impl Pass {
    const ORDER: [Pass; 3] = [Pass::Destroy, Pass::Build, Pass::Move];

    fn admits(self, kind: ActionKind) -> bool {
        matches!(
            (self, kind),
            (Pass::Destroy, ActionKind::Destroy(_))
                | (Pass::Build, ActionKind::Build(_))
                | (Pass::Move, ActionKind::Move(_))
        )
    }
}

/// Applies one turn's batch to the board.
///
/// Every action naming a known unit marks it played. Destroys resolve first,
/// then builds, then moves, each in batch order. Illegal actions are dropped
/// without affecting the rest of the batch; exactly one [`Event`] is pushed
/// per submitted action describing what happened to it.
pub fn apply_batch(board: &mut Board, batch: &ActionBatch, out_events: &mut Vec<Event>) {
    for action in batch {
        if board.unit(&action.unit).is_none() {
            reject(action, Rejection::UnknownUnit, out_events);
            continue;
        }
        board.units.mark_played(&action.unit);
        if action.kind == ActionKind::Stay {
            accept(action, out_events);
        }
    }

    for pass in Pass::ORDER {
        for action in batch.iter().filter(|action| pass.admits(action.kind)) {
            let Some(unit) = board.unit(&action.unit) else {
                continue;
            };
            let (side, origin) = (unit.side(), unit.position());

            let outcome = match action.kind {
                ActionKind::Destroy(_) => destroy(board, origin, action.kind),
                ActionKind::Build(_) => build(board, side, origin, action.kind),
                ActionKind::Move(_) => step(board, &action.unit, side, origin, action.kind),
                ActionKind::Stay => Ok(()),
            };

            match outcome {
                Ok(()) => accept(action, out_events),
                Err(rejection) => reject(action, rejection, out_events),
            }
        }
    }
}

fn destroy(board: &mut Board, origin: Position, kind: ActionKind) -> Result<(), Rejection> {
    let (_, index) = board.target_of(origin, kind)?;
    let cell = &mut board.cells[index];
    if !cell.terrain.is_wall() {
        return Err(Rejection::IllegalTarget);
    }
    cell.terrain = TerrainKind::Neutral;
    Ok(())
}

fn build(
    board: &mut Board,
    side: Side,
    origin: Position,
    kind: ActionKind,
) -> Result<(), Rejection> {
    let (target, index) = board.target_of(origin, kind)?;
    if board.units.at(target).is_some() {
        return Err(Rejection::IllegalTarget);
    }
    let cell = &mut board.cells[index];
    if cell.terrain != TerrainKind::Neutral {
        return Err(Rejection::IllegalTarget);
    }
    cell.terrain = TerrainKind::wall_of(side);
    Ok(())
}

fn step(
    board: &mut Board,
    unit: &UnitId,
    side: Side,
    origin: Position,
    kind: ActionKind,
) -> Result<(), Rejection> {
    let (target, index) = board.target_of(origin, kind)?;
    if board.units.at(target).is_some() {
        return Err(Rejection::IllegalTarget);
    }
    if !board.cells[index].terrain.is_passable_for(side) {
        return Err(Rejection::IllegalTarget);
    }
    if board.units.relocate(unit, target) {
        Ok(())
    } else {
        Err(Rejection::UnknownUnit)
    }
}

fn accept(action: &Action, out_events: &mut Vec<Event>) {
    trace!(unit = %action.unit, kind = ?action.kind, "action applied");
    out_events.push(Event::ActionApplied {
        unit: action.unit.clone(),
        kind: action.kind,
    });
}

fn reject(action: &Action, rejection: Rejection, out_events: &mut Vec<Event>) {
    debug!(unit = %action.unit, kind = ?action.kind, %rejection, "action rejected");
    out_events.push(Event::ActionRejected {
        unit: action.unit.clone(),
        kind: action.kind,
        rejection,
    });
}

/// Query functions that provide read-only access to the board.
pub mod query {
    use std::collections::BTreeMap;

    use super::Board;
    use craftsmen_core::{Position, UnitId};

    /// Captures every unit's position keyed by identifier.
    #[must_use]
    pub fn unit_positions(board: &Board) -> BTreeMap<UnitId, Position> {
        board
            .units()
            .iter()
            .map(|unit| (unit.id().clone(), unit.position()))
            .collect()
    }

    /// Reports whether the position lies on the outer ring of the board.
    #[must_use]
    pub fn on_edge(board: &Board, position: Position) -> bool {
        position.x() == 0
            || position.y() == 0
            || position.x().saturating_add(1) == board.width()
            || position.y().saturating_add(1) == board.height()
    }
}
