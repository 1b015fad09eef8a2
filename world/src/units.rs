//! Authoritative craftsman roster.

use craftsmen_core::{Position, Side, UnitId};

/// Craftsman standing on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    side: Side,
    position: Position,
    played: bool,
}

impl Unit {
    /// Creates a unit that has not yet played this turn.
    #[must_use]
    pub fn new(id: UnitId, side: Side, position: Position) -> Self {
        Self {
            id,
            side,
            position,
            played: false,
        }
    }

    /// Identifier assigned by the game service.
    #[must_use]
    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// Side the unit plays for.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Cell the unit currently occupies.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Reports whether the unit already submitted an action this turn.
    #[must_use]
    pub const fn played(&self) -> bool {
        self.played
    }
}

/// Units in insertion order with identifier and position lookups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Roster {
    units: Vec<Unit>,
}

impl Roster {
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub(crate) fn as_slice(&self) -> &[Unit] {
        &self.units
    }

    pub(crate) fn push(&mut self, unit: Unit) {
        self.units.push(unit);
    }

    pub(crate) fn get(&self, id: &UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| &unit.id == id)
    }

    pub(crate) fn at(&self, position: Position) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.position == position)
    }

    pub(crate) fn relocate(&mut self, id: &UnitId, position: Position) -> bool {
        match self.units.iter_mut().find(|unit| &unit.id == id) {
            Some(unit) => {
                unit.position = position;
                true
            }
            None => false,
        }
    }

    pub(crate) fn mark_played(&mut self, id: &UnitId) {
        if let Some(unit) = self.units.iter_mut().find(|unit| &unit.id == id) {
            unit.played = true;
        }
    }

    pub(crate) fn clear_played(&mut self, side: Option<Side>) {
        for unit in &mut self.units {
            if side.map_or(true, |side| unit.side == side) {
                unit.played = false;
            }
        }
    }
}
