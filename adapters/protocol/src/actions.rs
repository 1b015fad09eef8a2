//! Craftsman actions as exchanged with the game service.

use craftsmen_core::{Action, ActionBatch, ActionKind, Direction4, Direction8, UnitId};
use serde::{
    de::{value::Error as NameError, IntoDeserializer},
    Deserialize, Serialize,
};
use thiserror::Error;
use tracing::warn;

/// Errors raised while decoding a single wire action.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionDecodeError {
    /// The action names no craftsman.
    #[error("action does not name a craftsman")]
    MissingUnit,
    /// The action verb is not one of STAY, MOVE, BUILD or DESTROY.
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    /// A MOVE, BUILD or DESTROY arrived without a direction.
    #[error("{action} requires a direction")]
    MissingParam {
        /// Action verb as sent.
        action: String,
    },
    /// The direction is not valid for the action verb.
    #[error("'{param}' is not a valid direction for {action}")]
    InvalidParam {
        /// Action verb as sent.
        action: String,
        /// Direction as sent.
        param: String,
    },
}

/// One craftsman's action in a submission or in the server log.
///
/// Verbs and directions are matched case-insensitively, so both
/// `"UPPER_LEFT"` and `"upper_left"` are understood.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildAction {
    /// Identifier of the acting craftsman.
    #[serde(alias = "crafts_man_id", default)]
    pub craftsman_id: String,
    /// STAY, MOVE, BUILD or DESTROY.
    #[serde(default)]
    pub action: String,
    /// Direction for MOVE, BUILD and DESTROY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_param: Option<String>,
}

impl ChildAction {
    /// Creates a wire action.
    #[must_use]
    pub fn new(
        craftsman_id: impl Into<String>,
        action: impl Into<String>,
        action_param: Option<&str>,
    ) -> Self {
        Self {
            craftsman_id: craftsman_id.into(),
            action: action.into(),
            action_param: action_param.map(str::to_owned),
        }
    }

    fn direction<T>(&self) -> Result<T, ActionDecodeError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let param = self
            .action_param
            .as_deref()
            .map(str::trim)
            .filter(|param| !param.is_empty())
            .ok_or_else(|| ActionDecodeError::MissingParam {
                action: self.action.clone(),
            })?;
        let normalised = param.to_ascii_uppercase();
        T::deserialize(normalised.as_str().into_deserializer()).map_err(|_: NameError| {
            ActionDecodeError::InvalidParam {
                action: self.action.clone(),
                param: param.to_owned(),
            }
        })
    }
}

impl TryFrom<&ChildAction> for Action {
    type Error = ActionDecodeError;

    fn try_from(wire: &ChildAction) -> Result<Self, Self::Error> {
        let unit = wire.craftsman_id.trim();
        if unit.is_empty() {
            return Err(ActionDecodeError::MissingUnit);
        }

        let kind = match wire.action.trim().to_ascii_uppercase().as_str() {
            "STAY" => ActionKind::Stay,
            "MOVE" => ActionKind::Move(wire.direction::<Direction8>()?),
            "BUILD" => ActionKind::Build(wire.direction::<Direction4>()?),
            "DESTROY" => ActionKind::Destroy(wire.direction::<Direction4>()?),
            _ => return Err(ActionDecodeError::UnknownAction(wire.action.clone())),
        };
        Ok(Action::new(UnitId::new(unit), kind))
    }
}

/// Decodes a list of wire actions into a batch.
///
/// Entries that cannot be decoded are skipped. A later entry for the same
/// craftsman replaces an earlier one.
#[must_use]
pub fn decode_batch(actions: &[ChildAction]) -> ActionBatch {
    let mut batch = ActionBatch::new();
    for wire in actions {
        match Action::try_from(wire) {
            Ok(action) => batch.submit(action),
            Err(error) => warn!(
                craftsman = %wire.craftsman_id,
                action = %wire.action,
                %error,
                "skipping undecodable action"
            ),
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(action: &str, param: Option<&str>) -> Result<ActionKind, ActionDecodeError> {
        Action::try_from(&ChildAction::new("7", action, param)).map(|action| action.kind)
    }

    #[test]
    fn verbs_and_directions_are_case_insensitive() {
        assert_eq!(
            decode("move", Some("upper_left")),
            Ok(ActionKind::Move(Direction8::UpperLeft))
        );
        assert_eq!(
            decode("BUILD", Some("ABOVE")),
            Ok(ActionKind::Build(Direction4::Above))
        );
        assert_eq!(
            decode("Destroy", Some("right")),
            Ok(ActionKind::Destroy(Direction4::Right))
        );
    }

    #[test]
    fn stay_ignores_its_parameter() {
        assert_eq!(decode("STAY", Some("UP")), Ok(ActionKind::Stay));
        assert_eq!(decode("STAY", None), Ok(ActionKind::Stay));
    }

    #[test]
    fn parameters_must_match_the_verb() {
        assert_eq!(
            decode("BUILD", Some("UPPER_LEFT")),
            Err(ActionDecodeError::InvalidParam {
                action: "BUILD".into(),
                param: "UPPER_LEFT".into(),
            })
        );
        assert_eq!(
            decode("MOVE", Some("ABOVE")),
            Err(ActionDecodeError::InvalidParam {
                action: "MOVE".into(),
                param: "ABOVE".into(),
            })
        );
        assert_eq!(
            decode("DESTROY", None),
            Err(ActionDecodeError::MissingParam {
                action: "DESTROY".into(),
            })
        );
    }

    #[test]
    fn unknown_verbs_and_missing_units_fail() {
        assert_eq!(
            decode("JUMP", None),
            Err(ActionDecodeError::UnknownAction("JUMP".into()))
        );
        assert_eq!(
            Action::try_from(&ChildAction::new(" ", "STAY", None)),
            Err(ActionDecodeError::MissingUnit)
        );
    }
}
