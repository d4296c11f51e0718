#![forbid(unsafe_code)]

//! JSON parser for host messages.
//!
//! [`parse_host_message`] turns one JSON object pushed by the embedding page
//! into a [`HostEvent`]. Kinds without a mapping return `Ok(None)`.
//!
//! ```json
//! {"kind": "states", "states": {"lock.door": {"state": "locked"}}}
//! {"kind": "pointer", "phase": "down", "target": "thumb", "pointer": "touch",
//!  "x": 40, "y": 160, "geometry": {"thumb_offset": {"left": 5, "top": 105},
//!  "thumb_size": {"width": 100, "height": 100},
//!  "track_size": {"width": 110, "height": 210}}}
//! {"kind": "click", "target": "track"}
//! {"kind": "geometry_lost"}
//! {"kind": "disconnect"}
//! ```

use dtoggle_core::{
    HitTarget, PointerInput, PointerKind, PointerPosition, StateSnapshot, ThumbGeometry,
};
use serde::Deserialize;

use crate::{HostEvent, PointerPhase};

/// Errors from parsing a host message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputParseError {
    /// Malformed JSON.
    #[error("JSON parse error: {0}")]
    Json(String),
    /// Missing required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// A field holds a value outside its vocabulary.
    #[error("unknown {field}: {value}")]
    UnknownValue { field: &'static str, value: String },
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    kind: String,
    #[serde(default)]
    states: Option<StateSnapshot>,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    pointer: Option<String>,
    #[serde(default)]
    x: Option<i32>,
    #[serde(default)]
    y: Option<i32>,
    #[serde(default)]
    geometry: Option<ThumbGeometry>,
}

/// Parse one host message.
///
/// Returns `Ok(None)` for unknown kinds and `Err` for malformed JSON, missing
/// fields, or unknown field values.
pub fn parse_host_message(json: &str) -> Result<Option<HostEvent>, InputParseError> {
    let raw: RawMessage =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "states" => raw
            .states
            .map(|states| Some(HostEvent::States(states)))
            .ok_or(InputParseError::MissingField("states")),
        "pointer" => parse_pointer(raw).map(Some),
        "click" => {
            let target = parse_target(raw.target.as_deref())?;
            Ok(Some(HostEvent::Click { target }))
        }
        "geometry_lost" => Ok(Some(HostEvent::GeometryLost)),
        "connect" => Ok(Some(HostEvent::Connect)),
        "disconnect" => Ok(Some(HostEvent::Disconnect)),
        _ => Ok(None),
    }
}

fn parse_pointer(raw: RawMessage) -> Result<HostEvent, InputParseError> {
    let phase = match raw.phase.as_deref() {
        Some("down") => PointerPhase::Down,
        Some("move") => PointerPhase::Move,
        Some("up") => PointerPhase::Up,
        Some("cancel") => PointerPhase::Cancel,
        Some(other) => {
            return Err(InputParseError::UnknownValue {
                field: "phase",
                value: other.to_string(),
            });
        }
        None => return Err(InputParseError::MissingField("phase")),
    };
    let kind = match raw.pointer.as_deref() {
        None | Some("mouse") => PointerKind::Mouse,
        Some("touch") => PointerKind::Touch,
        Some(other) => {
            return Err(InputParseError::UnknownValue {
                field: "pointer",
                value: other.to_string(),
            });
        }
    };
    let position = match phase {
        PointerPhase::Cancel => PointerPosition::new(raw.x.unwrap_or(0), raw.y.unwrap_or(0)),
        _ => PointerPosition::new(
            raw.x.ok_or(InputParseError::MissingField("x"))?,
            raw.y.ok_or(InputParseError::MissingField("y"))?,
        ),
    };
    Ok(HostEvent::Pointer {
        phase,
        target: parse_target(raw.target.as_deref())?,
        input: PointerInput { kind, position },
        geometry: raw.geometry,
    })
}

/// Missing target means "not the thumb".
fn parse_target(target: Option<&str>) -> Result<HitTarget, InputParseError> {
    match target {
        Some("thumb") => Ok(HitTarget::Thumb),
        None | Some("track") => Ok(HitTarget::Track),
        Some(other) => Err(InputParseError::UnknownValue {
            field: "target",
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtoggle_core::{Offset, Size, StateSource};
    use pretty_assertions::assert_eq;

    #[test]
    fn states_message() {
        let event = parse_host_message(
            r#"{"kind":"states","states":{"lock.door":{"state":"locked","attributes":{}}}}"#,
        )
        .unwrap()
        .unwrap();
        let HostEvent::States(states) = event else {
            panic!("expected states, got {event:?}");
        };
        assert_eq!(states.entity("lock.door").unwrap().state, "locked");
    }

    #[test]
    fn pointer_down_with_geometry() {
        let event = parse_host_message(
            r#"{"kind":"pointer","phase":"down","target":"thumb","pointer":"touch","x":40,"y":160,
                "geometry":{"thumb_offset":{"left":5,"top":105},
                            "thumb_size":{"width":100,"height":100},
                            "track_size":{"width":110,"height":210}}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            event,
            HostEvent::Pointer {
                phase: PointerPhase::Down,
                target: HitTarget::Thumb,
                input: PointerInput::touch(40, 160),
                geometry: Some(ThumbGeometry {
                    thumb_offset: Offset::new(5, 105),
                    thumb_size: Size::new(100, 100),
                    track_size: Size::new(110, 210),
                }),
            }
        );
    }

    #[test]
    fn pointer_move_defaults() {
        let event = parse_host_message(r#"{"kind":"pointer","phase":"move","x":1,"y":2}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            HostEvent::Pointer {
                phase: PointerPhase::Move,
                target: HitTarget::Track,
                input: PointerInput::mouse(1, 2),
                geometry: None,
            }
        );
    }

    #[test]
    fn cancel_needs_no_coordinates() {
        let event = parse_host_message(r#"{"kind":"pointer","phase":"cancel"}"#)
            .unwrap()
            .unwrap();
        assert!(matches!(
            event,
            HostEvent::Pointer {
                phase: PointerPhase::Cancel,
                ..
            }
        ));
    }

    #[test]
    fn lifecycle_messages() {
        assert_eq!(
            parse_host_message(r#"{"kind":"click","target":"track"}"#).unwrap(),
            Some(HostEvent::Click {
                target: HitTarget::Track
            })
        );
        assert_eq!(
            parse_host_message(r#"{"kind":"geometry_lost"}"#).unwrap(),
            Some(HostEvent::GeometryLost)
        );
        assert_eq!(
            parse_host_message(r#"{"kind":"disconnect"}"#).unwrap(),
            Some(HostEvent::Disconnect)
        );
        assert_eq!(
            parse_host_message(r#"{"kind":"connect"}"#).unwrap(),
            Some(HostEvent::Connect)
        );
    }

    #[test]
    fn unknown_kind_is_none() {
        assert_eq!(parse_host_message(r#"{"kind":"resize"}"#).unwrap(), None);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            parse_host_message("{not json").unwrap_err(),
            InputParseError::Json(_)
        ));
        assert_eq!(
            parse_host_message(r#"{"kind":"states"}"#).unwrap_err(),
            InputParseError::MissingField("states")
        );
        assert_eq!(
            parse_host_message(r#"{"kind":"pointer","phase":"down","y":3}"#).unwrap_err(),
            InputParseError::MissingField("x")
        );
        assert_eq!(
            parse_host_message(r#"{"kind":"pointer","phase":"hover","x":1,"y":1}"#).unwrap_err(),
            InputParseError::UnknownValue {
                field: "phase",
                value: "hover".to_string()
            }
        );
        assert_eq!(
            parse_host_message(r#"{"kind":"click","target":"icon"}"#).unwrap_err(),
            InputParseError::UnknownValue {
                field: "target",
                value: "icon".to_string()
            }
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            InputParseError::MissingField("x").to_string(),
            "missing required field: x"
        );
        assert_eq!(
            InputParseError::UnknownValue {
                field: "pointer",
                value: "pen".into()
            }
            .to_string(),
            "unknown pointer: pen"
        );
    }
}
