#![forbid(unsafe_code)]

//! Card configuration: options, defaults, size presets, and loading.
//!
//! Configuration is validated exactly once, at setup. The only fatal problem
//! is a missing entity; everything else has a default.
//!
//! # Loading
//!
//! ```toml
//! entity = "lock.front_door"
//! orientation = "horizontal"
//! size = "medium"
//! color_off = "#666666"
//! ```
//!
//! ```rust,ignore
//! let config = ToggleConfig::from_toml_file("toggle.toml")?;
//! let config = ToggleConfig::from_json_str(r#"{"entity": "switch.fan"}"#)?;
//! ```
//!
//! Unknown keys are ignored. An unrecognised `size` falls back to `large`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity::{BinaryState, EntityKind};
use crate::error::ConfigError;
use crate::geometry::{Offset, Orientation, Size, ThumbGeometry};
use crate::logging::TARGET_CONFIG;

/// Default icon shown on the on side.
pub const DEFAULT_ICON_ON: &str = "mdi:lock-open-variant";
/// Default icon shown on the off side.
pub const DEFAULT_ICON_OFF: &str = "mdi:lock";

const DEFAULT_COLOR_BG: &str = "var(--card-background-color, #2b2b2b)";
const DEFAULT_COLOR_ICON: &str = "var(--secondary-text-color, #a9a9a9)";
const DEFAULT_COLOR_ACTIVE: &str = "linear-gradient(145deg, #e66465, #9198e5)";
const DEFAULT_COLOR_ICON_ACTIVE: &str = "white";

// ---------------------------------------------------------------------------
// Reconciliation policy
// ---------------------------------------------------------------------------

/// When a pending optimistic state is dropped in favour of the real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReconcilePolicy {
    /// Drop it only when a refresh shows the raw state actually changed.
    #[default]
    #[serde(rename = "change")]
    ClearOnChange,
    /// Drop it on every refresh. Snaps back to stale state if the backend
    /// has not caught up yet; kept for hosts that relied on it.
    #[serde(rename = "refresh")]
    ClearOnRefresh,
}

// ---------------------------------------------------------------------------
// Size presets
// ---------------------------------------------------------------------------

/// Named card size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SizePreset {
    XSmall,
    Small,
    Medium,
    #[default]
    Large,
}

impl From<String> for SizePreset {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl SizePreset {
    /// Look up a preset by name; unknown names fall back to [`SizePreset::Large`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "xsmall" => Self::XSmall,
            "small" => Self::Small,
            "medium" => Self::Medium,
            "large" => Self::Large,
            other => {
                tracing::warn!(
                    target: TARGET_CONFIG,
                    size = other,
                    "unknown size preset, using large"
                );
                Self::Large
            }
        }
    }

    /// Pixel measurements for this preset.
    #[must_use]
    pub const fn spec(self) -> SizeSpec {
        match self {
            Self::XSmall => SizeSpec::new(25, 50, 25, 3, 16),
            Self::Small => SizeSpec::new(60, 120, 60, 3, 20),
            Self::Medium => SizeSpec::new(80, 160, 80, 4, 24),
            Self::Large => SizeSpec::new(100, 200, 100, 5, 28),
        }
    }
}

/// Pixel measurements of a card size.
///
/// `container_w`/`container_h` describe the vertical layout; the horizontal
/// layout swaps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SizeSpec {
    pub container_w: i32,
    pub container_h: i32,
    pub thumb_size: i32,
    pub padding: i32,
    pub icon_size: i32,
}

impl SizeSpec {
    /// Create a spec.
    #[must_use]
    pub const fn new(
        container_w: i32,
        container_h: i32,
        thumb_size: i32,
        padding: i32,
        icon_size: i32,
    ) -> Self {
        Self {
            container_w,
            container_h,
            thumb_size,
            padding,
            icon_size,
        }
    }

    /// Resting thumb offset on the on side.
    #[must_use]
    pub const fn offset_on(&self) -> i32 {
        self.padding
    }

    /// Resting thumb offset on the off side.
    #[must_use]
    pub const fn offset_off(&self) -> i32 {
        self.container_h + self.padding - self.thumb_size
    }

    /// Resting offset for a side.
    #[must_use]
    pub const fn resting_offset(&self, side: BinaryState) -> i32 {
        match side {
            BinaryState::On => self.offset_on(),
            BinaryState::Off => self.offset_off(),
        }
    }

    /// Track box (container content plus padding on both sides).
    #[must_use]
    pub const fn track_size(&self, orientation: Orientation) -> Size {
        let long = self.container_h + 2 * self.padding;
        let short = self.container_w + 2 * self.padding;
        match orientation {
            Orientation::Vertical => Size::new(short, long),
            Orientation::Horizontal => Size::new(long, short),
        }
    }

    /// Geometry of a thumb resting on `side`, as the host would measure it.
    #[must_use]
    pub const fn resting_geometry(
        &self,
        orientation: Orientation,
        side: BinaryState,
    ) -> ThumbGeometry {
        let along = self.resting_offset(side);
        let thumb_offset = match orientation {
            Orientation::Vertical => Offset::new(self.padding, along),
            Orientation::Horizontal => Offset::new(along, self.padding),
        };
        ThumbGeometry {
            thumb_offset,
            thumb_size: Size::new(self.thumb_size, self.thumb_size),
            track_size: self.track_size(orientation),
        }
    }
}

// ---------------------------------------------------------------------------
// ToggleConfig
// ---------------------------------------------------------------------------

/// Unvalidated configuration, as written by the user.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawToggleConfig {
    entity: Option<String>,
    orientation: Orientation,
    size: SizePreset,
    icon_on: Option<String>,
    icon_off: Option<String>,
    color_bg: String,
    color_icon: String,
    color_active: String,
    color_icon_active: String,
    color_off: Option<String>,
    hide_icons: bool,
    center_card: bool,
    optimistic_policy: ReconcilePolicy,
}

impl Default for RawToggleConfig {
    fn default() -> Self {
        Self {
            entity: None,
            orientation: Orientation::Vertical,
            size: SizePreset::Large,
            icon_on: None,
            icon_off: None,
            color_bg: DEFAULT_COLOR_BG.to_string(),
            color_icon: DEFAULT_COLOR_ICON.to_string(),
            color_active: DEFAULT_COLOR_ACTIVE.to_string(),
            color_icon_active: DEFAULT_COLOR_ICON_ACTIVE.to_string(),
            color_off: None,
            hide_icons: false,
            center_card: true,
            optimistic_policy: ReconcilePolicy::ClearOnChange,
        }
    }
}

/// Validated card configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleConfig {
    /// Bound entity id. Never blank.
    pub entity: String,
    pub orientation: Orientation,
    pub size: SizePreset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_off: Option<String>,
    pub color_bg: String,
    pub color_icon: String,
    pub color_active: String,
    pub color_icon_active: String,
    /// Thumb colour on the off side; `color_active` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_off: Option<String>,
    pub hide_icons: bool,
    pub center_card: bool,
    pub optimistic_policy: ReconcilePolicy,
}

impl ToggleConfig {
    /// Configuration bound to `entity` with every other option defaulted.
    pub fn for_entity(entity: impl Into<String>) -> Result<Self, ConfigError> {
        Self::from_raw(RawToggleConfig {
            entity: Some(entity.into()),
            ..RawToggleConfig::default()
        })
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_raw(serde_json::from_str(s)?)
    }

    /// Load from an already-parsed JSON value (hosts hand over objects).
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        Self::from_raw(serde_json::from_value(value)?)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_raw(toml::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Default configuration offered by the card picker.
    #[must_use]
    pub fn stub() -> Self {
        Self {
            entity: "input_boolean.example_boolean".to_string(),
            orientation: Orientation::Vertical,
            size: SizePreset::Large,
            icon_on: None,
            icon_off: None,
            color_bg: "#333333".to_string(),
            color_icon: DEFAULT_COLOR_ICON.to_string(),
            color_active: "#ff9800".to_string(),
            color_icon_active: DEFAULT_COLOR_ICON_ACTIVE.to_string(),
            color_off: Some("#666666".to_string()),
            hide_icons: false,
            center_card: true,
            optimistic_policy: ReconcilePolicy::ClearOnChange,
        }
    }

    fn from_raw(raw: RawToggleConfig) -> Result<Self, ConfigError> {
        let config = Self {
            entity: raw.entity.unwrap_or_default(),
            orientation: raw.orientation,
            size: raw.size,
            icon_on: raw.icon_on,
            icon_off: raw.icon_off,
            color_bg: raw.color_bg,
            color_icon: raw.color_icon,
            color_active: raw.color_active,
            color_icon_active: raw.color_icon_active,
            color_off: raw.color_off,
            hide_icons: raw.hide_icons,
            center_card: raw.center_card,
            optimistic_policy: raw.optimistic_policy,
        };
        config.validate()?;
        tracing::debug!(
            target: TARGET_CONFIG,
            entity = %config.entity,
            kind = ?config.entity_kind(),
            orientation = config.orientation.as_str(),
            size = ?config.size,
            "toggle configured"
        );
        Ok(config)
    }

    /// Check invariants the loaders cannot express in types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entity.trim().is_empty() {
            return Err(ConfigError::MissingEntity);
        }
        Ok(())
    }

    /// Kind of the bound entity.
    #[must_use]
    pub fn entity_kind(&self) -> EntityKind {
        EntityKind::from_entity_id(&self.entity)
    }

    /// Pixel measurements for the configured size.
    #[must_use]
    pub const fn size_spec(&self) -> SizeSpec {
        self.size.spec()
    }

    /// Icon for the on side.
    #[must_use]
    pub fn icon_on(&self) -> &str {
        self.icon_on.as_deref().unwrap_or(DEFAULT_ICON_ON)
    }

    /// Icon for the off side.
    #[must_use]
    pub fn icon_off(&self) -> &str {
        self.icon_off.as_deref().unwrap_or(DEFAULT_ICON_OFF)
    }

    /// Icon for a side.
    #[must_use]
    pub fn icon_for(&self, side: BinaryState) -> &str {
        match side {
            BinaryState::On => self.icon_on(),
            BinaryState::Off => self.icon_off(),
        }
    }

    /// Thumb colour for a side.
    #[must_use]
    pub fn thumb_color(&self, side: BinaryState) -> &str {
        match (side, self.color_off.as_deref()) {
            (BinaryState::Off, Some(off)) => off,
            _ => &self.color_active,
        }
    }
}

// ---------------------------------------------------------------------------
// Card registration
// ---------------------------------------------------------------------------

/// Metadata a dashboard uses to list the card in its picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardInfo {
    #[serde(rename = "type")]
    pub card_type: &'static str,
    pub name: &'static str,
    pub preview: bool,
    pub description: &'static str,
}

impl CardInfo {
    /// Registration entry for this card.
    pub const DRAGGABLE_TOGGLE: Self = Self {
        card_type: "draggable-toggle-card",
        name: "Draggable Toggle Card",
        preview: true,
        description: "A clickable and draggable toggle switch card.",
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_entity_is_fatal() {
        let err = ToggleConfig::from_json_str(r#"{"orientation": "vertical"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEntity));
        let err = ToggleConfig::from_json_str(r#"{"entity": "   "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEntity));
    }

    #[test]
    fn defaults_fill_everything_else() {
        let config = ToggleConfig::from_json_str(r#"{"entity": "switch.fan"}"#).unwrap();
        assert_eq!(config.orientation, Orientation::Vertical);
        assert_eq!(config.size, SizePreset::Large);
        assert!(config.center_card);
        assert!(!config.hide_icons);
        assert_eq!(config.color_icon_active, "white");
        assert_eq!(config.color_off, None);
        assert_eq!(config.optimistic_policy, ReconcilePolicy::ClearOnChange);
        assert_eq!(config.icon_on(), DEFAULT_ICON_ON);
        assert_eq!(config.icon_off(), DEFAULT_ICON_OFF);
    }

    #[test]
    fn unknown_size_falls_back_to_large() {
        let config =
            ToggleConfig::from_json_str(r#"{"entity": "switch.fan", "size": "huge"}"#).unwrap();
        assert_eq!(config.size, SizePreset::Large);
        let config =
            ToggleConfig::from_json_str(r#"{"entity": "switch.fan", "size": "xsmall"}"#).unwrap();
        assert_eq!(config.size, SizePreset::XSmall);
    }

    #[test]
    fn unknown_orientation_is_rejected() {
        let err =
            ToggleConfig::from_json_str(r#"{"entity": "switch.fan", "orientation": "diagonal"}"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn toml_loading() {
        let config = ToggleConfig::from_toml_str(
            r##"
            entity = "lock.front_door"
            orientation = "horizontal"
            size = "medium"
            color_off = "#666666"
            optimistic_policy = "refresh"
            "##,
        )
        .unwrap();
        assert_eq!(config.entity_kind(), EntityKind::Lock);
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert_eq!(config.size, SizePreset::Medium);
        assert_eq!(config.optimistic_policy, ReconcilePolicy::ClearOnRefresh);
        assert_eq!(config.thumb_color(BinaryState::Off), "#666666");
        assert_eq!(config.thumb_color(BinaryState::On), config.color_active);
    }

    #[test]
    fn validate_catches_blanked_entity() {
        let mut config = ToggleConfig::stub();
        assert!(config.validate().is_ok());
        config.entity = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::MissingEntity)));
    }

    #[test]
    fn toml_missing_entity() {
        let err = ToggleConfig::from_toml_str("size = \"small\"").unwrap_err();
        assert!(matches!(err, ConfigError::MissingEntity));
    }

    #[test]
    fn file_loading_reports_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = ToggleConfig::from_json_file(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));

        let path = dir.path().join("toggle.toml");
        std::fs::write(&path, "entity = \"switch.fan\"\nhide_icons = true\n").unwrap();
        let config = ToggleConfig::from_toml_file(&path).unwrap();
        assert!(config.hide_icons);
    }

    #[test]
    fn large_preset_geometry() {
        let spec = SizePreset::Large.spec();
        assert_eq!(spec.offset_on(), 5);
        assert_eq!(spec.offset_off(), 105);
        assert_eq!(spec.track_size(Orientation::Vertical), Size::new(110, 210));
        assert_eq!(spec.track_size(Orientation::Horizontal), Size::new(210, 110));

        let geometry = spec.resting_geometry(Orientation::Horizontal, BinaryState::Off);
        assert_eq!(geometry.thumb_offset, Offset::new(105, 5));
        assert_eq!(geometry.thumb_size, Size::new(100, 100));
    }

    #[test]
    fn resting_offsets_resolve_to_their_side() {
        for preset in [
            SizePreset::XSmall,
            SizePreset::Small,
            SizePreset::Medium,
            SizePreset::Large,
        ] {
            let spec = preset.spec();
            for orientation in [Orientation::Vertical, Orientation::Horizontal] {
                for side in [BinaryState::On, BinaryState::Off] {
                    let geometry = spec.resting_geometry(orientation, side);
                    let span = geometry.span(orientation);
                    assert_eq!(
                        span.resolve(geometry.origin(orientation)),
                        side,
                        "{preset:?} {orientation:?} {side:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn stub_serializes_picker_defaults() {
        let value = serde_json::to_value(ToggleConfig::stub()).unwrap();
        assert_eq!(value["entity"], "input_boolean.example_boolean");
        assert_eq!(value["size"], "large");
        assert_eq!(value["color_active"], "#ff9800");
        assert_eq!(value["color_off"], "#666666");
        assert_eq!(value["optimistic_policy"], "change");
    }

    #[test]
    fn card_info_uses_type_key() {
        let value = serde_json::to_value(CardInfo::DRAGGABLE_TOGGLE).unwrap();
        assert_eq!(value["type"], "draggable-toggle-card");
        assert_eq!(value["preview"], true);
    }
}
