#![forbid(unsafe_code)]

//! Render-ready view model.
//!
//! [`ToggleView`] is everything a host needs to draw the card: classes,
//! icons, the thumb position (resting, or the live drag offset), and the CSS
//! custom properties the stylesheet reads.

use std::fmt::Write as _;

use dtoggle_core::{BinaryState, Orientation, SizeSpec, ToggleConfig};

/// Icons drawn at the two ends of the track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideIcons {
    pub on: String,
    pub off: String,
}

/// Snapshot of what the card shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleView {
    pub orientation: Orientation,
    /// Side in effect (optimistic side first).
    pub side: BinaryState,
    /// Live offset while dragging; overrides the resting position.
    pub drag_offset: Option<i32>,
    /// Resting offset of `side` along the drag axis.
    pub resting_offset: i32,
    /// `None` when icons are hidden.
    pub thumb_icon: Option<String>,
    /// `None` when icons are hidden.
    pub side_icons: Option<SideIcons>,
    pub thumb_color: String,
    pub centered: bool,
    pub size: SizeSpec,
    css_variables: Vec<(&'static str, String)>,
}

impl ToggleView {
    /// Build the view for `side`.
    #[must_use]
    pub fn build(config: &ToggleConfig, side: BinaryState, drag_offset: Option<i32>) -> Self {
        let size = config.size_spec();
        let thumb_color = config.thumb_color(side).to_string();
        let icons_visible = !config.hide_icons;
        Self {
            orientation: config.orientation,
            side,
            drag_offset,
            resting_offset: size.resting_offset(side),
            thumb_icon: icons_visible.then(|| config.icon_for(side).to_string()),
            side_icons: icons_visible.then(|| SideIcons {
                on: config.icon_on().to_string(),
                off: config.icon_off().to_string(),
            }),
            css_variables: css_variables(config, &size, &thumb_color),
            thumb_color,
            centered: config.center_card,
            size,
        }
    }

    /// Where the thumb is drawn along the drag axis.
    #[must_use]
    pub fn thumb_offset(&self) -> i32 {
        self.drag_offset.unwrap_or(self.resting_offset)
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Class list of the container element.
    #[must_use]
    pub fn container_class(&self) -> String {
        format!("toggle-container {}", self.orientation.as_str())
    }

    /// Class list of the thumb element.
    #[must_use]
    pub fn thumb_class(&self) -> String {
        format!("thumb {}", self.side.as_str())
    }

    /// Inline style of the container element.
    #[must_use]
    pub const fn container_style(&self) -> &'static str {
        if self.centered { "margin: 0 auto;" } else { "" }
    }

    /// Inline style overriding the thumb position while dragging.
    #[must_use]
    pub fn thumb_style(&self) -> Option<String> {
        let offset = self.drag_offset?;
        let property = match self.orientation {
            Orientation::Vertical => "top",
            Orientation::Horizontal => "left",
        };
        Some(format!("{property}: {offset}px;"))
    }

    /// Custom properties published on the card element.
    #[must_use]
    pub fn css_variables(&self) -> &[(&'static str, String)] {
        &self.css_variables
    }

    /// [`ToggleView::css_variables`] as one `style` attribute value.
    #[must_use]
    pub fn card_style(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.css_variables {
            let _ = write!(out, "{name}: {value}; ");
        }
        out.truncate(out.trim_end().len());
        out
    }
}

fn css_variables(
    config: &ToggleConfig,
    size: &SizeSpec,
    thumb_color: &str,
) -> Vec<(&'static str, String)> {
    let px = |v: i32| format!("{v}px");
    vec![
        ("--toggle-bg-color", config.color_bg.clone()),
        ("--toggle-active-color", thumb_color.to_string()),
        ("--toggle-icon-color", config.color_icon.clone()),
        ("--toggle-icon-active-color", config.color_icon_active.clone()),
        ("--container-w-v", px(size.container_w)),
        ("--container-h-v", px(size.container_h)),
        ("--container-w-h", px(size.container_h)),
        ("--container-h-h", px(size.container_w)),
        ("--thumb-size", px(size.thumb_size)),
        ("--padding", px(size.padding)),
        ("--icon-size", px(size.icon_size)),
        ("--offset-on", px(size.offset_on())),
        ("--offset-off-v", px(size.offset_off())),
        ("--offset-off-h", px(size.offset_off())),
    ]
}
