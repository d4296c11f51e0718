#![forbid(unsafe_code)]

//! Toggle error model and recovery actions.
//!
//! # Design Principles
//!
//! 1. **Fail at setup, never at render**: configuration problems surface
//!    from the config loaders before any view exists.
//! 2. **Every error has a recovery**: [`ToggleError::recovery`] tells the
//!    host what to do instead of faulting.
//! 3. **No retries**: commands are fire-and-forget, so nothing here models
//!    a retry or acknowledgement.

use thiserror::Error;

/// Setup-time configuration failures. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No entity bound (absent or blank).
    #[error("you need to define an entity")]
    MissingEntity,
    /// Reading a config file failed.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON config could not be parsed.
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    /// TOML config could not be parsed.
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level error type for the toggle.
#[derive(Debug, Error)]
pub enum ToggleError {
    /// Invalid or missing configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The state source has not delivered the bound entity yet.
    #[error("entity state is not available yet")]
    Unavailable,
    /// Drag math was asked for against elements that are not present.
    #[error("toggle geometry is not available")]
    StaleGeometry,
}

/// Standard result type for toggle APIs.
pub type Result<T> = std::result::Result<T, ToggleError>;

/// What the host should do when an error occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Abort setup and surface the error to the user.
    Fatal,
    /// Render an empty card and wait for the next state delivery.
    RenderNothing,
    /// Drop the interaction; state is left untouched.
    NoOp,
}

impl ToggleError {
    /// Recovery action for this error.
    #[must_use]
    pub const fn recovery(&self) -> Recovery {
        match self {
            Self::Config(_) => Recovery::Fatal,
            Self::Unavailable => Recovery::RenderNothing,
            Self::StaleGeometry => Recovery::NoOp,
        }
    }

    /// Short machine-readable name, for log fields.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Unavailable => "unavailable",
            Self::StaleGeometry => "stale_geometry",
        }
    }

    /// Whether the host can keep the card alive after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self.recovery(), Recovery::Fatal)
    }
}

impl std::fmt::Display for Recovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fatal => "fatal",
            Self::RenderNothing => "render-nothing",
            Self::NoOp => "no-op",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_fatal() {
        let err = ToggleError::from(ConfigError::MissingEntity);
        assert_eq!(err.recovery(), Recovery::Fatal);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "you need to define an entity");
    }

    #[test]
    fn unavailable_renders_nothing() {
        let err = ToggleError::Unavailable;
        assert_eq!(err.recovery(), Recovery::RenderNothing);
        assert!(err.is_recoverable());
        assert_eq!(err.error_type(), "unavailable");
    }

    #[test]
    fn stale_geometry_is_a_no_op() {
        let err = ToggleError::StaleGeometry;
        assert_eq!(err.recovery(), Recovery::NoOp);
        assert_eq!(err.recovery().to_string(), "no-op");
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ToggleError = ConfigError::from(parse).into();
        assert_eq!(err.error_type(), "config");
        assert!(err.to_string().starts_with("failed to parse JSON config"));
    }
}
