//! Logging Modes
//!
//! A logging mode is chosen per error and decides where a report goes:
//! nowhere, the operator console, the remote incident channel, or both.
//!
//! # Usage
//!
//! ```rust
//! use xfreport::shared::LoggingMode;
//!
//! let mode = LoggingMode::Both;
//! assert!(mode.console());
//! assert!(mode.remote());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::config::ConfigError;

/// Where a reported error is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingMode {
    /// No side effect at all
    #[default]
    Off,
    /// Operator console only
    Console,
    /// Remote incident channel only
    Remote,
    /// Console and remote channel
    Both,
}

impl LoggingMode {
    /// Whether this mode writes a console entry
    pub fn console(self) -> bool {
        matches!(self, Self::Console | Self::Both)
    }

    /// Whether this mode submits to the remote channel
    pub fn remote(self) -> bool {
        matches!(self, Self::Remote | Self::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Console => "console",
            Self::Remote => "remote",
            Self::Both => "both",
        }
    }
}

/// `true` means "log everywhere", `false` means "don't log".
impl From<bool> for LoggingMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            Self::Both
        } else {
            Self::Off
        }
    }
}

impl fmt::Display for LoggingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "false" => Ok(Self::Off),
            "console" => Ok(Self::Console),
            // "discord" is accepted for older configurations
            "remote" | "discord" => Ok(Self::Remote),
            "both" | "true" => Ok(Self::Both),
            other => Err(ConfigError::InvalidValue {
                key: "logging mode",
                value: other.to_string(),
            }),
        }
    }
}
