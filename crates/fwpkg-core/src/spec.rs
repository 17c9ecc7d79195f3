//! Firmware definitions
//!
//! A [`FirmwareSpec`] is the unvalidated description of one package, as
//! typed by a person: from a TOML file, command-line flags, or both. Flags
//! are kept as strings here so that a bad `type` or `encryption` value is
//! reported by the validator in rule order rather than by the parser.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fwpkg_schema::SCHEMA_VERSION;

/// Errors that can occur when loading a firmware definition.
#[derive(Error, Debug)]
pub enum SpecError {
    /// An I/O error occurred while reading the definition file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be deserialized.
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Metadata for one firmware package, prior to validation.
///
/// Unknown keys are rejected so a misspelled `enforce_model` cannot
/// silently fall back to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirmwareSpec {
    /// Name shown to the user by the updater.
    #[serde(default)]
    pub display_name: String,
    /// Vehicle model, 1-10 alphanumeric characters.
    #[serde(default)]
    pub model: String,
    /// Compatible board identifiers in priority order.
    #[serde(default)]
    pub boards: Vec<String>,
    /// Target controller flag: `DRV`, `BMS` or `BLE`.
    #[serde(rename = "type", default)]
    pub type_flag: String,
    /// Whether the updater should refuse a mismatching model.
    #[serde(default)]
    pub enforce_model: bool,
    /// Artifact selection: `plain`, `encrypted` or `both`.
    #[serde(default)]
    pub encryption: String,
    /// Manifest schema version. Only `1` is accepted.
    #[serde(default = "default_schema_version")]
    pub schema_version: i64,
    /// Free-text update parameters stored as `params.txt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
}

fn default_schema_version() -> i64 {
    SCHEMA_VERSION
}

impl Default for FirmwareSpec {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            model: String::new(),
            boards: Vec::new(),
            type_flag: String::new(),
            enforce_model: false,
            encryption: String::new(),
            schema_version: SCHEMA_VERSION,
            params: None,
        }
    }
}

impl FirmwareSpec {
    /// Parse a firmware definition from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Io` if the file cannot be read, or
    /// `SpecError::Parse` if the TOML content is invalid.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a firmware definition from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `SpecError::Parse` if the TOML content is invalid or a field
    /// has the wrong type.
    pub fn parse(content: &str) -> Result<Self, SpecError> {
        Ok(toml::from_str(content)?)
    }

    /// Parameters text, if present and non-empty.
    pub fn params_text(&self) -> Option<&str> {
        self.params.as_deref().filter(|p| !p.is_empty())
    }

    /// Starter definition for `model`, with every key spelled out.
    pub fn template(model: &str) -> String {
        format!(
            r#"# Firmware package definition
display_name = "{model} firmware"
model = "{model}"

# Compatible boards, primary board first
boards = ["{model}_DRV_STM32F103CxT6"]

# One of: DRV, BMS, BLE
type = "DRV"

# Refuse to flash when the vehicle model differs
enforce_model = false

# One of: plain, encrypted, both
encryption = "plain"

schema_version = 1

# Optional free-text parameters, stored as params.txt
# params = ""
"#
        )
    }
}

impl std::str::FromStr for FirmwareSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
