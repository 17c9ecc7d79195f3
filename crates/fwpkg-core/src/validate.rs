//! Metadata validation.
//!
//! Rules run in a fixed order and the first violation wins, so a given
//! definition always fails with the same error:
//!
//! 1. schema version is supported
//! 2. model is present
//! 3. model is 1-10 characters
//! 4. model is alphanumeric
//! 5. at least one compatible board
//! 6. encryption flag is known
//! 7. type flag is known

use thiserror::Error;

use fwpkg_schema::{
    Checksums, EncryptionMode, FirmwareInfo, FirmwareType, Manifest, SCHEMA_VERSION, allowed_list,
};

use crate::spec::FirmwareSpec;

/// Inclusive bounds on the model length, in characters.
pub const MODEL_LENGTH_RANGE: (usize, usize) = (1, 10);

/// A firmware definition that cannot be packaged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Schema version other than the one this builder produces.
    #[error("Unknown schema version {0} (supported: {supported})", supported = SCHEMA_VERSION)]
    UnsupportedSchema(i64),

    /// Model is empty.
    #[error("Model must be specified")]
    MissingModel,

    /// Model is longer than allowed.
    #[error("Model must be between 1 and 10 characters long, got {0}")]
    ModelLengthInvalid(usize),

    /// Model contains something other than letters and digits.
    #[error("Model must be alphanumeric: {0:?}")]
    ModelNotAlphanumeric(String),

    /// No compatible board given.
    #[error("At least one compatible board must be specified")]
    BoardsEmpty,

    /// Encryption flag outside the closed set.
    #[error("Invalid encryption flag {0:?} (allowed: {allowed})", allowed = allowed_list(&EncryptionMode::ALL))]
    InvalidEncryptionMode(String),

    /// Type flag outside the closed set.
    #[error("Invalid type flag {0:?} (allowed: {allowed})", allowed = allowed_list(&FirmwareType::ALL))]
    InvalidTypeFlag(String),

    /// The firmware image has no bytes.
    #[error("Firmware image is empty")]
    EmptyFirmware,
}

/// A firmware definition that passed every rule, with flags resolved to
/// their enumerations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSpec {
    /// Name shown to the user by the updater.
    pub display_name: String,
    /// Vehicle model.
    pub model: String,
    /// Compatible boards, order preserved.
    pub boards: Vec<String>,
    /// Target controller.
    pub kind: FirmwareType,
    /// Passed through to the manifest verbatim.
    pub enforce_model: bool,
    /// Artifact selection.
    pub encryption: EncryptionMode,
    /// Always [`SCHEMA_VERSION`].
    pub schema_version: i64,
    params: Option<String>,
}

impl ValidatedSpec {
    /// Parameters text; `None` when absent or empty.
    pub fn params(&self) -> Option<&str> {
        self.params.as_deref()
    }

    /// Seed a manifest with the passthrough fields and no checksums.
    pub fn manifest(&self) -> Manifest {
        Manifest::new(
            self.schema_version,
            FirmwareInfo {
                display_name: self.display_name.clone(),
                model: self.model.clone(),
                enforce_model: self.enforce_model,
                kind: self.kind,
                compatible: self.boards.clone(),
                encryption: self.encryption,
                md5: Checksums::default(),
            },
        )
    }
}

impl FirmwareSpec {
    /// Check every rule in order and resolve the flags.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first rule that fails.
    pub fn validate(&self) -> Result<ValidatedSpec, ValidationError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ValidationError::UnsupportedSchema(self.schema_version));
        }

        validate_model(&self.model)?;

        if self.boards.is_empty() {
            return Err(ValidationError::BoardsEmpty);
        }

        let encryption: EncryptionMode = self
            .encryption
            .parse()
            .map_err(|_| ValidationError::InvalidEncryptionMode(self.encryption.clone()))?;

        let kind: FirmwareType = self
            .type_flag
            .parse()
            .map_err(|_| ValidationError::InvalidTypeFlag(self.type_flag.clone()))?;

        Ok(ValidatedSpec {
            display_name: self.display_name.clone(),
            model: self.model.clone(),
            boards: self.boards.clone(),
            kind,
            enforce_model: self.enforce_model,
            encryption,
            schema_version: self.schema_version,
            params: self.params_text().map(str::to_string),
        })
    }
}

/// Check a model string against rules 2-4.
///
/// # Errors
///
/// Returns `MissingModel`, `ModelLengthInvalid` or `ModelNotAlphanumeric`.
pub fn validate_model(model: &str) -> Result<(), ValidationError> {
    if model.is_empty() {
        return Err(ValidationError::MissingModel);
    }
    let len = model.chars().count();
    if !(MODEL_LENGTH_RANGE.0..=MODEL_LENGTH_RANGE.1).contains(&len) {
        return Err(ValidationError::ModelLengthInvalid(len));
    }
    if !model.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::ModelNotAlphanumeric(model.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> FirmwareSpec {
        FirmwareSpec {
            display_name: "Test".to_string(),
            model: "max".to_string(),
            boards: vec!["b1".to_string(), "b2".to_string()],
            type_flag: "DRV".to_string(),
            enforce_model: true,
            encryption: "plain".to_string(),
            schema_version: 1,
            params: None,
        }
    }

    #[test]
    fn test_valid_spec_resolves_flags() {
        let spec = valid().validate().unwrap();
        assert_eq!(spec.kind, FirmwareType::Drv);
        assert_eq!(spec.encryption, EncryptionMode::Plain);
        assert_eq!(spec.boards, vec!["b1", "b2"]);
        assert!(spec.params().is_none());
    }

    #[test]
    fn test_model_rules() {
        let check = |model: &str| {
            FirmwareSpec {
                model: model.to_string(),
                ..valid()
            }
            .validate()
        };

        assert_eq!(check(""), Err(ValidationError::MissingModel));
        assert_eq!(
            check("abcdefghijk"),
            Err(ValidationError::ModelLengthInvalid(11))
        );
        assert_eq!(
            check("abc-1"),
            Err(ValidationError::ModelNotAlphanumeric("abc-1".to_string()))
        );
        assert_eq!(
            check("ab c"),
            Err(ValidationError::ModelNotAlphanumeric("ab c".to_string()))
        );
        assert!(check("abcdefghij").is_ok());
        assert!(check("g").is_ok());
    }

    #[test]
    fn test_model_length_counts_characters() {
        // Ten characters but more than ten bytes.
        assert!(validate_model("ééééééééé1").is_ok());
        assert_eq!(
            validate_model("éééééééééé1"),
            Err(ValidationError::ModelLengthInvalid(11))
        );
    }

    #[test]
    fn test_unicode_letters_are_alphanumeric() {
        assert!(validate_model("Café1").is_ok());
        assert!(validate_model("Ｇ30").is_ok());
        assert_eq!(
            validate_model("Café-1"),
            Err(ValidationError::ModelNotAlphanumeric("Café-1".to_string()))
        );
    }

    #[test]
    fn test_boards_rules() {
        let empty = FirmwareSpec {
            boards: vec![],
            ..valid()
        };
        assert_eq!(empty.validate(), Err(ValidationError::BoardsEmpty));

        let single = FirmwareSpec {
            boards: vec!["x".to_string()],
            ..valid()
        };
        assert_eq!(single.validate().unwrap().boards, vec!["x"]);
    }

    #[test]
    fn test_flag_rules() {
        let enc = FirmwareSpec {
            encryption: "aes".to_string(),
            ..valid()
        };
        assert_eq!(
            enc.validate(),
            Err(ValidationError::InvalidEncryptionMode("aes".to_string()))
        );

        let typ = FirmwareSpec {
            type_flag: "ESC".to_string(),
            ..valid()
        };
        assert_eq!(
            typ.validate(),
            Err(ValidationError::InvalidTypeFlag("ESC".to_string()))
        );
    }

    #[test]
    fn test_unsupported_schema_wins_over_everything() {
        let spec = FirmwareSpec {
            schema_version: 2,
            model: String::new(),
            boards: vec![],
            encryption: "nope".to_string(),
            type_flag: "nope".to_string(),
            ..valid()
        };
        assert_eq!(spec.validate(), Err(ValidationError::UnsupportedSchema(2)));
    }

    #[test]
    fn test_rule_order() {
        // Every later rule is broken too; the earliest one is reported.
        let spec = FirmwareSpec {
            model: "abc-1".to_string(),
            boards: vec![],
            encryption: "nope".to_string(),
            type_flag: "nope".to_string(),
            ..valid()
        };
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::ModelNotAlphanumeric(_))
        ));

        let spec = FirmwareSpec {
            encryption: "nope".to_string(),
            type_flag: "nope".to_string(),
            ..valid()
        };
        assert!(matches!(
            spec.validate(),
            Err(ValidationError::InvalidEncryptionMode(_))
        ));
    }

    #[test]
    fn test_manifest_seed_has_no_checksums() {
        let manifest = valid().validate().unwrap().manifest();
        assert_eq!(manifest.schema_version, 1);
        assert_eq!(manifest.firmware.compatible, vec!["b1", "b2"]);
        assert!(manifest.firmware.enforce_model);
        assert!(manifest.firmware.md5.is_empty());
    }

    #[test]
    fn test_error_messages_list_allowed_flags() {
        let msg = ValidationError::InvalidTypeFlag("x".to_string()).to_string();
        assert_eq!(msg, "Invalid type flag \"x\" (allowed: DRV, BMS, BLE)");
    }
}
