//! Closed flag sets carried in the manifest.

use serde::{Deserialize, Serialize};

/// Which controller of the vehicle a firmware image targets.
///
/// The updater uses this to pick the board identifier it compares against
/// the manifest's `compatible` list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum FirmwareType {
    /// Motor driver controller.
    Drv,
    /// Battery management system.
    Bms,
    /// Bluetooth dashboard module.
    Ble,
}

impl FirmwareType {
    /// Every accepted type flag, in the order they are listed to users.
    pub const ALL: [Self; 3] = [Self::Drv, Self::Bms, Self::Ble];

    /// Wire representation used in the manifest.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drv => "DRV",
            Self::Bms => "BMS",
            Self::Ble => "BLE",
        }
    }
}

impl std::fmt::Display for FirmwareType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FirmwareType {
    type Err = String;

    /// Flags are matched exactly; `drv` is not `DRV`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown firmware type: {s}"))
    }
}

/// Which firmware artifacts a package carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionMode {
    /// Only the raw image (`FIRM.bin`).
    Plain,
    /// Only the transformed image (`FIRM.bin.enc`).
    Encrypted,
    /// Both images side by side.
    Both,
}

impl EncryptionMode {
    /// Every accepted encryption flag.
    pub const ALL: [Self; 3] = [Self::Plain, Self::Encrypted, Self::Both];

    /// Wire representation used in the manifest.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Encrypted => "encrypted",
            Self::Both => "both",
        }
    }

    /// Whether the plaintext `FIRM.bin` member is emitted.
    pub fn includes_plain(&self) -> bool {
        matches!(self, Self::Plain | Self::Both)
    }

    /// Whether the transformed `FIRM.bin.enc` member is emitted.
    pub fn includes_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted | Self::Both)
    }
}

impl std::fmt::Display for EncryptionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EncryptionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown encryption mode: {s}"))
    }
}

/// Render a closed flag set as `A, B, C` for error messages.
pub fn allowed_list<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_flags_are_case_sensitive() {
        assert_eq!("BMS".parse::<FirmwareType>(), Ok(FirmwareType::Bms));
        assert!("bms".parse::<FirmwareType>().is_err());
        assert!("ESC".parse::<FirmwareType>().is_err());
    }

    #[test]
    fn test_encryption_mode_members() {
        assert!(EncryptionMode::Plain.includes_plain());
        assert!(!EncryptionMode::Plain.includes_encrypted());
        assert!(!EncryptionMode::Encrypted.includes_plain());
        assert!(EncryptionMode::Both.includes_plain());
        assert!(EncryptionMode::Both.includes_encrypted());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&(FirmwareType::Ble, EncryptionMode::Encrypted)).unwrap();
        assert_eq!(json, r#"["BLE","encrypted"]"#);
    }

    #[test]
    fn test_allowed_list() {
        assert_eq!(allowed_list(&FirmwareType::ALL), "DRV, BMS, BLE");
        assert_eq!(allowed_list(&EncryptionMode::ALL), "plain, encrypted, both");
    }
}
