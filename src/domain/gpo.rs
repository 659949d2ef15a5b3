//! Group Policy Object types
//!
//! A GPO lives in the directory as a `groupPolicyContainer` under
//! `CN=Policies,CN=System,<domain>`; its settings live in SYSVOL at
//! `gPCFileSysPath`.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Split `versionNumber`: user revisions in the high word, computer in the low word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpoVersion {
    pub user: u16,
    pub computer: u16,
}

impl GpoVersion {
    pub fn from_raw(raw: u32) -> Self {
        Self {
            user: (raw >> 16) as u16,
            computer: (raw & 0xFFFF) as u16,
        }
    }

    /// Parse the attribute value (AD Integer syntax, signed 32-bit); a missing
    /// or malformed value is version 0
    pub fn parse(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map(|v| Self::from_raw(v as u32))
            .unwrap_or_default()
    }
}

impl fmt::Display for GpoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {}, computer {}", self.user, self.computer)
    }
}

/// Which halves of the GPO are enabled (`flags` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GpoStatus {
    Enabled,
    UserSettingsDisabled,
    ComputerSettingsDisabled,
    AllSettingsDisabled,
    Unknown,
}

impl GpoStatus {
    pub fn from_flags(value: Option<&str>) -> Self {
        match value.and_then(|v| v.trim().parse::<i32>().ok()) {
            None | Some(0) => GpoStatus::Enabled,
            Some(1) => GpoStatus::UserSettingsDisabled,
            Some(2) => GpoStatus::ComputerSettingsDisabled,
            Some(3) => GpoStatus::AllSettingsDisabled,
            Some(_) => GpoStatus::Unknown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GpoStatus::Enabled => "Enabled",
            GpoStatus::UserSettingsDisabled => "User settings disabled",
            GpoStatus::ComputerSettingsDisabled => "Computer settings disabled",
            GpoStatus::AllSettingsDisabled => "All settings disabled",
            GpoStatus::Unknown => "Unknown",
        }
    }
}

/// A Group Policy Object read from the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPolicyObject {
    pub guid: String,
    pub name: String,
    pub path: Option<String>,
    pub version: GpoVersion,
    pub status: GpoStatus,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub distinguished_name: String,
}

/// Convert LDAP GeneralizedTime (`20240131094512.0Z`) to ISO 8601
pub fn generalized_time_to_iso8601(value: &str) -> Option<String> {
    let digits = value.get(..14)?;
    let datetime = NaiveDateTime::parse_from_str(digits, "%Y%m%d%H%M%S").ok()?;
    Some(datetime.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_split() {
        let version = GpoVersion::parse(Some("196611"));
        assert_eq!(version, GpoVersion { user: 3, computer: 3 });

        assert_eq!(GpoVersion::parse(Some("7")), GpoVersion { user: 0, computer: 7 });
        assert_eq!(GpoVersion::parse(None), GpoVersion::default());
        assert_eq!(GpoVersion::parse(Some("garbage")), GpoVersion::default());
    }

    #[test]
    fn test_version_uses_signed_32_bit_range() {
        assert_eq!(
            GpoVersion::parse(Some("-65536")),
            GpoVersion { user: 0xFFFF, computer: 0 }
        );
        assert_eq!(GpoVersion::parse(Some("4294967296")), GpoVersion::default());
        assert_eq!(GpoVersion::parse(Some("2147483648")), GpoVersion::default());
    }

    #[test]
    fn test_status_from_flags() {
        assert_eq!(GpoStatus::from_flags(Some("0")), GpoStatus::Enabled);
        assert_eq!(GpoStatus::from_flags(None), GpoStatus::Enabled);
        assert_eq!(GpoStatus::from_flags(Some("1")), GpoStatus::UserSettingsDisabled);
        assert_eq!(GpoStatus::from_flags(Some("2")), GpoStatus::ComputerSettingsDisabled);
        assert_eq!(GpoStatus::from_flags(Some("3")), GpoStatus::AllSettingsDisabled);
        assert_eq!(GpoStatus::from_flags(Some("9")), GpoStatus::Unknown);
    }

    #[test]
    fn test_generalized_time() {
        assert_eq!(
            generalized_time_to_iso8601("20240131094512.0Z").as_deref(),
            Some("2024-01-31T09:45:12Z")
        );
        assert_eq!(generalized_time_to_iso8601("2024"), None);
        assert_eq!(generalized_time_to_iso8601("20241399000000.0Z"), None);
    }
}
