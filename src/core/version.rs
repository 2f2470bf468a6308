use crate::error::{Error, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// A single numbered component of a project file version.
///
/// Variant names double as the field names the project format uses
/// (`<VerInfo_MajorVer>`, `<VersionInfo Name="MajorVer">`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum VersionPart {
    MajorVer,
    MinorVer,
    Release,
    Build,
}

impl VersionPart {
    pub const ALL: [VersionPart; 4] = [
        VersionPart::MajorVer,
        VersionPart::MinorVer,
        VersionPart::Release,
        VersionPart::Build,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            VersionPart::MajorVer => "MajorVer",
            VersionPart::MinorVer => "MinorVer",
            VersionPart::Release => "Release",
            VersionPart::Build => "Build",
        }
    }
}

/// Four-part project version. Build is always 0 when parsed from user input.
///
/// The composite rendering keeps the input text as typed (`01.2.3` stays
/// `01.2.3.0`); part values are decimal digit strings without leading zeros,
/// so arbitrarily large components survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Version {
    composite: String,
    parts: [String; 4],
}

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)$").unwrap());

fn canonical_digits(digits: &str) -> String {
    match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

impl Version {
    /// Parse a `major.minor.release` string. Anything else is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let caps = VERSION_PATTERN
            .captures(input)
            .ok_or_else(|| Error::version_invalid_format(input))?;

        Ok(Self {
            composite: format!("{}.0", input),
            parts: [
                canonical_digits(&caps[1]),
                canonical_digits(&caps[2]),
                canonical_digits(&caps[3]),
                "0".to_string(),
            ],
        })
    }

    /// Decimal value of one component.
    pub fn part(&self, part: VersionPart) -> &str {
        let index = match part {
            VersionPart::MajorVer => 0,
            VersionPart::MinorVer => 1,
            VersionPart::Release => 2,
            VersionPart::Build => 3,
        };
        &self.parts[index]
    }

    pub fn is_zero(&self, part: VersionPart) -> bool {
        self.part(part) == "0"
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_three_part_version() {
        let version = Version::parse("1.2.3").unwrap();
        assert_eq!(version.part(VersionPart::MajorVer), "1");
        assert_eq!(version.part(VersionPart::MinorVer), "2");
        assert_eq!(version.part(VersionPart::Release), "3");
        assert!(version.is_zero(VersionPart::Build));
    }

    #[test]
    fn display_appends_zero_build() {
        assert_eq!(Version::parse("10.0.42").unwrap().to_string(), "10.0.42.0");
    }

    #[test]
    fn parse_rejects_malformed_versions() {
        for bad in [
            "", "1", "1.2", "1.2.3.4", ".1.2", "1.2.", "1..2", "a.b.c", "1.2.3-beta", " 1.2.3",
            "v1.2.3",
        ] {
            let err = Version::parse(bad).unwrap_err();
            assert_eq!(err.code.as_str(), "version.invalid_format", "{:?}", bad);
        }
    }

    #[test]
    fn composite_keeps_input_text() {
        assert_eq!(Version::parse("01.2.3").unwrap().to_string(), "01.2.3.0");
    }

    #[test]
    fn leading_zeros_drop_from_parts() {
        let version = Version::parse("01.00.3").unwrap();
        assert_eq!(version.part(VersionPart::MajorVer), "1");
        assert_eq!(version.part(VersionPart::MinorVer), "0");
        assert!(version.is_zero(VersionPart::MinorVer));
    }

    #[test]
    fn large_components_are_accepted() {
        let version = Version::parse("4294967296.0.99999999999999999999").unwrap();
        assert_eq!(version.to_string(), "4294967296.0.99999999999999999999.0");
        assert_eq!(version.part(VersionPart::MajorVer), "4294967296");
        assert_eq!(version.part(VersionPart::Release), "99999999999999999999");
    }

    #[test]
    fn non_ascii_digits_are_rejected() {
        let err = Version::parse("\u{0661}.2.3").unwrap_err();
        assert_eq!(err.code.as_str(), "version.invalid_format");
    }

    #[test]
    fn part_maps_each_component() {
        let version = Version::parse("4.5.6").unwrap();
        let values: Vec<&str> = VersionPart::ALL.iter().map(|p| version.part(*p)).collect();
        assert_eq!(values, vec!["4", "5", "6", "0"]);
    }
}
