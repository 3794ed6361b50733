use std::fmt;

use serde::Serialize;

/// Lowest format version this crate accepts.
pub const MIN: u8 = 1;
/// Strings are stored as UTF-8 from this version on (Vectorworks 23.x).
pub const UNICODE_SUPPORT: u8 = 12;
/// Highest format version with a known layout.
pub const CURRENT: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Compatibility {
    /// Below [`MIN`]; do not touch the file.
    Unsupported,
    Known,
    /// Above [`CURRENT`]; fields may have moved.
    Newer,
}

pub fn classify(ordinal: u8) -> Compatibility {
    match ordinal {
        v if v < MIN     => Compatibility::Unsupported,
        v if v > CURRENT => Compatibility::Newer,
        _                => Compatibility::Known,
    }
}

/// Product release a version ordinal belongs to; empty when unknown.
pub fn describe(ordinal: u8) -> &'static str {
    match ordinal {
        CURRENT => "VectorWorks 23.x and later (unicode support) [current]",
        1  => "VectorWorks 8.0 - 8.5.2",
        2  => "VectorWorks 9.0",
        3  => "VectorWorks 10.0",  // adds miscellaneous strings
        4  => "VectorWorks 10.0",  // adds alternate names
        5  => "VectorWorks 11.x",
        6  => "VectorWorks 12.x",
        7  => "VectorWorks 13.x",
        8  => "VectorWorks 14.x",
        9  => "VectorWorks 15.x",
        10 => "VectorWorks 19.x",
        11 => "VectorWorks 19.x - 22.x",  // marks files broken by version 10
        _  => "",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub ordinal:       u8,
    pub description:   &'static str,
    pub compatibility: Compatibility,
}

impl VersionInfo {
    pub fn new(ordinal: u8) -> Self {
        Self {
            ordinal,
            description:   describe(ordinal),
            compatibility: classify(ordinal),
        }
    }

    /// Whether string payloads in this version are UTF-8.
    pub fn has_unicode_strings(&self) -> bool {
        self.ordinal >= UNICODE_SUPPORT
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.ordinal)
        } else {
            write!(f, "{} - {}", self.ordinal, self.description)
        }
    }
}
