//! Byte-backed enumerations stored in the plug-in header.
//!
//! An unmapped code is never an error: it decodes to
//! [`EnumValue::Unrecognized`] and the caller decides how loudly to say so.

use serde::Serialize;

// ── PluginType (in-file byte at offset 4) ────────────────────────────────────

/// Plug-in kind as recorded *inside* the file.
///
/// Unrelated to [`crate::plugin::ExtensionKind`], which is derived from the
/// file name and may disagree with this byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PluginType {
    Menu     = 0,
    Tool     = 1,
    Object   = 2,
    TextFile = 3,
}

impl PluginType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PluginType::Menu),
            1 => Some(PluginType::Tool),
            2 => Some(PluginType::Object),
            3 => Some(PluginType::TextFile),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PluginType::Menu     => "Menu command",
            PluginType::Tool     => "Tool command",
            PluginType::Object   => "Parametric object",
            PluginType::TextFile => "Text file",
        }
    }
}

// ── ByteOrdering (byte at offset 5) ──────────────────────────────────────────

/// TIFF-style byte-order marker: `'I'` (Intel) or `'M'` (Motorola).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ByteOrdering {
    LittleEndian = 73,
    BigEndian    = 77,
}

impl ByteOrdering {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'I' => Some(ByteOrdering::LittleEndian),
            b'M' => Some(ByteOrdering::BigEndian),
            _    => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ByteOrdering::LittleEndian => "Little Endian (Intel)",
            ByteOrdering::BigEndian    => "Big Endian (Motorola)",
        }
    }
}

// ── ByteEnum tag ─────────────────────────────────────────────────────────────

/// Selects the lookup table a byte-enum field decodes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ByteEnum {
    PluginType,
    ByteOrdering,
}

impl ByteEnum {
    pub fn name(self) -> &'static str {
        match self {
            ByteEnum::PluginType   => "plugin type",
            ByteEnum::ByteOrdering => "byte order",
        }
    }

    /// Label for `code`, or `None` if the table has no entry for it.
    pub fn label(self, code: u8) -> Option<&'static str> {
        match self {
            ByteEnum::PluginType   => PluginType::from_code(code).map(PluginType::label),
            ByteEnum::ByteOrdering => ByteOrdering::from_code(code).map(ByteOrdering::label),
        }
    }

    /// Shown in place of a label for codes the table does not map.
    pub fn unrecognized_label(self) -> &'static str {
        match self {
            ByteEnum::PluginType   => "Invalid or unknown plugin type",
            ByteEnum::ByteOrdering => "Unknown byte order",
        }
    }

    pub fn decode(self, code: u8) -> EnumValue {
        match self.label(code) {
            Some(label) => EnumValue::Known { code, label },
            None        => EnumValue::Unrecognized { code, label: self.unrecognized_label() },
        }
    }

    /// Inverse lookup by label (case-insensitive) or by the variant's short
    /// name, e.g. `"tool"` or `"Tool command"`.
    pub fn code_for(self, input: &str) -> Option<u8> {
        let wanted = input.trim().to_lowercase();
        (0..=u8::MAX).find(|&code| {
            self.label(code).is_some_and(|label| {
                let label = label.to_lowercase();
                label == wanted || label.split_whitespace().next() == Some(wanted.as_str())
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnumValue {
    Known { code: u8, label: &'static str },
    Unrecognized { code: u8, label: &'static str },
}

impl EnumValue {
    pub fn code(self) -> u8 {
        match self {
            EnumValue::Known { code, .. } | EnumValue::Unrecognized { code, .. } => code,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EnumValue::Known { label, .. } | EnumValue::Unrecognized { label, .. } => label,
        }
    }

    pub fn is_recognized(self) -> bool {
        matches!(self, EnumValue::Known { .. })
    }
}
