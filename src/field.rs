//! Field descriptors: name → byte geometry and write policy.
//!
//! Descriptors can only be built inside this crate; the six header fields
//! below are the complete set.

use serde::Serialize;

use crate::codec::{ByteEnum, FieldKind};

/// Identity of a built-in header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldId {
    PluginType,
    ByteOrdering,
    UniversalName,
    Category,
    FileVersion,
    LocalizedName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    id:        FieldId,
    name:      &'static str,
    offset:    u64,
    kind:      FieldKind,
    read_only: bool,
}

impl FieldDescriptor {
    pub(crate) const fn new(id: FieldId, name: &'static str, offset: u64, kind: FieldKind, read_only: bool) -> Self {
        Self { id, name, offset, kind, read_only }
    }

    pub(crate) const fn text(id: FieldId, name: &'static str, offset: u64, max_chars: u8) -> Self {
        Self::new(id, name, offset, FieldKind::Text { max_chars }, false)
    }

    pub fn id(&self) -> FieldId { self.id }
    pub fn name(&self) -> &'static str { self.name }
    pub fn offset(&self) -> u64 { self.offset }
    pub fn kind(&self) -> FieldKind { self.kind }
    pub fn is_read_only(&self) -> bool { self.read_only }

    /// Bytes occupied on disk (`max_chars + 1` for strings).
    pub fn stored_len(&self) -> u64 { self.kind.stored_len() }

    pub fn end(&self) -> u64 { self.offset + self.stored_len() }

    /// Maximum payload length for string fields.
    pub fn max_chars(&self) -> Option<u8> {
        match self.kind {
            FieldKind::Text { max_chars } => Some(max_chars),
            _ => None,
        }
    }

    pub fn summary(&self) -> FieldSummary {
        FieldSummary {
            name:       self.name,
            offset:     self.offset,
            length:     self.stored_len(),
            kind:       self.kind,
            read_only:  self.read_only,
        }
    }
}

/// Serializable catalog row.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub name:      &'static str,
    pub offset:    u64,
    pub length:    u64,
    pub kind:      FieldKind,
    pub read_only: bool,
}

// ── Built-in header fields ───────────────────────────────────────────────────

pub const PLUGIN_TYPE: FieldDescriptor = FieldDescriptor::new(
    FieldId::PluginType, "PluginType", 4, FieldKind::Enum { table: ByteEnum::PluginType }, true,
);
pub const BYTE_ORDERING: FieldDescriptor = FieldDescriptor::new(
    FieldId::ByteOrdering, "ByteOrdering", 5, FieldKind::Enum { table: ByteEnum::ByteOrdering }, true,
);
pub const UNIVERSAL_NAME: FieldDescriptor = FieldDescriptor::text(FieldId::UniversalName, "UniversalName", 6, 63);
pub const CATEGORY: FieldDescriptor = FieldDescriptor::text(FieldId::Category, "Category", 70, 63);
pub const FILE_VERSION: FieldDescriptor = FieldDescriptor::new(
    FieldId::FileVersion, "FileVersion", 134, FieldKind::Version, true,
);
pub const LOCALIZED_NAME: FieldDescriptor = FieldDescriptor::text(FieldId::LocalizedName, "LocalizedName", 162, 63);

/// Declaration order is the listing order.
pub static BUILTIN_FIELDS: [FieldDescriptor; 6] = [
    PLUGIN_TYPE,
    BYTE_ORDERING,
    UNIVERSAL_NAME,
    CATEGORY,
    FILE_VERSION,
    LOCALIZED_NAME,
];

/// End of the header region covered by the built-in fields.
pub const HEADER_LEN: u64 = 226;
