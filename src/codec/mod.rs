//! Field codec: pure byte ⇄ value conversion.
//!
//! Nothing here performs I/O or knows where a field lives in the file.
//! Dispatch is keyed on [`FieldKind`]; scalar widths come from the static
//! [`ScalarType::layout`] table and are always little-endian.
//!
//! # Failure policy
//! Decoding never fails. Short or empty buffers decode to zero / the empty
//! string, unmapped enum codes decode to [`EnumValue::Unrecognized`].
//! Encoding fails only when user input cannot be parsed for a non-string
//! kind.

pub mod enums;
pub mod pascal;

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::Encoding;
use serde::Serialize;

use crate::version::VersionInfo;
pub use enums::{ByteEnum, ByteOrdering, EnumValue, PluginType};
pub use pascal::EncodedString;

// ── Scalar type table ────────────────────────────────────────────────────────

/// On-disk geometry of a scalar type. Header scalars are always
/// little-endian; the ByteOrdering marker describes the payload that follows
/// the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarLayout {
    pub width:  u8,
    pub signed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScalarType {
    U8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
}

impl ScalarType {
    pub const fn layout(self) -> ScalarLayout {
        const fn of(width: u8, signed: bool) -> ScalarLayout {
            ScalarLayout { width, signed }
        }
        match self {
            ScalarType::U8  => of(1, false),
            ScalarType::U16 => of(2, false),
            ScalarType::I16 => of(2, true),
            ScalarType::U32 => of(4, false),
            ScalarType::I32 => of(4, true),
            ScalarType::U64 => of(8, false),
            ScalarType::I64 => of(8, true),
        }
    }

    pub const fn width(self) -> u8 {
        self.layout().width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Unsigned(u64),
    Signed(i64),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Unsigned(v) => write!(f, "{v}"),
            Scalar::Signed(v)   => write!(f, "{v}"),
        }
    }
}

/// Decode a scalar. A buffer shorter than the type width is zero-extended;
/// an empty buffer therefore yields zero.
pub fn decode_scalar(ty: ScalarType, data: &[u8]) -> Scalar {
    let width = ty.width() as usize;
    let mut buf = [0u8; 8];
    let n = data.len().min(width);
    buf[..n].copy_from_slice(&data[..n]);
    let buf = &buf[..width];
    match ty {
        ScalarType::U8  => Scalar::Unsigned(buf[0] as u64),
        ScalarType::U16 => Scalar::Unsigned(LittleEndian::read_u16(buf) as u64),
        ScalarType::I16 => Scalar::Signed(LittleEndian::read_i16(buf) as i64),
        ScalarType::U32 => Scalar::Unsigned(LittleEndian::read_u32(buf) as u64),
        ScalarType::I32 => Scalar::Signed(LittleEndian::read_i32(buf) as i64),
        ScalarType::U64 => Scalar::Unsigned(LittleEndian::read_u64(buf)),
        ScalarType::I64 => Scalar::Signed(LittleEndian::read_i64(buf)),
    }
}

/// Encode a scalar to exactly `ty.width()` bytes, or `None` if the value
/// does not fit the type.
pub fn encode_scalar(ty: ScalarType, value: Scalar) -> Option<Vec<u8>> {
    let (unsigned, signed) = match value {
        Scalar::Unsigned(v) => (Some(v), i64::try_from(v).ok()),
        Scalar::Signed(v)   => (u64::try_from(v).ok(), Some(v)),
    };
    let mut buf = vec![0u8; ty.width() as usize];
    match ty {
        ScalarType::U8  => buf[0] = u8::try_from(unsigned?).ok()?,
        ScalarType::U16 => LittleEndian::write_u16(&mut buf, u16::try_from(unsigned?).ok()?),
        ScalarType::I16 => LittleEndian::write_i16(&mut buf, i16::try_from(signed?).ok()?),
        ScalarType::U32 => LittleEndian::write_u32(&mut buf, u32::try_from(unsigned?).ok()?),
        ScalarType::I32 => LittleEndian::write_i32(&mut buf, i32::try_from(signed?).ok()?),
        ScalarType::U64 => LittleEndian::write_u64(&mut buf, unsigned?),
        ScalarType::I64 => LittleEndian::write_i64(&mut buf, signed?),
    }
    Some(buf)
}

// ── FieldKind ────────────────────────────────────────────────────────────────

/// Logical type tag of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Raw unsigned byte.
    Byte,
    /// Byte decoded through a lookup table.
    Enum { table: ByteEnum },
    /// Format-version ordinal. A raw byte, rendered via the version table.
    Version,
    /// Pascal string holding at most `max_chars` payload bytes.
    Text { max_chars: u8 },
}

impl FieldKind {
    /// Bytes occupied on disk.
    pub const fn stored_len(self) -> u64 {
        match self {
            FieldKind::Byte | FieldKind::Enum { .. } | FieldKind::Version => {
                ScalarType::U8.width() as u64
            }
            FieldKind::Text { max_chars } => max_chars as u64 + 1,
        }
    }
}

// ── FieldValue ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Byte(u8),
    Enum(EnumValue),
    Version(VersionInfo),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Byte(b) => write!(f, "{b}"),
            FieldValue::Enum(e) => f.write_str(e.label()),
            FieldValue::Version(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Decode `data` as `kind`.
pub fn decode(kind: FieldKind, data: &[u8], encoding: &'static Encoding) -> FieldValue {
    match kind {
        FieldKind::Byte => FieldValue::Byte(decode_byte(data)),
        FieldKind::Enum { table } => {
            let value = table.decode(decode_byte(data));
            if !value.is_recognized() {
                log::warn!("unrecognized {} code {}", table.name(), value.code());
            }
            FieldValue::Enum(value)
        }
        FieldKind::Version => FieldValue::Version(decode_version(data)),
        FieldKind::Text { .. } => FieldValue::Text(pascal::decode(data, encoding)),
    }
}

/// Version ordinal plus its description; unknown ordinals still decode.
pub fn decode_version(data: &[u8]) -> VersionInfo {
    VersionInfo::new(decode_byte(data))
}

fn decode_byte(data: &[u8]) -> u8 {
    match decode_scalar(ScalarType::U8, data) {
        Scalar::Unsigned(v) => v as u8,
        Scalar::Signed(v)   => v as u8,
    }
}

/// Encoded bytes ready to be written at a field's offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub bytes:     Vec<u8>,
    /// Text representation of what was stored.
    pub stored:    String,
    pub truncated: bool,
}

/// Encode user input for `kind`.
///
/// Strings are truncated to the kind's capacity; byte kinds accept a decimal
/// ordinal, enums additionally accept a label. Returns `None` for input that
/// cannot be represented, including text the encoding has no bytes for.
pub fn encode(kind: FieldKind, input: &str, encoding: &'static Encoding) -> Option<Encoded> {
    match kind {
        FieldKind::Text { max_chars } => {
            let EncodedString { bytes, stored, truncated } = pascal::encode(input, max_chars, encoding)?;
            Some(Encoded { bytes, stored, truncated })
        }
        FieldKind::Byte | FieldKind::Version => {
            let value: u64 = input.trim().parse().ok()?;
            byte_encoded(value)
        }
        FieldKind::Enum { table } => {
            let code = match input.trim().parse::<u64>() {
                Ok(v) => v,
                Err(_) => table.code_for(input)? as u64,
            };
            byte_encoded(code)
        }
    }
}

fn byte_encoded(value: u64) -> Option<Encoded> {
    let bytes = encode_scalar(ScalarType::U8, Scalar::Unsigned(value))?;
    Some(Encoded { stored: value.to_string(), bytes, truncated: false })
}
