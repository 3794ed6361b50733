//! On-disk plug-in file access.
//!
//! A [`PluginFile`] holds only its path. Every operation opens the file,
//! transfers the bytes of one field and drops the handle before returning,
//! so nothing is cached between calls and nothing guards against another
//! writer touching the file in between.
//!
//! Writes are not atomic. An I/O failure mid-write surfaces as
//! [`Error::Io`] and may leave the field's byte range partially overwritten.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use log::debug;
use serde::Serialize;

use crate::codec::{self, FieldValue};
use crate::error::{Error, InvalidReason, Result};
use crate::field::{FieldDescriptor, FILE_VERSION};
use crate::version::VersionInfo;

/// Signature at offset 0 of every plug-in file.
pub const MAGIC: &[u8; 4] = b"MCVS";

// ── ExtensionKind ────────────────────────────────────────────────────────────

/// Plug-in kind implied by the file *name*.
///
/// Advisory only: it is never used to gate field access and is unrelated to
/// the in-file [`crate::codec::PluginType`] byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtensionKind {
    Menu,
    Tool,
    Object,
    Invalid,
}

impl ExtensionKind {
    /// Classify an extension; the leading dot is optional.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "vsm" => ExtensionKind::Menu,
            "vst" => ExtensionKind::Tool,
            "vso" => ExtensionKind::Object,
            _     => ExtensionKind::Invalid,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(ExtensionKind::Invalid, Self::from_extension)
    }

    pub fn extension(self) -> Option<&'static str> {
        match self {
            ExtensionKind::Menu    => Some(".vsm"),
            ExtensionKind::Tool    => Some(".vst"),
            ExtensionKind::Object  => Some(".vso"),
            ExtensionKind::Invalid => None,
        }
    }
}

// ── Validity ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(InvalidReason),
}

impl Validity {
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }

    /// Turn an invalid verdict into [`Error::InvalidFile`].
    pub fn into_result(self) -> Result<()> {
        match self {
            Validity::Valid           => Ok(()),
            Validity::Invalid(reason) => Err(Error::InvalidFile(reason)),
        }
    }
}

// ── WriteOutcome ─────────────────────────────────────────────────────────────

/// What [`PluginFile::write_field`] actually put on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteOutcome {
    pub field:         &'static str,
    pub bytes_written: usize,
    /// The value as stored, after any truncation.
    pub stored:        String,
    pub truncated:     bool,
}

// ── PluginFile ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PluginFile {
    path: PathBuf,
}

impl PluginFile {
    /// Bind to an existing regular file. Does not validate its contents.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_owned();
        if !std::fs::metadata(&path)?.is_file() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn extension_kind(&self) -> ExtensionKind {
        ExtensionKind::from_path(&self.path)
    }

    /// Check the length and the magic signature.
    ///
    /// An unreadable file is an `Err`; a readable file with the wrong
    /// contents is `Ok(Validity::Invalid(_))`.
    pub fn validate(&self) -> Result<Validity> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();
        if len < MAGIC.len() as u64 {
            return Ok(Validity::Invalid(InvalidReason::TooShort { len }));
        }
        let mut found = [0u8; 4];
        file.read_exact(&mut found)?;
        if &found != MAGIC {
            return Ok(Validity::Invalid(InvalidReason::BadMagic { found }));
        }
        Ok(Validity::Valid)
    }

    /// Read up to `field.stored_len()` bytes at the field's offset.
    /// Fewer bytes are returned when the file ends early.
    pub fn read_raw(&self, field: &FieldDescriptor) -> Result<Vec<u8>> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(field.offset()))?;
        let mut buf = Vec::with_capacity(field.stored_len() as usize);
        file.take(field.stored_len()).read_to_end(&mut buf)?;
        debug!(
            "read {} @ {}: {}/{} byte(s)",
            field.name(), field.offset(), buf.len(), field.stored_len()
        );
        Ok(buf)
    }

    pub fn read_field(&self, field: &FieldDescriptor, encoding: &'static Encoding) -> Result<FieldValue> {
        let raw = self.read_raw(field)?;
        Ok(codec::decode(field.kind(), &raw, encoding))
    }

    pub fn version(&self) -> Result<VersionInfo> {
        let raw = self.read_raw(&FILE_VERSION)?;
        Ok(codec::decode_version(&raw))
    }

    /// Encode `input` for `field` and write it at the field's offset.
    ///
    /// Read-only fields are rejected before the file is opened. Only the
    /// encoded bytes are written; the rest of the field is left as is.
    pub fn write_field(
        &self,
        field:    &FieldDescriptor,
        input:    &str,
        encoding: &'static Encoding,
    ) -> Result<WriteOutcome> {
        if field.is_read_only() {
            return Err(Error::ReadOnlyField(field.name()));
        }
        let encoded = codec::encode(field.kind(), input, encoding).ok_or_else(|| Error::InvalidValue {
            field: field.name(),
            value: input.to_owned(),
        })?;

        let mut file = OpenOptions::new().write(true).open(&self.path)?;
        file.seek(SeekFrom::Start(field.offset()))?;
        file.write_all(&encoded.bytes)?;
        file.flush()?;
        debug!("wrote {} @ {}: {} byte(s)", field.name(), field.offset(), encoded.bytes.len());

        Ok(WriteOutcome {
            field:         field.name(),
            bytes_written: encoded.bytes.len(),
            stored:        encoded.stored,
            truncated:     encoded.truncated,
        })
    }
}
