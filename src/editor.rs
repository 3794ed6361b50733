//! High-level [`PluginEditor`] API: attribute names in, typed values out.
//!
//! ```no_run
//! use vsmedit::editor::{EditOptions, PluginEditor};
//!
//! let editor = PluginEditor::open("MyTool.vst", EditOptions::default())?;
//! println!("{}", editor.get("Universal")?);
//! let outcome = editor.set("Category", "Lighting")?;
//! assert!(!outcome.truncated);
//! # Ok::<(), vsmedit::Error>(())
//! ```

use std::fmt;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use log::{info, warn};
use serde::Serialize;

use crate::codec::{self, FieldValue};
use crate::error::{Error, Result};
use crate::field::FieldDescriptor;
use crate::plugin::{ExtensionKind, PluginFile, WriteOutcome};
use crate::registry::FieldRegistry;
use crate::version::{Compatibility, VersionInfo};

// ── EditOptions ──────────────────────────────────────────────────────────────

/// Configuration for [`PluginEditor::open`].
#[derive(Debug, Clone, Copy)]
pub struct EditOptions {
    /// Text encoding of string fields.
    pub encoding: &'static Encoding,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self { encoding: UTF_8 }
    }
}

impl EditOptions {
    /// Look up an encoding by WHATWG label (`"utf-8"`, `"windows-1252"`, `"macintosh"`…).
    ///
    /// Labels of encodings that cannot be written as bytes (UTF-16,
    /// replacement) are refused.
    pub fn with_encoding_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .filter(|encoding| encoding.output_encoding() == *encoding)
            .map(|encoding| Self { encoding })
    }
}

// ── FieldReading ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct FieldReading {
    pub name:  &'static str,
    pub value: FieldValue,
    /// Bytes the value was decoded from.
    #[serde(skip)]
    pub raw:   Vec<u8>,
}

impl fmt::Display for FieldReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}'", self.name, self.value)
    }
}

// ── PluginEditor ─────────────────────────────────────────────────────────────

/// A validated, version-checked plug-in file.
///
/// The signature and version are checked once in [`open`](Self::open); every
/// later `get`/`set` is an independent single-field transaction.
#[derive(Debug, Clone)]
pub struct PluginEditor {
    file:     PluginFile,
    version:  VersionInfo,
    registry: FieldRegistry,
    options:  EditOptions,
}

impl PluginEditor {
    pub fn open<P: AsRef<Path>>(path: P, options: EditOptions) -> Result<Self> {
        let file = PluginFile::open(path)?;
        file.validate()?.into_result()?;

        let version = file.version()?;
        info!(
            "opened {} ({:?}), format version {}",
            file.path().display(), file.extension_kind(), version
        );
        match version.compatibility {
            Compatibility::Unsupported => return Err(Error::UnsupportedVersion(version.ordinal)),
            Compatibility::Newer => warn!(
                "format version {} is newer than the supported version; attributes may not be where expected",
                version.ordinal
            ),
            Compatibility::Known => {}
        }
        if !version.has_unicode_strings() && options.encoding == UTF_8 {
            warn!(
                "format version {} predates UTF-8 strings; consider selecting a legacy encoding",
                version.ordinal
            );
        }

        Ok(Self { file, version, registry: FieldRegistry::builtin(), options })
    }

    pub fn path(&self) -> &Path { self.file.path() }
    pub fn file(&self) -> &PluginFile { &self.file }
    pub fn version(&self) -> VersionInfo { self.version }
    pub fn registry(&self) -> &FieldRegistry { &self.registry }
    pub fn options(&self) -> &EditOptions { &self.options }

    pub fn extension_kind(&self) -> ExtensionKind {
        self.file.extension_kind()
    }

    pub fn resolve(&self, name: &str) -> Result<&'static FieldDescriptor> {
        self.registry.resolve(name)
    }

    pub fn get(&self, name: &str) -> Result<FieldReading> {
        self.read(self.resolve(name)?)
    }

    pub fn read(&self, field: &'static FieldDescriptor) -> Result<FieldReading> {
        let raw = self.file.read_raw(field)?;
        let value = codec::decode(field.kind(), &raw, self.options.encoding);
        Ok(FieldReading { name: field.name(), value, raw })
    }

    /// Every built-in field, in listing order.
    pub fn read_all(&self) -> Result<Vec<FieldReading>> {
        self.registry.list().iter().map(|f| self.read(f)).collect()
    }

    pub fn set(&self, name: &str, value: &str) -> Result<WriteOutcome> {
        let field = self.resolve(name)?;
        let outcome = self.file.write_field(field, value, self.options.encoding)?;
        if outcome.truncated {
            warn!(
                "value for {} exceeds {} byte(s); stored '{}'",
                field.name(), field.max_chars().unwrap_or(0), outcome.stored
            );
        }
        Ok(outcome)
    }
}
