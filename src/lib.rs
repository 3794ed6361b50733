pub mod codec;
pub mod field;
pub mod registry;
pub mod version;
pub mod plugin;
pub mod editor;
pub mod error;

pub use codec::{FieldKind, FieldValue};
pub use field::{FieldDescriptor, FieldId};
pub use registry::FieldRegistry;
pub use version::{Compatibility, VersionInfo};
pub use plugin::{ExtensionKind, PluginFile, Validity, WriteOutcome, MAGIC};
pub use editor::{EditOptions, PluginEditor};
pub use error::{Error, Result};
