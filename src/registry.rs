//! Attribute-name resolution over a fixed descriptor catalog.

use crate::error::{Error, Result};
use crate::field::{FieldDescriptor, FieldSummary, BUILTIN_FIELDS};

#[derive(Debug, Clone, Copy)]
pub struct FieldRegistry {
    fields: &'static [FieldDescriptor],
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FieldRegistry {
    pub fn builtin() -> Self {
        Self { fields: &BUILTIN_FIELDS }
    }

    #[cfg(test)]
    pub(crate) fn with_fields(fields: &'static [FieldDescriptor]) -> Self {
        Self { fields }
    }

    /// All descriptors in declaration order.
    pub fn list(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    pub fn summaries(&self) -> Vec<FieldSummary> {
        self.fields.iter().map(FieldDescriptor::summary).collect()
    }

    /// Resolve `query` by case-insensitive substring match.
    ///
    /// Exactly one hit succeeds. Several hits fail with
    /// [`Error::FieldAmbiguous`] listing every candidate, even when one of
    /// them matches exactly.
    pub fn resolve(&self, query: &str) -> Result<&'static FieldDescriptor> {
        let needle = query.to_lowercase();
        let hits: Vec<&'static FieldDescriptor> = self
            .fields
            .iter()
            .filter(|f| f.name().to_lowercase().contains(&needle))
            .collect();

        match hits.as_slice() {
            [] => Err(Error::FieldNotFound(query.to_owned())),
            [one] => Ok(*one),
            many => Err(Error::FieldAmbiguous {
                query:      query.to_owned(),
                candidates: many.iter().map(|f| f.name()).collect(),
            }),
        }
    }
}
