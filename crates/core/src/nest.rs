//! Nested field groups
//!
//! A group is an ordered, immutable list of fields replayed under a named
//! sub-scope. Groups are built bottom-up, so nesting to any depth cannot
//! form a cycle.

use crate::field::{Field, add_fields};
use crate::keyvalue::{KeyValue, LogMarshaler};
use std::sync::Arc;

/// An ordered group of fields acting as a single marshaler
///
/// Cloning is O(1); the fields are shared.
#[derive(Debug, Clone, Default)]
pub struct Fields(Arc<[Field]>);

impl Fields {
    pub fn as_slice(&self) -> &[Field] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Field>> for Fields {
    fn from(fields: Vec<Field>) -> Self {
        Fields(fields.into())
    }
}

impl From<&[Field]> for Fields {
    fn from(fields: &[Field]) -> Self {
        Fields(fields.into())
    }
}

impl<const N: usize> From<[Field; N]> for Fields {
    fn from(fields: [Field; N]) -> Self {
        Fields(Arc::from(Vec::from(fields)))
    }
}

impl FromIterator<Field> for Fields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Fields(iter.into_iter().collect())
    }
}

impl LogMarshaler for Fields {
    /// Inner failures are absorbed into inner `<key>Error` fields, so the
    /// group itself never fails.
    fn marshal_log(&self, kv: &mut dyn KeyValue) -> crate::Result<()> {
        add_fields(kv, &self.0);
        Ok(())
    }
}
