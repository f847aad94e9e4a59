//! Field projection over positional records.
//!
//! Operators are parameterised by field indices chosen at configuration
//! time. Projectors are built once per operator, validated against the
//! declared record arity, and then applied to every record without
//! further checks. Projection is pure and never mutates the record.

use crate::flowstream::error::{EngineError, Result};
use crate::flowstream::record::{FieldValue, FlowRecord};

/// Separator between key-field renderings in a group key.
///
/// The ASCII unit separator cannot occur in a field's display rendering,
/// so concatenated keys never collide across field boundaries.
pub const GROUP_KEY_SEPARATOR: char = '\u{1f}';

/// Accessor for a single configured field position
#[derive(Debug, Clone, PartialEq)]
pub struct FieldProjector {
    index: usize,
}

impl FieldProjector {
    /// Create an accessor for the given position
    pub fn new(index: usize) -> Self {
        FieldProjector { index }
    }

    /// Check the configured position against a declared record arity
    pub fn validate(&self, arity: usize) -> Result<()> {
        if self.index >= arity {
            return Err(EngineError::config(format!(
                "field index {} out of range for records with {} fields",
                self.index, arity
            )));
        }
        Ok(())
    }

    /// Project the configured field out of a record
    pub fn project<'a>(&self, record: &'a FlowRecord) -> Result<&'a FieldValue> {
        record.field(self.index)
    }

    /// Project the configured field as a float, widening integers
    ///
    /// Used for time and duration selectors, which must be numeric.
    pub fn project_numeric(&self, record: &FlowRecord) -> Result<f64> {
        let value = self.project(record)?;
        value.as_f64().ok_or_else(|| {
            EngineError::schema_at(
                self.index,
                format!("expected a numeric field, found {}", value.type_name()),
            )
        })
    }
}

/// Generator of group keys from an ordered set of key fields
///
/// The group key is the concatenation, in declared order, of the display
/// renderings of each key field, separated by [`GROUP_KEY_SEPARATOR`].
/// With no key fields every record maps to the empty key, forming a
/// single global group.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyProjector {
    projectors: Vec<FieldProjector>,
}

impl KeyProjector {
    /// Create a key generator over the given positions, in order
    pub fn new(indices: &[usize]) -> Self {
        KeyProjector {
            projectors: indices.iter().copied().map(FieldProjector::new).collect(),
        }
    }

    /// Check every configured position against a declared record arity
    pub fn validate(&self, arity: usize) -> Result<()> {
        for projector in &self.projectors {
            projector.validate(arity)?;
        }
        Ok(())
    }

    /// Render the group key for a record
    pub fn group_key(&self, record: &FlowRecord) -> Result<String> {
        let mut key = String::new();
        for (position, projector) in self.projectors.iter().enumerate() {
            if position > 0 {
                key.push(GROUP_KEY_SEPARATOR);
            }
            key.push_str(&projector.project(record)?.to_display_string());
        }
        Ok(key)
    }
}
