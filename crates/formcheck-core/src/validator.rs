//! Strict two-way structural validation of a record against a template.

use crate::error::StructureViolation;
use crate::record::{join_path, Record, RecordNode};
use crate::schema::{Schema, SchemaNode, SchemaTemplate};

/// Check that `record` has exactly the shape of `template`.
///
/// At each level the template's keys are checked first, depth-first in
/// template order (missing field, section expected, string expected); only
/// then are the record's own keys checked for fields the template lacks.
/// The first violation is returned.
///
/// # Errors
/// Returns the first [`StructureViolation`] found, or
/// [`StructureViolation::SchemaUnavailable`] when no template is loaded.
pub fn validate_structure(
    record: &Record,
    template: &SchemaTemplate,
) -> Result<(), StructureViolation> {
    match template {
        SchemaTemplate::Loaded(schema) => check_section(record, schema, ""),
        SchemaTemplate::Unavailable { reason } => {
            log::warn!("Structural validation requested without a template: {reason}");
            Err(StructureViolation::SchemaUnavailable)
        }
    }
}

fn check_section(record: &Record, schema: &Schema, prefix: &str) -> Result<(), StructureViolation> {
    for (key, expected) in schema.iter() {
        let path = join_path(prefix, key);
        let Some(actual) = record.get(key) else {
            return Err(StructureViolation::MissingField { path });
        };

        match (expected, actual) {
            (SchemaNode::Section(child_schema), RecordNode::Section(child_record)) => {
                check_section(child_record, child_schema, &path)?;
            }
            (SchemaNode::Section(_), _) => {
                return Err(StructureViolation::ExpectedSection { path });
            }
            (SchemaNode::Field, RecordNode::Leaf(_)) => {}
            (SchemaNode::Field, _) => {
                return Err(StructureViolation::ExpectedString { path });
            }
        }
    }

    if let Some(extra) = record.keys().find(|key| !schema.contains_key(key)) {
        return Err(StructureViolation::UnexpectedField {
            path: join_path(prefix, extra),
        });
    }

    Ok(())
}
