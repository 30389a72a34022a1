//! Property tests for structural validation and structure compliance.

use formcheck_core::metrics::structure_compliance;
use formcheck_core::{validate_structure, Record, Schema, SchemaTemplate, StructureViolation};
use proptest::prelude::*;
use proptest::sample::Index;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Two-level template shape: top-level key -> leaf (None) or section keys.
type Shape = BTreeMap<String, Option<Vec<String>>>;

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let section = prop::collection::btree_set("[a-z]{1,6}", 1..4)
        .prop_map(|keys| Some(keys.into_iter().collect::<Vec<_>>()));
    let node = prop_oneof![Just(None), section];
    prop::collection::btree_map("[a-z]{1,6}", node, 1..8)
}

fn build(shape: &Shape, leaf: &dyn Fn(&str) -> Value) -> Value {
    let mut root = Map::new();
    for (key, node) in shape {
        match node {
            None => {
                root.insert(key.clone(), leaf(key));
            }
            Some(children) => {
                let section: Map<String, Value> = children
                    .iter()
                    .map(|child| (child.clone(), leaf(&format!("{key}.{child}"))))
                    .collect();
                root.insert(key.clone(), Value::Object(section));
            }
        }
    }
    Value::Object(root)
}

fn template_of(shape: &Shape) -> SchemaTemplate {
    let value = build(shape, &|_| Value::String(String::new()));
    SchemaTemplate::Loaded(Schema::from_json(&value).unwrap())
}

fn filled_record(shape: &Shape, text: &str) -> Value {
    build(shape, &|path| Value::String(format!("{text}{path}")))
}

proptest! {
    #[test]
    fn conformant_records_validate(shape in shape_strategy(), text in "\\PC{0,8}") {
        let record = Record::from_json(filled_record(&shape, &text)).unwrap();
        prop_assert_eq!(validate_structure(&record, &template_of(&shape)), Ok(()));
    }

    #[test]
    fn removed_top_level_key_is_reported(shape in shape_strategy(), pick in any::<Index>()) {
        let keys: Vec<&String> = shape.keys().collect();
        let removed = keys[pick.index(keys.len())].clone();

        let mut value = filled_record(&shape, "v");
        value.as_object_mut().unwrap().remove(&removed);
        // An extra key must not mask the missing one.
        value.as_object_mut().unwrap().insert("EXTRA".into(), Value::String(String::new()));

        let record = Record::from_json(value).unwrap();
        prop_assert_eq!(
            validate_structure(&record, &template_of(&shape)),
            Err(StructureViolation::MissingField { path: removed })
        );
    }

    #[test]
    fn extra_key_is_reported(shape in shape_strategy()) {
        let mut value = filled_record(&shape, "v");
        value.as_object_mut().unwrap().insert("EXTRA".into(), Value::String("x".into()));

        let record = Record::from_json(value).unwrap();
        prop_assert_eq!(
            validate_structure(&record, &template_of(&shape)),
            Err(StructureViolation::UnexpectedField { path: "EXTRA".into() })
        );
    }

    #[test]
    fn same_path_set_is_fully_compliant(shape in shape_strategy(), a in "\\PC{0,8}", b in "\\PC{0,8}") {
        let reference = Record::from_json(filled_record(&shape, &a)).unwrap();
        let candidate = Record::from_json(filled_record(&shape, &b)).unwrap();
        prop_assert_eq!(structure_compliance(&reference, &candidate), 100.0);
    }

    #[test]
    fn compliance_stays_in_range(reference in shape_strategy(), candidate in shape_strategy()) {
        let reference = Record::from_json(filled_record(&reference, "")).unwrap();
        let candidate = Record::from_json(filled_record(&candidate, "")).unwrap();
        let score = structure_compliance(&reference, &candidate);
        prop_assert!((0.0..=100.0).contains(&score));
    }
}
