//! Schema templates and the process-wide registry.
//!
//! A template is the empty-field JSON shape a record must follow. Loading
//! never fails hard: a missing or malformed resource yields
//! [`SchemaTemplate::Unavailable`], which the structural validator reports as
//! an error instead of treating it as an always-satisfied schema.

use crate::language::Language;
use crate::record::join_path;
use serde_json::{Map, Value};
use std::path::Path;

/// Bundled English template.
pub const EMPTY_TEMPLATE_EN: &str = include_str!("../templates/empty_json_en.json");

/// Bundled Hebrew template.
pub const EMPTY_TEMPLATE_HE: &str = include_str!("../templates/empty_json_he.json");

/// A node of a loaded schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// String-typed field (written as `""` in the template).
    Field,
    /// Nested section.
    Section(Schema),
}

/// Loaded template shape, in template key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, SchemaNode)>,
}

impl Schema {
    /// Parse a schema from a JSON object.
    ///
    /// Leaves must be strings; anything else is rejected with a description
    /// of the offending path.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Object(map) => Self::from_map(map, ""),
            _ => Err("template root must be a JSON object".to_string()),
        }
    }

    fn from_map(map: &Map<String, Value>, prefix: &str) -> Result<Self, String> {
        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            let path = join_path(prefix, key);
            let node = match value {
                Value::String(_) => SchemaNode::Field,
                Value::Object(child) => SchemaNode::Section(Self::from_map(child, &path)?),
                _ => return Err(format!("template field {path} must be a string or an object")),
            };
            fields.push((key.clone(), node));
        }
        Ok(Self { fields })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate direct children in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Dotted paths of every string field.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_leaf_paths("", &mut out);
        out
    }

    fn collect_leaf_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (key, node) in self.iter() {
            let path = join_path(prefix, key);
            match node {
                SchemaNode::Field => out.push(path),
                SchemaNode::Section(child) => child.collect_leaf_paths(&path, out),
            }
        }
    }

    /// The template as an empty-valued JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(key, node)| {
                    let value = match node {
                        SchemaNode::Field => Value::String(String::new()),
                        SchemaNode::Section(child) => child.to_json(),
                    };
                    (key.to_string(), value)
                })
                .collect(),
        )
    }

    /// Pretty-printed empty template, used in extraction prompts and downloads.
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.to_json()).unwrap_or_default()
    }
}

/// A template slot: either a usable schema or an explicit "no schema" state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaTemplate {
    Loaded(Schema),
    Unavailable { reason: String },
}

impl SchemaTemplate {
    /// Parse a template from JSON text. Never fails; see [`SchemaTemplate::Unavailable`].
    #[must_use]
    pub fn from_json_str(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                return Self::unavailable(format!("template is not valid JSON: {e}"));
            }
        };
        match Schema::from_json(&value) {
            Ok(schema) if schema.is_empty() => Self::unavailable("template has no fields"),
            Ok(schema) => Self::Loaded(schema),
            Err(reason) => Self::unavailable(reason),
        }
    }

    /// Load a template file. IO and parse failures degrade to `Unavailable`.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::from_json_str(&text) {
                Self::Unavailable { reason } => {
                    log::error!("Error loading template {}: {reason}", path.display());
                    Self::Unavailable { reason }
                }
                loaded => loaded,
            },
            Err(e) => {
                log::error!("Error loading template {}: {e}", path.display());
                Self::unavailable(format!("cannot read {}: {e}", path.display()))
            }
        }
    }

    fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            Self::Loaded(schema) => Some(schema),
            Self::Unavailable { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// File name of a language's template inside a templates directory.
#[must_use]
pub fn template_file_name(language: Language) -> String {
    format!("empty_json_{}.json", language.tag())
}

/// Both language templates, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    english: SchemaTemplate,
    hebrew: SchemaTemplate,
}

impl SchemaRegistry {
    /// Load `empty_json_en.json` and `empty_json_he.json` from `dir`.
    #[must_use]
    pub fn load_from_dir(dir: &Path) -> Self {
        let registry = Self {
            english: SchemaTemplate::load(&dir.join(template_file_name(Language::English))),
            hebrew: SchemaTemplate::load(&dir.join(template_file_name(Language::Hebrew))),
        };
        log::info!(
            "Loaded templates from {} (en: {}, he: {})",
            dir.display(),
            registry.english.is_available(),
            registry.hebrew.is_available()
        );
        registry
    }

    /// The templates compiled into this crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            english: SchemaTemplate::from_json_str(EMPTY_TEMPLATE_EN),
            hebrew: SchemaTemplate::from_json_str(EMPTY_TEMPLATE_HE),
        }
    }

    #[must_use]
    pub const fn get(&self, language: Language) -> &SchemaTemplate {
        match language {
            Language::English => &self.english,
            Language::Hebrew => &self.hebrew,
        }
    }
}
