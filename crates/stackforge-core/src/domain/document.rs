//! Declarative documents and the deep-merge algorithm.
//!
//! A document is an order-preserving YAML value tree (`serde_yaml::Value`),
//! whatever format it was written in. Keeping the source order matters:
//! attribute declarations and model lists end up in the manifest in the order
//! the author wrote them.
//!
//! Option bags leave this module as `serde_json` objects (`Options`): once a
//! value is past the load boundary nobody needs YAML specifics such as tags or
//! non-string keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use serde_yaml::{Mapping, Value};

/// Open key → value mapping carried by configuration options.
///
/// Backed by an ordered map so iteration (and therefore every manifest built
/// from it) is deterministic.
pub type Options = serde_json::Map<String, serde_json::Value>;

// ── Formats ──────────────────────────────────────────────────────────────────

/// Serialization format of a declarative document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Extensions tried when looking a document up by id, in priority order.
    pub const EXTENSIONS: &'static [&'static str] = &["yml", "yaml", "json", "toml"];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unparsed document text as returned by a document source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub id: String,
    pub format: DocumentFormat,
    pub text: String,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, format: DocumentFormat, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            format,
            text: text.into(),
        }
    }

    pub fn yaml(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, DocumentFormat::Yaml, text)
    }

    /// Parse the text into a mapping document.
    ///
    /// An empty document parses to an empty mapping. Any other non-mapping
    /// root is rejected.
    pub fn parse(&self) -> Result<Value, String> {
        let value: Value = match self.format {
            DocumentFormat::Yaml => serde_yaml::from_str(&self.text).map_err(|e| e.to_string())?,
            DocumentFormat::Json => serde_json::from_str(&self.text).map_err(|e| e.to_string())?,
            DocumentFormat::Toml => toml::from_str(&self.text).map_err(|e| e.to_string())?,
        };

        match value {
            Value::Null => Ok(Value::Mapping(Mapping::new())),
            Value::Mapping(_) => Ok(value),
            other => Err(format!(
                "document root must be a mapping, found {}",
                kind_name(&other)
            )),
        }
    }
}

// ── Merge ────────────────────────────────────────────────────────────────────

/// Deep-merge `source` over `target`, returning a new document.
///
/// - mapping + mapping: merged key by key, recursively
/// - anything else: `source` replaces `target` wholesale (sequences are
///   replaced, never concatenated)
/// - keys only in `target` are kept in their original position; keys only in
///   `source` are appended in `source` order
///
/// Neither input is modified, and the result depends only on the input
/// values, so `merge(merge(a, b), b) == merge(a, b)`.
pub fn deep_merge(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Mapping(base), Value::Mapping(overrides)) => {
            let mut merged = base.clone();
            for (key, override_value) in overrides {
                let next = match base.get(key) {
                    Some(base_value) if base_value.is_mapping() && override_value.is_mapping() => {
                        deep_merge(base_value, override_value)
                    }
                    _ => override_value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Mapping(merged)
        }
        _ => source.clone(),
    }
}

// ── Accessors ────────────────────────────────────────────────────────────────

/// Read a scalar field as a string (numbers and booleans are stringified).
pub fn scalar_string(doc: &Value, key: &str) -> Option<String> {
    doc.get(key).and_then(scalar_to_string)
}

pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

/// Read a mapping-valued field as `Options`; absent or null yields empty.
pub fn options_at(doc: &Value, key: &str) -> Result<Options, String> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(Options::new()),
        Some(Value::Mapping(map)) => Ok(mapping_to_options(map)),
        Some(other) => Err(format!(
            "`{key}` must be a mapping, found {}",
            kind_name(other)
        )),
    }
}

/// Convert a YAML mapping into an option bag, coercing boolean-looking
/// strings.
pub fn mapping_to_options(map: &Mapping) -> Options {
    map.iter()
        .map(|(k, v)| (key_to_string(k), to_json(v)))
        .collect()
}

/// Convert a YAML value into JSON.
///
/// The literal strings `"true"` and `"false"` become booleans; source
/// documents frequently quote them.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
        }
        Value::String(s) => coerce_string(s),
        Value::Sequence(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Mapping(map) => serde_json::Value::Object(mapping_to_options(map)),
        Value::Tagged(tagged) => to_json(&tagged.value),
    }
}

/// Coerce a JSON value that may hold `"true"` / `"false"` to a boolean.
pub fn coerce_bool(value: &serde_json::Value) -> Option<bool> {
    match value {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_string(s: &str) -> serde_json::Value {
    match s {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        other => serde_json::Value::String(other.to_owned()),
    }
}

pub fn key_to_string(key: &Value) -> String {
    scalar_to_string(key).unwrap_or_else(|| {
        serde_yaml::to_string(key)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    })
}

/// Human-readable name of a value's kind, for error messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
