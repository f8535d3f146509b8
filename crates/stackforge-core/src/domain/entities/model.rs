//! Target-independent descriptions of the data models to generate.

use serde::Serialize;
use serde_json::json;

use crate::domain::{
    document::{Options, Value, key_to_string, kind_name, scalar_to_string, to_json},
    error::DomainError,
    value_objects::{AssociationKind, AttributeType, Symbol},
};

/// One typed attribute of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AttributeType,
}

/// Association options with the recognized keys lifted out and normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssociationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent: Option<Symbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub through: Option<Symbol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Symbol>,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub as_: Option<Symbol>,
    #[serde(flatten)]
    pub extra: Options,
}

impl AssociationOptions {
    /// Sort raw attrs into recognized symbols and passthrough values.
    ///
    /// A recognized key holding a string becomes a [`Symbol`]; a null value is
    /// dropped; any other value passes through unchanged.
    pub fn from_options(options: Options) -> Self {
        let mut out = Self::default();
        for (key, value) in options {
            let slot = match key.as_str() {
                "dependent" => Some(&mut out.dependent),
                "through" => Some(&mut out.through),
                "source" => Some(&mut out.source),
                "as" => Some(&mut out.as_),
                _ => None,
            };
            match (slot, value) {
                (_, serde_json::Value::Null) => {}
                (Some(slot), serde_json::Value::String(s)) => *slot = Some(Symbol::new(&s)),
                (_, other) => {
                    out.extra.insert(key, other);
                }
            }
        }
        out
    }

    /// Flat option bag: recognized symbols plus passthrough values.
    pub fn attrs(&self) -> Options {
        let mut attrs = self.extra.clone();
        for (key, value) in [
            ("dependent", &self.dependent),
            ("through", &self.through),
            ("source", &self.source),
            ("as", &self.as_),
        ] {
            if let Some(symbol) = value {
                attrs.insert(key.to_string(), json!(symbol.as_str()));
            }
        }
        attrs
    }
}

/// A relationship from one entity to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationDescriptor {
    pub kind: AssociationKind,
    pub name: String,
    pub options: AssociationOptions,
}

impl AssociationDescriptor {
    pub fn new(kind: AssociationKind, name: impl Into<String>, options: AssociationOptions) -> Self {
        Self {
            kind,
            name: name.into(),
            options,
        }
    }
}

/// The generator's abstract view of one data model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDescriptor {
    name: String,
    attributes: Vec<Attribute>,
    associations: Vec<AssociationDescriptor>,
}

impl EntityDescriptor {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "models.<name>".into(),
            });
        }
        Ok(Self {
            name,
            attributes: Vec::new(),
            associations: Vec::new(),
        })
    }

    /// Add an attribute. Redeclaring a name replaces its type in place.
    pub fn with_attribute(mut self, name: impl Into<String>, ty: AttributeType) -> Self {
        let name = name.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.ty = ty,
            None => self.attributes.push(Attribute { name, ty }),
        }
        self
    }

    pub fn with_association(mut self, association: AssociationDescriptor) -> Self {
        self.associations.push(association);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn associations(&self) -> &[AssociationDescriptor] {
        &self.associations
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.associations.is_empty()
    }

    /// Build from one entry of a `models` mapping.
    ///
    /// ```yaml
    /// User:
    ///   attributes: { email: string, name: string }
    ///   associations:
    ///     - { kind: has_many, name: posts, attrs: { dependent: destroy } }
    /// ```
    ///
    /// A null body declares an entity with no attributes or associations.
    pub fn from_document(name: &str, body: &Value) -> Result<Self, DomainError> {
        let mut entity = Self::new(name)?;
        let invalid = |reason: String| DomainError::InvalidEntity {
            entity: name.to_string(),
            reason,
        };

        match body {
            Value::Null => return Ok(entity),
            Value::Mapping(_) => {}
            other => {
                return Err(invalid(format!(
                    "expected a mapping, found {}",
                    kind_name(other)
                )));
            }
        }

        match body.get("attributes") {
            None | Some(Value::Null) => {}
            Some(Value::Mapping(attrs)) => {
                for (key, ty) in attrs {
                    let type_name = scalar_to_string(ty).ok_or_else(|| {
                        invalid(format!(
                            "attribute type must be a string, found {}",
                            kind_name(ty)
                        ))
                    })?;
                    entity = entity.with_attribute(key_to_string(key), type_name.parse()?);
                }
            }
            Some(other) => {
                return Err(invalid(format!(
                    "`attributes` must be a mapping, found {}",
                    kind_name(other)
                )));
            }
        }

        match body.get("associations") {
            None | Some(Value::Null) => {}
            Some(Value::Sequence(items)) => {
                for item in items {
                    entity = entity.with_association(parse_association(item).map_err(&invalid)?);
                }
            }
            Some(other) => {
                return Err(invalid(format!(
                    "`associations` must be a sequence, found {}",
                    kind_name(other)
                )));
            }
        }

        Ok(entity)
    }
}

fn parse_association(item: &Value) -> Result<AssociationDescriptor, String> {
    let field = |key: &str| {
        item.get(key)
            .and_then(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| format!("association is missing `{key}`"))
    };

    let kind: AssociationKind = field("kind")?.parse().map_err(|e: DomainError| e.to_string())?;
    let name = field("name")?;
    let options = match item.get("attrs").map(to_json) {
        None | Some(serde_json::Value::Null) => Options::new(),
        Some(serde_json::Value::Object(map)) => map,
        Some(_) => return Err("association `attrs` must be a mapping".into()),
    };

    Ok(AssociationDescriptor::new(
        kind,
        name.trim(),
        AssociationOptions::from_options(options),
    ))
}
