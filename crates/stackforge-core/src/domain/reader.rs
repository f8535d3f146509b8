//! Reading merged documents into domain values.
//!
//! This is the load boundary: every raw string is normalized here and
//! nothing downstream sees document values again.

use crate::domain::{
    document::{
        Options, Value, key_to_string, kind_name, options_at, scalar_string, scalar_to_string,
        to_json,
    },
    entities::{ApplicationConfiguration, DeploymentTarget, EntityDescriptor, GemConfiguration},
    error::DomainError,
    value_objects::Symbol,
};

/// Keys that must be present in every base document.
pub const REQUIRED_FIELDS: &[&str] = &["provider", "framework", "environment"];

/// Read `provider`, `framework`, `environment`, `region` and `generator`.
///
/// `framework` may be omitted when `generator` is given.
pub fn read_deployment(doc: &Value) -> Result<DeploymentTarget, DomainError> {
    let generator = non_empty(doc, "generator");
    let required = |field: &str| {
        non_empty(doc, field)
            .or_else(|| (field == "framework").then(|| generator.clone()).flatten())
            .map(|v| Symbol::new(&v))
            .ok_or_else(|| DomainError::MissingRequiredField {
                field: field.to_string(),
            })
    };

    Ok(DeploymentTarget {
        provider: required("provider")?,
        framework: required("framework")?,
        environment: required("environment")?,
        region: non_empty(doc, "region"),
        generator: generator.map(|g| Symbol::new(&g)),
    })
}

/// Read the application-level keys into a fresh configuration.
pub fn read_application(doc: &Value) -> Result<ApplicationConfiguration, DomainError> {
    let mut config = ApplicationConfiguration::new();

    if let Some(frontend) = scalar_field(doc, "frontend")? {
        config.set_frontend(frontend.as_str());
    }
    if let Some(css) = css_field(doc)? {
        config.set_css_framework(css.as_str());
    }
    if let Some(builder) = scalar_field(doc, "form_builder")? {
        config.set_form_builder(builder.as_str());
    }
    if let Some(engine) = scalar_field(doc, "template_engine")? {
        config.set_template_engine(engine.as_str());
    }
    if let Some(value) = doc.get("controller_inheritance") {
        match to_json(value) {
            serde_json::Value::Bool(enabled) => config.set_controller_inheritance(enabled),
            serde_json::Value::Null => {}
            _ => return Err(invalid("controller_inheritance", "expected a boolean")),
        }
    }

    if let Some(database) = scalar_field(doc, "database")? {
        config.set_database(database.as_str(), options_field(doc, "database_options")?);
    }
    if let Some(engine) = scalar_field(doc, "search_engine")? {
        config.enable_search_engine(engine.as_str(), options_field(doc, "search_engine_options")?);
    }
    if let Some(store) = scalar_field(doc, "vector_db")? {
        config.enable_vector_db(store.as_str(), options_field(doc, "vector_db_options")?);
    }
    if let Some(provider) = scalar_field(doc, "embedding_provider")? {
        config.set_embedding_provider(
            provider.as_str(),
            options_field(doc, "embedding_provider_options")?,
        );
    }

    for gem in sequence_field(doc, "gems")? {
        config.push_gem(read_gem(gem)?);
    }

    for tool in sequence_field(doc, "monitoring")? {
        let name = scalar_to_string(tool)
            .ok_or_else(|| invalid("monitoring", "entries must be tool names"))?;
        config.add_monitoring_tool(name.as_str());
    }

    match doc.get("features") {
        None | Some(Value::Null) => {}
        Some(Value::Mapping(features)) => {
            for (name, body) in features {
                let name = key_to_string(name);
                let Some((provider, options)) = read_feature(&name, body)? else {
                    continue;
                };
                config.enable_feature(&name, provider.as_deref(), options)?;
            }
        }
        Some(other) => return Err(invalid("features", &expected("a mapping", other))),
    }

    Ok(config)
}

/// Read the `models` mapping in declaration order.
pub fn read_entities(doc: &Value) -> Result<Vec<EntityDescriptor>, DomainError> {
    match doc.get("models") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Mapping(models)) => models
            .iter()
            .map(|(name, body)| EntityDescriptor::from_document(&key_to_string(name), body))
            .collect(),
        Some(other) => Err(invalid("models", &expected("a mapping", other))),
    }
}

/// A gem is either a bare name or a `{name, version, options}` record.
fn read_gem(value: &Value) -> Result<GemConfiguration, DomainError> {
    match value {
        Value::Mapping(_) => {
            let name = scalar_string(value, "name").unwrap_or_default();
            let version = scalar_string(value, "version");
            let options = options_at(value, "options").map_err(|e| invalid("gems", &e))?;
            Ok(GemConfiguration::new(name)?
                .with_version(version)
                .with_options(options))
        }
        other => match scalar_to_string(other) {
            Some(name) => GemConfiguration::new(name),
            None => Err(invalid("gems", &expected("a name or record", other))),
        },
    }
}

/// A feature body is `null`/`true` (default provider), `false` (disabled),
/// a provider name, or `{provider, ...options}`.
fn read_feature(
    name: &str,
    body: &Value,
) -> Result<Option<(Option<String>, Options)>, DomainError> {
    match body {
        Value::Null | Value::Bool(true) => Ok(Some((None, Options::new()))),
        Value::Bool(false) => Ok(None),
        Value::Mapping(_) => {
            let mut options = match to_json(body) {
                serde_json::Value::Object(map) => map,
                _ => Options::new(),
            };
            let provider = match options.remove("provider") {
                Some(serde_json::Value::String(p)) => Some(p),
                None | Some(serde_json::Value::Null) => None,
                Some(_) => {
                    return Err(invalid(
                        &format!("features.{name}.provider"),
                        "expected a string",
                    ));
                }
            };
            Ok(Some((provider, options)))
        }
        other => match scalar_to_string(other) {
            Some(provider) => Ok(Some((Some(provider), Options::new()))),
            None => Err(invalid(
                &format!("features.{name}"),
                &expected("a provider or mapping", other),
            )),
        },
    }
}

fn non_empty(doc: &Value, key: &str) -> Option<String> {
    scalar_string(doc, key).filter(|v| !v.trim().is_empty())
}

fn scalar_field(doc: &Value, key: &str) -> Result<Option<String>, DomainError> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(value)
            .map(Some)
            .ok_or_else(|| invalid(key, &expected("a string", value))),
    }
}

/// `css_framework: false` means no framework.
fn css_field(doc: &Value) -> Result<Option<String>, DomainError> {
    match doc.get("css_framework") {
        Some(Value::Bool(false)) => Ok(Some("none".into())),
        _ => scalar_field(doc, "css_framework"),
    }
}

fn options_field(doc: &Value, key: &str) -> Result<Options, DomainError> {
    options_at(doc, key).map_err(|reason| invalid(key, &reason))
}

fn sequence_field<'a>(doc: &'a Value, key: &str) -> Result<&'a [Value], DomainError> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Sequence(items)) => Ok(items),
        Some(other) => Err(invalid(key, &expected("a sequence", other))),
    }
}

fn expected(what: &str, found: &Value) -> String {
    format!("expected {what}, found {}", kind_name(found))
}

fn invalid(field: &str, reason: &str) -> DomainError {
    DomainError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
