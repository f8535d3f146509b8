use serde::Deserialize;
use serde_json::json;

use crate::domain::{document::Options, error::DomainError};

/// One dependency of the generated application.
///
/// Immutable once constructed; the `with_*` methods consume and return the
/// value, so a gem is only ever shaped before it is stored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "GemRecord")]
pub struct GemConfiguration {
    name: String,
    version: Option<String>,
    options: Options,
}

impl GemConfiguration {
    /// Create a dependency. The name must be non-empty after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidGem("name must not be empty".into()));
        }
        Ok(Self {
            name,
            version: None,
            options: Options::new(),
        })
    }

    /// Attach a version constraint such as `"~> 7.1"`. Blank constraints are
    /// treated as absent.
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version.filter(|v| !v.trim().is_empty());
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn to_representation(&self) -> serde_json::Value {
        json!({
            "name": self.name,
            "version": self.version,
            "options": self.options,
        })
    }
}

/// Wire shape accepted when deserializing; validated into a
/// [`GemConfiguration`].
#[derive(Deserialize)]
struct GemRecord {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    options: Options,
}

impl TryFrom<GemRecord> for GemConfiguration {
    type Error = DomainError;

    fn try_from(record: GemRecord) -> Result<Self, Self::Error> {
        Ok(GemConfiguration::new(record.name)?
            .with_version(record.version)
            .with_options(record.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        assert!(GemConfiguration::new("   ").is_err());
        assert!(GemConfiguration::new("").is_err());
    }

    #[test]
    fn blank_version_is_absent() {
        let gem = GemConfiguration::new("pg")
            .unwrap()
            .with_version(Some(" ".into()));
        assert_eq!(gem.version(), None);
    }

    #[test]
    fn representation_round_trips() {
        let mut options = Options::new();
        options.insert("require".into(), json!(false));
        let gem = GemConfiguration::new("bootsnap")
            .unwrap()
            .with_version(Some(">= 1.4".into()))
            .with_options(options);

        let back: GemConfiguration = serde_json::from_value(gem.to_representation()).unwrap();
        assert_eq!(back, gem);
    }

    #[test]
    fn deserialization_validates_name() {
        let result: Result<GemConfiguration, _> = serde_json::from_value(json!({"name": ""}));
        assert!(result.is_err());
    }
}
