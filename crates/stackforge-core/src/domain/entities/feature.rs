//! Optional application features as a closed sum type.
//!
//! Authentication carries first-class fields that other features do not;
//! everything else shares the `provider` + `options` shape.

use serde::Deserialize;
use serde_json::json;

use crate::domain::{
    document::{Options, coerce_bool},
    error::DomainError,
    value_objects::{FeatureName, Symbol},
};

/// Option keys promoted to fields of [`AuthenticationConfiguration`].
const PASSKEYS: &str = "passkeys";
const PASSKEY_OPTIONS: &str = "passkey_options";
const GENERATE_USER: &str = "generate_user";

/// Provider and passthrough options shared by every feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureSettings {
    provider: Symbol,
    #[serde(default)]
    options: Options,
}

impl FeatureSettings {
    pub fn new(provider: impl Into<Symbol>, options: Options) -> Self {
        Self {
            provider: provider.into(),
            options,
        }
    }

    pub fn provider(&self) -> &Symbol {
        &self.provider
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

/// Authentication feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthenticationConfiguration {
    provider: Symbol,
    #[serde(default)]
    options: Options,
    #[serde(default)]
    generate_user: bool,
    #[serde(default)]
    passkeys: bool,
    #[serde(default)]
    passkey_options: Options,
}

impl AuthenticationConfiguration {
    /// Build from caller options, moving `passkeys`, `passkey_options` and
    /// `generate_user` out of the generic bag.
    pub fn from_options(provider: impl Into<Symbol>, mut options: Options) -> Self {
        let passkeys = options
            .remove(PASSKEYS)
            .and_then(|v| coerce_bool(&v))
            .unwrap_or(false);
        let generate_user = options
            .remove(GENERATE_USER)
            .and_then(|v| coerce_bool(&v))
            .unwrap_or(false);
        let passkey_options = match options.remove(PASSKEY_OPTIONS) {
            Some(serde_json::Value::Object(map)) => map,
            _ => Options::new(),
        };

        Self {
            provider: provider.into(),
            options,
            generate_user,
            passkeys,
            passkey_options,
        }
    }

    pub fn provider(&self) -> &Symbol {
        &self.provider
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn generate_user(&self) -> bool {
        self.generate_user
    }

    pub fn passkeys(&self) -> bool {
        self.passkeys
    }

    pub fn passkey_options(&self) -> &Options {
        &self.passkey_options
    }
}

/// A configured optional feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum FeatureConfiguration {
    Authentication(AuthenticationConfiguration),
    FileUpload(FeatureSettings),
    BackgroundJobs(FeatureSettings),
    Generic {
        name: Symbol,
        provider: Symbol,
        #[serde(default)]
        options: Options,
    },
}

impl FeatureConfiguration {
    /// Build the variant matching `name`.
    ///
    /// `provider` falls back to the feature's default provider; generic
    /// features have none, so omitting it is an error.
    pub fn build(
        name: &FeatureName,
        provider: Option<&str>,
        options: Options,
    ) -> Result<Self, DomainError> {
        let provider = provider
            .map(Symbol::new)
            .filter(|p| !p.is_empty())
            .or_else(|| name.default_provider().map(Symbol::new))
            .ok_or_else(|| DomainError::MissingRequiredField {
                field: format!("features.{name}.provider"),
            })?;

        Ok(match name {
            FeatureName::Authentication => Self::Authentication(
                AuthenticationConfiguration::from_options(provider, options),
            ),
            FeatureName::FileUpload => Self::FileUpload(FeatureSettings::new(provider, options)),
            FeatureName::BackgroundJobs => {
                Self::BackgroundJobs(FeatureSettings::new(provider, options))
            }
            FeatureName::Other(symbol) => Self::Generic {
                name: symbol.clone(),
                provider,
                options,
            },
        })
    }

    /// The key this configuration is stored under.
    pub fn name(&self) -> FeatureName {
        match self {
            Self::Authentication(_) => FeatureName::Authentication,
            Self::FileUpload(_) => FeatureName::FileUpload,
            Self::BackgroundJobs(_) => FeatureName::BackgroundJobs,
            Self::Generic { name, .. } => FeatureName::parse(name.as_str()),
        }
    }

    pub fn provider(&self) -> &Symbol {
        match self {
            Self::Authentication(auth) => auth.provider(),
            Self::FileUpload(settings) | Self::BackgroundJobs(settings) => settings.provider(),
            Self::Generic { provider, .. } => provider,
        }
    }

    pub fn options(&self) -> &Options {
        match self {
            Self::Authentication(auth) => auth.options(),
            Self::FileUpload(settings) | Self::BackgroundJobs(settings) => settings.options(),
            Self::Generic { options, .. } => options,
        }
    }

    pub fn as_authentication(&self) -> Option<&AuthenticationConfiguration> {
        match self {
            Self::Authentication(auth) => Some(auth),
            _ => None,
        }
    }

    pub fn to_representation(&self) -> serde_json::Value {
        match self {
            Self::Authentication(auth) => json!({
                "variant": "authentication",
                "provider": auth.provider.as_str(),
                "options": auth.options,
                "generate_user": auth.generate_user,
                "passkeys": auth.passkeys,
                "passkey_options": auth.passkey_options,
            }),
            Self::FileUpload(settings) => json!({
                "variant": "file_upload",
                "provider": settings.provider.as_str(),
                "options": settings.options,
            }),
            Self::BackgroundJobs(settings) => json!({
                "variant": "background_jobs",
                "provider": settings.provider.as_str(),
                "options": settings.options,
            }),
            Self::Generic {
                name,
                provider,
                options,
            } => json!({
                "variant": "generic",
                "name": name.as_str(),
                "provider": provider.as_str(),
                "options": options,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(value: serde_json::Value) -> Options {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn authentication_extracts_first_class_keys() {
        let auth = AuthenticationConfiguration::from_options(
            "devise",
            opts(json!({
                "passkeys": true,
                "passkey_options": {"rp_name": "X"},
                "generate_user": "true",
                "confirmable": true,
            })),
        );

        assert!(auth.passkeys());
        assert!(auth.generate_user());
        assert_eq!(auth.passkey_options()["rp_name"], json!("X"));
        assert!(!auth.options().contains_key("passkeys"));
        assert!(!auth.options().contains_key("passkey_options"));
        assert!(!auth.options().contains_key("generate_user"));
        assert_eq!(auth.options()["confirmable"], json!(true));
    }

    #[test]
    fn authentication_defaults_are_false() {
        let auth = AuthenticationConfiguration::from_options("devise", Options::new());
        assert!(!auth.passkeys());
        assert!(!auth.generate_user());
        assert!(auth.passkey_options().is_empty());
    }

    #[test]
    fn build_uses_default_provider() {
        let feature =
            FeatureConfiguration::build(&FeatureName::BackgroundJobs, None, Options::new())
                .unwrap();
        assert_eq!(feature.provider().as_str(), "sidekiq");
        assert_eq!(feature.name(), FeatureName::BackgroundJobs);
    }

    #[test]
    fn generic_feature_requires_provider() {
        let name = FeatureName::parse("payments");
        let err = FeatureConfiguration::build(&name, None, Options::new()).unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingRequiredField {
                field: "features.payments.provider".into()
            }
        );

        let ok = FeatureConfiguration::build(&name, Some("Stripe"), Options::new()).unwrap();
        assert_eq!(ok.provider().as_str(), "stripe");
        assert_eq!(ok.name(), name);
    }

    #[test]
    fn representation_round_trips_every_variant() {
        let variants = [
            FeatureConfiguration::build(
                &FeatureName::Authentication,
                Some("devise"),
                opts(json!({"passkeys": true, "lockable": true})),
            )
            .unwrap(),
            FeatureConfiguration::build(&FeatureName::FileUpload, Some("shrine"), Options::new())
                .unwrap(),
            FeatureConfiguration::build(&FeatureName::BackgroundJobs, None, Options::new())
                .unwrap(),
            FeatureConfiguration::build(
                &FeatureName::parse("payments"),
                Some("stripe"),
                opts(json!({"currency": "eur"})),
            )
            .unwrap(),
        ];

        for feature in variants {
            let back: FeatureConfiguration =
                serde_json::from_value(feature.to_representation()).unwrap();
            assert_eq!(back, feature);
        }
    }
}
