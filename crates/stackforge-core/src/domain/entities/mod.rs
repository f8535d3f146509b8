pub mod configuration;
pub mod deployment;
pub mod feature;
pub mod gem;
pub mod manifest;
pub mod model;

pub use crate::domain::DomainError;
pub use configuration::ApplicationConfiguration;
pub use deployment::DeploymentTarget;
pub use feature::{AuthenticationConfiguration, FeatureConfiguration, FeatureSettings};
pub use gem::GemConfiguration;
pub use manifest::{DependencySpec, FileSpec, Manifest, ManifestSection};
pub use model::{AssociationDescriptor, AssociationOptions, Attribute, EntityDescriptor};
