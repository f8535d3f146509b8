//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stackforge-adapters` crate provides implementations.

use crate::domain::RawDocument;
use crate::error::ForgeResult;

/// Port for looking up declarative documents by id.
///
/// Implemented by:
/// - `stackforge_adapters::DirectorySource` (documents on disk)
/// - `stackforge_adapters::MemorySource` (testing)
///
/// ## Contract
///
/// - `Ok(None)`: no document with this id exists
/// - `Ok(Some(_))`: the unparsed text and its format
/// - `Err(_)`: a document exists but could not be read
#[cfg_attr(test, mockall::automock)]
pub trait DocumentSource: Send + Sync {
    fn fetch(&self, id: &str) -> ForgeResult<Option<RawDocument>>;
}

/// Port for reading environment variables.
///
/// Implemented by:
/// - `stackforge_adapters::ProcessEnvironment` (production)
/// - `stackforge_adapters::MapEnvironment` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Environment: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}
