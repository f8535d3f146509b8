//! Document source adapters.

mod directory;
mod memory;

pub use directory::DirectorySource;
pub use memory::MemorySource;
