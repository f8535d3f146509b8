//! Domain value objects: canonical symbols and the enum of every
//! configuration concern.
//!
//! # Design
//!
//! Raw configuration arrives as strings (`"PostgreSQL"`, `"simple-form"`,
//! `"pg"`). Each value is normalized exactly once, at the load boundary, into
//! one of the enums below. Nothing after that point compares raw strings.
//!
//! Concerns with an open value set (databases, CSS frameworks, vector stores,
//! ...) carry an `Other(Symbol)` arm: an unrecognized value is kept in
//! canonical form so strategy resolution can log it and fall back, instead of
//! failing the run.
//!
//! # Adding New Variants
//!
//! 1. Add the variant, its canonical name and any aliases to the
//!    `canonical_enum!` invocation here
//! 2. Add a strategy arm in `strategies.rs`
//! 3. Parsing, display and serialization follow automatically

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

// ── Symbol ────────────────────────────────────────────────────────────────────

/// A value in canonical symbolic form.
///
/// Normalization trims surrounding whitespace, lowercases, and maps `-`, `.`
/// and inner whitespace to `_`. `"Simple-Form"` and `"simple_form"` are the
/// same symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: &str) -> Self {
        let normalized = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | '.' => '_',
                c if c.is_whitespace() => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Symbol {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ── Canonical enums ──────────────────────────────────────────────────────────

/// Declares an open enum normalized from raw strings.
///
/// Every variant lists its canonical name followed by accepted aliases. The
/// generated `parse` is total: unknown input becomes `Other(Symbol)`.
macro_rules! canonical_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $canonical:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value outside the recognized set, kept in canonical form.
            Other(Symbol),
        }

        impl $name {
            /// Canonical names of every recognized variant, in declaration order.
            pub const RECOGNIZED: &'static [&'static str] = &[$($canonical),+];

            /// Normalize a raw value. Never fails.
            pub fn parse(raw: &str) -> Self {
                let symbol = Symbol::new(raw);
                match symbol.as_str() {
                    $( $canonical $(| $alias)* => Self::$variant, )+
                    _ => Self::Other(symbol),
                }
            }

            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $canonical, )+
                    Self::Other(symbol) => symbol.as_str(),
                }
            }

            /// `false` for values that landed in the `Other` arm.
            pub fn is_recognized(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::parse(s))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::parse(raw)
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_owned()
            }
        }
    };
}

canonical_enum! {
    /// Target generator family.
    GeneratorKind {
        /// Server-side MVC framework (the default generator).
        Mvc => "mvc" | "ruby" | "rails",
        /// Express-style Node service.
        Express => "express" | "node" | "nodejs",
        /// Python web service.
        Python => "python" | "fastapi" | "flask",
    }
}

canonical_enum! {
    /// Frontend delivery style.
    Frontend {
        Mvc => "mvc" | "hotwire" | "erb",
        React => "react" | "reactjs",
        Vue => "vue" | "vuejs",
    }
}

canonical_enum! {
    /// CSS framework installed into the generated application.
    CssFramework {
        Bootstrap => "bootstrap",
        Tailwind => "tailwind" | "tailwindcss",
        NoFramework => "none" | "",
    }
}

canonical_enum! {
    /// Form builder used by generated views.
    FormBuilder {
        Default => "default" | "form_with",
        SimpleForm => "simple_form",
        Formtastic => "formtastic",
    }
}

canonical_enum! {
    /// View template engine.
    TemplateEngine {
        Erb => "erb" | "default",
        Slim => "slim",
        Haml => "haml",
    }
}

canonical_enum! {
    /// Database family.
    DatabaseKind {
        Sqlite => "sqlite" | "sqlite3" | "default",
        Postgresql => "postgresql" | "postgres" | "pg",
        Mysql => "mysql" | "mysql2" | "mariadb",
        Mongodb => "mongodb" | "mongo" | "mongoid" | "mongoose",
        Sequelize => "sequelize",
        Prisma => "prisma",
    }
}

canonical_enum! {
    /// Full-text search engine.
    SearchEngine {
        Elasticsearch => "elasticsearch" | "elastic",
        Meilisearch => "meilisearch" | "meili",
    }
}

canonical_enum! {
    /// Vector store for embeddings.
    VectorStore {
        Pgvector => "pgvector" | "pg_vector",
        Qdrant => "qdrant",
        Weaviate => "weaviate",
        Pinecone => "pinecone",
    }
}

canonical_enum! {
    /// Embedding provider.
    EmbeddingProvider {
        OpenAi => "openai" | "open_ai",
        HuggingFace => "huggingface" | "hugging_face" | "hf",
        Cohere => "cohere",
    }
}

canonical_enum! {
    /// Monitoring and error-reporting tool.
    MonitoringTool {
        Sentry => "sentry",
        NewRelic => "new_relic" | "newrelic",
        Datadog => "datadog",
        Prometheus => "prometheus",
        Honeybadger => "honeybadger",
    }
}

canonical_enum! {
    /// Name of an optional application feature.
    FeatureName {
        Authentication => "authentication" | "auth",
        FileUpload => "file_upload" | "file_uploads" | "uploads",
        BackgroundJobs => "background_jobs" | "jobs",
    }
}

impl Default for GeneratorKind {
    fn default() -> Self {
        Self::Mvc
    }
}

impl Default for Frontend {
    fn default() -> Self {
        Self::Mvc
    }
}

impl Default for CssFramework {
    fn default() -> Self {
        Self::Bootstrap
    }
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::Default
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::Erb
    }
}

impl Default for DatabaseKind {
    fn default() -> Self {
        Self::Sqlite
    }
}

impl FeatureName {
    /// Provider used when a feature is enabled without naming one.
    ///
    /// Generic features have no default; their provider is required.
    pub fn default_provider(&self) -> Option<&'static str> {
        match self {
            Self::Authentication => Some("devise"),
            Self::FileUpload => Some("active_storage"),
            Self::BackgroundJobs => Some("sidekiq"),
            Self::Other(_) => None,
        }
    }
}

// ── Closed enums ─────────────────────────────────────────────────────────────

/// Declared type of an entity attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    Datetime,
}

impl AttributeType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Symbol::new(s).as_str() {
            "string" | "str" => Ok(Self::String),
            "text" => Ok(Self::Text),
            "integer" | "int" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "decimal" => Ok(Self::Decimal),
            "boolean" | "bool" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            "datetime" | "date_time" | "timestamp" => Ok(Self::Datetime),
            other => Err(DomainError::UnknownAttributeType {
                type_name: other.to_string(),
            }),
        }
    }
}

/// Kind of association between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    HasOne,
    HasMany,
    BelongsTo,
    HasAndBelongsToMany,
}

impl AssociationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HasOne => "has_one",
            Self::HasMany => "has_many",
            Self::BelongsTo => "belongs_to",
            Self::HasAndBelongsToMany => "has_and_belongs_to_many",
        }
    }

    /// Whether the owning entity's table stores the foreign key.
    pub const fn owns_foreign_key(&self) -> bool {
        matches!(self, Self::BelongsTo)
    }

    /// Whether the association requires a join table.
    pub const fn requires_join_table(&self) -> bool {
        matches!(self, Self::HasAndBelongsToMany)
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssociationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Symbol::new(s).as_str() {
            "has_one" => Ok(Self::HasOne),
            "has_many" => Ok(Self::HasMany),
            "belongs_to" => Ok(Self::BelongsTo),
            "has_and_belongs_to_many" | "habtm" => Ok(Self::HasAndBelongsToMany),
            other => Err(DomainError::UnknownAssociationKind {
                kind: other.to_string(),
            }),
        }
    }
}
