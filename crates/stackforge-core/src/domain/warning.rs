use serde::Serialize;
use std::fmt;

/// A configuration concern a strategy is chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    Generator,
    Frontend,
    FormBuilder,
    CssFramework,
    Database,
    SearchEngine,
    VectorStore,
    EmbeddingProvider,
    TemplateEngine,
    Monitoring,
}

impl Concern {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Generator => "generator",
            Self::Frontend => "frontend",
            Self::FormBuilder => "form_builder",
            Self::CssFramework => "css_framework",
            Self::Database => "database",
            Self::SearchEngine => "search_engine",
            Self::VectorStore => "vector_store",
            Self::EmbeddingProvider => "embedding_provider",
            Self::TemplateEngine => "template_engine",
            Self::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal condition recorded during a run.
///
/// Warnings never change the outcome of a run; they are logged and reported
/// alongside the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationWarning {
    /// An unrecognized value was replaced by the documented fallback.
    UnsupportedStrategy {
        concern: Concern,
        value: String,
        fallback: String,
    },
    /// A recognized value whose strategy intentionally produces nothing yet.
    StubStrategy { concern: Concern, value: String },
    /// An override document existed but could not be used.
    OverrideIgnored { id: String, reason: String },
}

impl GenerationWarning {
    pub fn unsupported(
        concern: Concern,
        value: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        Self::UnsupportedStrategy {
            concern,
            value: value.into(),
            fallback: fallback.into(),
        }
    }

    pub fn stub(concern: Concern, value: impl Into<String>) -> Self {
        Self::StubStrategy {
            concern,
            value: value.into(),
        }
    }
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedStrategy {
                concern,
                value,
                fallback,
            } => write!(
                f,
                "unsupported {concern} '{value}', falling back to '{fallback}'"
            ),
            Self::StubStrategy { concern, value } => {
                write!(f, "{concern} '{value}' is recognized but generates no files")
            }
            Self::OverrideIgnored { id, reason } => {
                write!(f, "override document '{id}' ignored: {reason}")
            }
        }
    }
}

/// The outcome of a strategy lookup: the chosen value and, when the input
/// was not used as given, the warnings explaining why.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T> {
    pub value: T,
    pub warnings: Vec<GenerationWarning>,
}

impl<T> Resolution<T> {
    pub fn exact(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(value: T, warning: GenerationWarning) -> Self {
        Self {
            value,
            warnings: vec![warning],
        }
    }

    /// A value resolved from several inputs, one warning per input that
    /// was not used.
    pub fn with_warnings(value: T, warnings: Vec<GenerationWarning>) -> Self {
        Self { value, warnings }
    }

    /// Move the warnings into `sink`, returning the value.
    pub fn record(self, sink: &mut Vec<GenerationWarning>) -> T {
        sink.extend(self.warnings);
        self.value
    }
}
