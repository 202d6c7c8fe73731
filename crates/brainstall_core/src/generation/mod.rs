//! External text-generation collaborator contract.
//!
//! # Responsibility
//! - Define the provider seam ([`TextGenerator`]) the capture flows call.
//! - Keep provider selection, credential checks and prompt shaping in core.
//!
//! # Invariants
//! - One failed call aborts the triggering workflow; nothing retries.
//! - HTTP transport lives outside this crate.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod prompt;
pub mod registry;

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Failure at the generation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// No provider is selected in the registry.
    ProviderNotSelected,
    /// Selected provider has no usable credential.
    MissingCredential(String),
    /// Provider call failed; carries the provider's message.
    Provider { provider: String, message: String },
    /// Response was empty or not in the expected shape.
    MalformedResponse(String),
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProviderNotSelected => write!(f, "no text-generation provider selected"),
            Self::MissingCredential(provider) => {
                write!(f, "API key for provider `{provider}` is not configured")
            }
            Self::Provider { provider, message } => {
                write!(f, "provider `{provider}` failed: {message}")
            }
            Self::MalformedResponse(details) => write!(f, "malformed response: {details}"),
        }
    }
}

impl Error for GenerationError {}

/// One completion request as handed to a provider adapter.
#[derive(Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub api_key: String,
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("prompt_chars", &self.prompt.chars().count())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Provider adapter: prompt in, completion text out.
pub trait TextGenerator {
    /// Stable lowercase id, e.g. `openai`.
    fn provider_id(&self) -> &str;
    /// Runs one completion.
    fn complete(&self, request: &GenerationRequest) -> GenerationResult<String>;
}
