//! In-process generator registry and selection.

use crate::config::Settings;
use crate::generation::{GenerationError, GenerationRequest, GenerationResult, TextGenerator};
use log::{error, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Generator registration/selection errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidProviderId(String),
    DuplicateProviderId(String),
    ProviderNotFound(String),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProviderId(value) => write!(f, "provider id is invalid: {value}"),
            Self::DuplicateProviderId(value) => {
                write!(f, "provider id already registered: {value}")
            }
            Self::ProviderNotFound(value) => write!(f, "provider not found: {value}"),
        }
    }
}

impl Error for RegistryError {}

/// Runtime text-generator registry.
#[derive(Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<String, Arc<dyn TextGenerator>>,
    active_provider_id: Option<String>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one generator adapter.
    pub fn register(&mut self, generator: Arc<dyn TextGenerator>) -> Result<(), RegistryError> {
        let provider_id = generator.provider_id().trim().to_string();
        if !is_valid_provider_id(&provider_id) {
            return Err(RegistryError::InvalidProviderId(provider_id));
        }
        if self.generators.contains_key(provider_id.as_str()) {
            return Err(RegistryError::DuplicateProviderId(provider_id));
        }

        self.generators.insert(provider_id, generator);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Returns sorted provider ids.
    pub fn provider_ids(&self) -> Vec<String> {
        self.generators.keys().cloned().collect()
    }

    /// Selects one active generator.
    pub fn select_active(&mut self, provider_id: &str) -> Result<(), RegistryError> {
        let normalized = provider_id.trim();
        if !self.generators.contains_key(normalized) {
            return Err(RegistryError::ProviderNotFound(normalized.to_string()));
        }
        self.active_provider_id = Some(normalized.to_string());
        Ok(())
    }

    /// Selects the provider named in `settings`.
    pub fn select_from_settings(&mut self, settings: &Settings) -> Result<(), RegistryError> {
        self.select_active(settings.provider_id())
    }

    pub fn clear_active(&mut self) {
        self.active_provider_id = None;
    }

    pub fn active_provider_id(&self) -> Option<&str> {
        self.active_provider_id.as_deref()
    }

    /// Returns one generator by id.
    pub fn get(&self, provider_id: &str) -> Option<Arc<dyn TextGenerator>> {
        self.generators.get(provider_id.trim()).cloned()
    }

    pub fn active_generator(&self) -> Option<Arc<dyn TextGenerator>> {
        let id = self.active_provider_id()?;
        self.get(id)
    }

    /// Runs `prompt` through the active generator.
    ///
    /// Fails before calling out when nothing is selected or the selected
    /// provider has no credential in `settings`. Blank completions are
    /// reported as malformed.
    pub fn generate(&self, settings: &Settings, prompt: &str) -> GenerationResult<String> {
        let generator = self.require_active()?;
        let provider = generator.provider_id().to_string();
        let api_key = settings
            .api_key_for(&provider)
            .ok_or_else(|| GenerationError::MissingCredential(provider.clone()))?;
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            model: settings.model_name().to_string(),
            api_key: api_key.to_string(),
        };

        let started_at = Instant::now();
        info!(
            "event=generation_call module=generation status=start provider={} model={}",
            provider, request.model
        );
        let result = generator.complete(&request).and_then(|completion| {
            if completion.trim().is_empty() {
                Err(GenerationError::MalformedResponse(
                    "empty completion".to_string(),
                ))
            } else {
                Ok(completion)
            }
        });
        match &result {
            Ok(completion) => info!(
                "event=generation_call module=generation status=ok provider={} chars={} duration_ms={}",
                provider,
                completion.chars().count(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=generation_call module=generation status=error provider={} error={} duration_ms={}",
                provider,
                err,
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn require_active(&self) -> GenerationResult<Arc<dyn TextGenerator>> {
        self.active_generator()
            .ok_or(GenerationError::ProviderNotSelected)
    }
}

fn is_valid_provider_id(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
