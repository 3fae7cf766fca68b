//! Analyzer defaults, per-model profiles, and profile resolution.
//!
//! Resolution never fails. A requested model that is not configured gets a
//! profile synthesized from [`AnalyzerDefaults`] with no pricing, and every
//! zero or absent profile field falls back to the matching default.
//! Validation happens once, when an [`AnalyzerConfig`] is constructed.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Model name used when neither the caller nor the config picks one.
pub const DEFAULT_MODEL: &str = "default";

/// Tokenizer used when nothing else is configured.
pub const DEFAULT_TOKENIZER: &str = "approx";

/// Expected output tokens used when nothing else is configured.
pub const DEFAULT_EXPECTED_OUTPUT_TOKENS: usize = 300;

/// Advisory input budget used when nothing else is configured.
pub const DEFAULT_MAX_INPUT_TOKENS: usize = 2500;

/// Currency assumed for pricing blocks that do not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Global fallback values for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalyzerDefaults {
    /// Model analyzed when the caller does not request one.
    pub model: String,
    /// Tokenizer key used when the model profile does not set one.
    pub tokenizer: String,
    /// Expected output tokens when neither caller nor profile sets them.
    pub expected_output_tokens: usize,
    /// Advisory input token budget.
    pub max_input_tokens: usize,
}

impl Default for AnalyzerDefaults {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            tokenizer: DEFAULT_TOKENIZER.to_string(),
            expected_output_tokens: DEFAULT_EXPECTED_OUTPUT_TOKENS,
            max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Per-1k-token prices for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelPricing {
    /// Currency code; no conversion is ever performed.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Price per 1,000 input tokens.
    #[serde(default)]
    pub input_per_1k: f64,
    /// Price per 1,000 output tokens.
    #[serde(default)]
    pub output_per_1k: f64,
}

impl ModelPricing {
    /// Pricing in the default currency.
    pub fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            currency: default_currency(),
            input_per_1k,
            output_per_1k,
        }
    }

    /// Override the currency code.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    fn validate(&self, model: &str) -> ConfigResult<()> {
        for (field, value) in [
            ("input_per_1k", self.input_per_1k),
            ("output_per_1k", self.output_per_1k),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidPricing {
                    model: model.to_string(),
                    field,
                    value,
                });
            }
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::EmptyCurrency {
                model: model.to_string(),
            });
        }
        Ok(())
    }
}

/// Settings for one named model.
///
/// Optional and zero-valued fields defer to [`AnalyzerDefaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelProfile {
    /// Unique, case-sensitive model name.
    pub name: String,
    /// Tokenizer key for this model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenizer: Option<String>,
    /// Context window size in tokens (0 = unknown).
    #[serde(default)]
    pub context_window_tokens: usize,
    /// Output tokens to assume when the caller does not say.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_max_output_tokens: Option<usize>,
    /// Pricing; absent means no cost estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<ModelPricing>,
}

impl ModelProfile {
    /// A profile with only a name; everything else falls back to defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tokenizer: None,
            context_window_tokens: 0,
            default_max_output_tokens: None,
            pricing: None,
        }
    }

    /// Set the tokenizer key.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: impl Into<String>) -> Self {
        self.tokenizer = Some(tokenizer.into());
        self
    }

    /// Set the context window size.
    #[must_use]
    pub const fn with_context_window(mut self, tokens: usize) -> Self {
        self.context_window_tokens = tokens;
        self
    }

    /// Set the default output token budget.
    #[must_use]
    pub const fn with_default_max_output_tokens(mut self, tokens: usize) -> Self {
        self.default_max_output_tokens = Some(tokens);
        self
    }

    /// Attach pricing.
    #[must_use]
    pub fn with_pricing(mut self, pricing: ModelPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }
}

/// Validated analyzer configuration: defaults plus named model profiles.
///
/// Read-only once built; share it freely across threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzerConfig {
    defaults: AnalyzerDefaults,
    models: BTreeMap<String, ModelProfile>,
}

impl AnalyzerConfig {
    /// Build a configuration, rejecting malformed input.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty default model, a zero input
    /// budget, empty or duplicate model names, and invalid pricing.
    pub fn new(
        defaults: AnalyzerDefaults,
        models: impl IntoIterator<Item = ModelProfile>,
    ) -> ConfigResult<Self> {
        if defaults.model.trim().is_empty() {
            return Err(ConfigError::InvalidDefault {
                field: "model",
                reason: "must not be empty",
            });
        }
        if defaults.max_input_tokens == 0 {
            return Err(ConfigError::InvalidDefault {
                field: "max_input_tokens",
                reason: "must be positive",
            });
        }

        let mut by_name = BTreeMap::new();
        for profile in models {
            if profile.name.trim().is_empty() {
                return Err(ConfigError::EmptyModelName);
            }
            if let Some(ref pricing) = profile.pricing {
                pricing.validate(&profile.name)?;
            }
            match by_name.entry(profile.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(ConfigError::DuplicateModel { name: profile.name });
                }
                Entry::Vacant(slot) => {
                    slot.insert(profile);
                }
            }
        }

        Ok(Self {
            defaults,
            models: by_name,
        })
    }

    /// Global defaults.
    pub const fn defaults(&self) -> &AnalyzerDefaults {
        &self.defaults
    }

    /// Look up a profile by exact name.
    pub fn model(&self, name: &str) -> Option<&ModelProfile> {
        self.models.get(name)
    }

    /// All configured profiles, ordered by name.
    pub fn models(&self) -> impl Iterator<Item = &ModelProfile> {
        self.models.values()
    }

    /// Resolve the effective settings for one analysis.
    ///
    /// Caller overrides win, then the model profile, then the defaults.
    /// Invalid overrides are ignored with a warning.
    #[tracing::instrument(skip(self), fields(model = ?overrides.model))]
    pub fn resolve(&self, overrides: &Overrides) -> ResolvedProfile {
        let name = non_empty(overrides.model.as_deref()).unwrap_or(&self.defaults.model);
        let profile = self.models.get(name);
        if profile.is_none() {
            tracing::warn!(model = name, "model not configured, using defaults without pricing");
        }

        let tokenizer = non_empty(overrides.tokenizer.as_deref())
            .or_else(|| profile.and_then(|p| non_empty(p.tokenizer.as_deref())))
            .unwrap_or(&self.defaults.tokenizer)
            .to_string();

        let profile_output = profile
            .and_then(|p| p.default_max_output_tokens)
            .filter(|&n| n > 0)
            .unwrap_or(self.defaults.expected_output_tokens);
        let expected_output_tokens = match overrides.expected_output_tokens {
            Some(n) if n >= 0 => usize::try_from(n).unwrap_or(usize::MAX),
            Some(n) => {
                tracing::warn!(value = n, "ignoring negative expected_output_tokens override");
                profile_output
            }
            None => profile_output,
        };

        let max_input_tokens = match overrides.max_input_tokens {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            Some(n) => {
                tracing::warn!(value = n, "ignoring non-positive max_input_tokens override");
                self.defaults.max_input_tokens
            }
            None => self.defaults.max_input_tokens,
        };

        let resolved = ResolvedProfile {
            model: name.to_string(),
            configured: profile.is_some(),
            tokenizer,
            context_window_tokens: profile.map_or(0, |p| p.context_window_tokens),
            expected_output_tokens,
            max_input_tokens,
            pricing: profile.and_then(|p| p.pricing.clone()),
        };
        tracing::debug!(
            model = %resolved.model,
            tokenizer = %resolved.tokenizer,
            expected_output_tokens = resolved.expected_output_tokens,
            max_input_tokens = resolved.max_input_tokens,
            priced = resolved.pricing.is_some(),
            "resolved profile"
        );
        resolved
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Per-call overrides supplied by the caller.
///
/// Numeric values are signed so that out-of-range input can be detected
/// and replaced by defaults instead of being rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Model to analyze against.
    pub model: Option<String>,
    /// Tokenizer key, beating the profile's.
    pub tokenizer: Option<String>,
    /// Expected output tokens (must be >= 0).
    pub expected_output_tokens: Option<i64>,
    /// Advisory input budget (must be > 0).
    pub max_input_tokens: Option<i64>,
}

impl Overrides {
    /// Request a specific model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Request a specific tokenizer.
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: impl Into<String>) -> Self {
        self.tokenizer = Some(tokenizer.into());
        self
    }

    /// Override expected output tokens.
    #[must_use]
    pub const fn with_expected_output_tokens(mut self, tokens: i64) -> Self {
        self.expected_output_tokens = Some(tokens);
        self
    }

    /// Override the input budget.
    #[must_use]
    pub const fn with_max_input_tokens(mut self, tokens: i64) -> Self {
        self.max_input_tokens = Some(tokens);
        self
    }
}

/// Parse a numeric override leniently.
///
/// Returns `None` for anything that is not an integer, so the caller falls
/// back to configured defaults rather than failing.
pub fn parse_numeric_override(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(value = trimmed, "ignoring non-numeric override");
            None
        }
    }
}

/// Effective settings for one analysis after merging overrides, the model
/// profile, and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ResolvedProfile {
    /// Requested model name.
    pub model: String,
    /// Whether the model has a configured profile.
    pub configured: bool,
    /// Tokenizer key (may still be unknown; see [`crate::tokens::tokenizer_for`]).
    pub tokenizer: String,
    /// Context window in tokens (0 = unknown).
    pub context_window_tokens: usize,
    /// Output tokens assumed for cost projection.
    pub expected_output_tokens: usize,
    /// Advisory input budget.
    pub max_input_tokens: usize,
    /// Pricing, if the profile has any.
    pub pricing: Option<ModelPricing>,
}
