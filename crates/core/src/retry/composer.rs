//! Retry option composition

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationErrors;
use crate::Result;

/// Default upper bound on retry feedback, in characters
pub const DEFAULT_FEEDBACK_MAX_LEN: usize = 2000;

/// Validation field name for the feedback text
pub const FEEDBACK_FIELD: &str = "feedback";

/// Options accepted by the agent service's retry endpoint.
///
/// The default is the safe retry: resume from the last checkpoint with the
/// same turn budget and model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub from_checkpoint: bool,
    pub increase_turns: bool,
    pub use_stronger_model: bool,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            feedback: None,
            from_checkpoint: true,
            increase_turns: false,
            use_stronger_model: false,
        }
    }
}

/// Limits applied while composing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryComposerConfig {
    pub max_feedback_len: usize,
}

impl Default for RetryComposerConfig {
    fn default() -> Self {
        Self {
            max_feedback_len: DEFAULT_FEEDBACK_MAX_LEN,
        }
    }
}

/// Collects the retry dialog's inputs and turns them into [`RetryOptions`]
#[derive(Debug, Clone)]
pub struct RetryOptionsComposer {
    config: RetryComposerConfig,
    feedback: String,
    from_checkpoint: bool,
    increase_turns: bool,
    use_stronger_model: bool,
}

impl Default for RetryOptionsComposer {
    fn default() -> Self {
        Self::with_config(RetryComposerConfig::default())
    }
}

impl RetryOptionsComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RetryComposerConfig) -> Self {
        let defaults = RetryOptions::default();
        Self {
            config,
            feedback: String::new(),
            from_checkpoint: defaults.from_checkpoint,
            increase_turns: defaults.increase_turns,
            use_stronger_model: defaults.use_stronger_model,
        }
    }

    pub fn feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = feedback.into();
        self
    }

    pub fn from_checkpoint(mut self, enabled: bool) -> Self {
        self.from_checkpoint = enabled;
        self
    }

    pub fn increase_turns(mut self, enabled: bool) -> Self {
        self.increase_turns = enabled;
        self
    }

    pub fn use_stronger_model(mut self, enabled: bool) -> Self {
        self.use_stronger_model = enabled;
        self
    }

    /// Build the options, rejecting feedback over the configured length.
    ///
    /// Feedback is trimmed; blank feedback is omitted.
    pub fn compose(&self) -> Result<RetryOptions> {
        let trimmed = self.feedback.trim();
        let length = trimmed.chars().count();

        if length > self.config.max_feedback_len {
            let mut errors = ValidationErrors::new();
            errors.insert(
                FEEDBACK_FIELD,
                format!(
                    "Feedback must be {} characters or fewer",
                    self.config.max_feedback_len
                ),
            );
            return Err(errors.into());
        }

        Ok(RetryOptions {
            feedback: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            from_checkpoint: self.from_checkpoint,
            increase_turns: self.increase_turns,
            use_stronger_model: self.use_stronger_model,
        })
    }

    /// Compose and hand the result to `on_retry`.
    ///
    /// `on_retry` is not called when composition fails.
    pub fn submit<F, T>(&self, on_retry: F) -> Result<T>
    where
        F: FnOnce(RetryOptions) -> T,
    {
        let options = self.compose()?;
        debug!(
            from_checkpoint = options.from_checkpoint,
            increase_turns = options.increase_turns,
            use_stronger_model = options.use_stronger_model,
            has_feedback = options.feedback.is_some(),
            "Submitting retry options"
        );
        Ok(on_retry(options))
    }
}
