use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parallelism must be at least 1")]
    ZeroParallelism,

    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidScale { name: &'static str, value: f64 },

    #[error("normalization ceiling must be positive, got {0}")]
    InvalidCeiling(f64),

    #[error("failed to build propagation thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Tuning of the weight propagation passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Worker threads per pass. `None` uses one per core.
    pub parallelism: Option<usize>,
    pub noun_scale: f64,
    pub verb_scale: f64,
    pub noun_phrase_scale: f64,
    pub verb_phrase_scale: f64,
    /// Multiplier for noun phrases containing a proper noun.
    pub proper_noun_factor: f64,
    /// Weight of the heaviest phrase after normalization.
    pub normalization_ceiling: f64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            parallelism: None,
            noun_scale: 1.0,
            verb_scale: 1.0,
            noun_phrase_scale: 0.5,
            verb_phrase_scale: 0.5,
            proper_noun_factor: 2.0,
            normalization_ceiling: 100.0,
        }
    }
}

impl PropagationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallelism == Some(0) {
            return Err(ConfigError::ZeroParallelism);
        }
        let scales = [
            ("noun_scale", self.noun_scale),
            ("verb_scale", self.verb_scale),
            ("noun_phrase_scale", self.noun_phrase_scale),
            ("verb_phrase_scale", self.verb_phrase_scale),
            ("proper_noun_factor", self.proper_noun_factor),
        ];
        for (name, value) in scales {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidScale { name, value });
            }
        }
        if !self.normalization_ceiling.is_finite() || self.normalization_ceiling <= 0.0 {
            return Err(ConfigError::InvalidCeiling(self.normalization_ceiling));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PropagationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero = PropagationConfig { parallelism: Some(0), ..Default::default() };
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroParallelism)));

        let negative = PropagationConfig { verb_scale: -1.0, ..Default::default() };
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::InvalidScale { name: "verb_scale", .. })
        ));

        let ceiling = PropagationConfig { normalization_ceiling: 0.0, ..Default::default() };
        assert!(matches!(ceiling.validate(), Err(ConfigError::InvalidCeiling(_))));
    }
}
