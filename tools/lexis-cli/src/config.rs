//! Propagation settings with layered resolution.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults
//! 2. The TOML file given with `--config`
//! 3. Environment variables: `LEXIS_*` (e.g. `LEXIS_NOUN_PHRASE_SCALE=0.75`)

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use lexis_salience::PropagationConfig;

pub fn load(file: Option<&Path>) -> Result<PropagationConfig, figment::Error> {
    let mut figment = Figment::from(Serialized::defaults(PropagationConfig::default()));
    if let Some(file) = file {
        figment = figment.merge(Toml::file(file));
    }
    figment.merge(Env::prefixed("LEXIS_")).extract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            assert_eq!(load(None)?, PropagationConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file("lexis.toml", "noun_scale = 2.5\nverb_scale = 2.0\nparallelism = 2\n")?;
            jail.set_env("LEXIS_VERB_SCALE", "3.0");

            let config = load(Some(Path::new("lexis.toml")))?;

            assert_eq!(config.noun_scale, 2.5);
            assert_eq!(config.verb_scale, 3.0);
            assert_eq!(config.parallelism, Some(2));
            assert_eq!(config.noun_phrase_scale, 0.5);
            Ok(())
        });
    }
}
