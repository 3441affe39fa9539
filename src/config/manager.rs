use super::{
    fitness::FitnessConfig,
    optimizer::OptimizerConfig,
    traits::ConfigSection,
    tuning::TuningConfig,
};
use crate::error::CodonoptError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `CODONOPT_OPTIMIZER__N_ITER=200`.
pub const ENV_PREFIX: &str = "CODONOPT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub optimizer: OptimizerConfig,
    pub fitness: FitnessConfig,
    pub tuning: TuningConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), CodonoptError> {
        self.optimizer.validate()?;
        self.fitness.validate()?;
        self.tuning.validate()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TOML or JSON file, layering `CODONOPT_*` environment overrides on top.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CodonoptError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?;
        self.install(settings.try_deserialize()?)
    }

    /// Defaults overridden only by the environment.
    pub fn load_from_env(&mut self) -> Result<(), CodonoptError> {
        let settings = ::config::Config::builder()
            .add_source(Self::environment())
            .build()?;
        self.install(settings.try_deserialize()?)
    }

    pub fn load_from_str(&mut self, contents: &str) -> Result<(), CodonoptError> {
        let config: AppConfig = toml::from_str(contents)?;
        self.install(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CodonoptError> {
        let toml_str = toml::to_string_pretty(&self.config)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Apply an edit and keep it only if the result still validates.
    pub fn update<F>(&mut self, f: F) -> Result<(), CodonoptError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.config.clone();
        f(&mut candidate);
        self.install(candidate)
    }

    fn install(&mut self, config: AppConfig) -> Result<(), CodonoptError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    fn environment() -> ::config::Environment {
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }
}
