use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use super::error::{ParameterError, ParameterResult};

/// What the override resolver needs to know about a deployment
pub trait ResolverConfig {
    fn project_root(&self) -> &Path;

    fn environment_name(&self) -> &str;

    /// Answer file chosen by the user; replaces the environment's default one
    fn answer_file(&self) -> Option<&Path>;

    /// Highest-priority name/value overrides
    fn parameter_overrides(&self) -> &IndexMap<String, String>;

    /// Parameters that keep their current stack value on update
    fn use_previous_parameters(&self) -> &[String] {
        &[]
    }
}

/// Deployment settings assembled by the CLI
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    pub project_root: PathBuf,
    pub environment_name: String,
    pub answer_file: Option<PathBuf>,
    pub parameter_overrides: IndexMap<String, String>,
    pub use_previous: Vec<String>,
}

impl ControllerConfig {
    pub fn new(project_root: impl Into<PathBuf>, environment_name: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            environment_name: environment_name.into(),
            ..Self::default()
        }
    }

    pub fn with_answer_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.answer_file = Some(path.into());
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameter_overrides.insert(key.into(), value.into());
        self
    }

    pub fn with_use_previous(mut self, key: impl Into<String>) -> Self {
        self.use_previous.push(key.into());
        self
    }
}

impl ResolverConfig for ControllerConfig {
    fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn environment_name(&self) -> &str {
        &self.environment_name
    }

    fn answer_file(&self) -> Option<&Path> {
        self.answer_file.as_deref()
    }

    fn parameter_overrides(&self) -> &IndexMap<String, String> {
        &self.parameter_overrides
    }

    fn use_previous_parameters(&self) -> &[String] {
        &self.use_previous
    }
}

/// Answer file for an environment: `<project_root>/params/<environment>.yml`
pub fn default_answer_file(project_root: &Path, environment_name: &str) -> PathBuf {
    project_root
        .join("params")
        .join(format!("{}.yml", environment_name))
}

/// The environment name becomes a file name, so it must not be empty or
/// walk out of the `params` directory.
pub fn validate_config(config: &dyn ResolverConfig) -> ParameterResult<()> {
    let env = config.environment_name();

    if env.trim().is_empty() {
        return Err(ParameterError::InvalidConfigType(
            "environment name is required".to_string(),
        ));
    }

    if env.contains(['/', '\\']) || env == "." || env == ".." {
        return Err(ParameterError::InvalidConfigType(format!(
            "environment name '{}' must not contain path separators",
            env
        )));
    }

    Ok(())
}
