use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::path::PathBuf;

use super::collection::ParameterCollection;
use super::config::{ResolverConfig, default_answer_file, validate_config};
use super::error::{OverrideSource, ParameterError, ParameterResult};
use super::template::scalar_text;
use crate::traits::{FileSystem, Output};

/// A source of name/value overrides, applied to a collection in order
pub trait OverrideLayer {
    /// Where values from this layer come from
    fn source(&self) -> OverrideSource;

    /// Load the layer's values. `None` means the layer is absent and skipped.
    fn load(&self) -> ParameterResult<Option<IndexMap<String, String>>>;
}

/// A YAML file mapping parameter names to scalar values
pub struct AnswerFileLayer<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> AnswerFileLayer<'a> {
    pub fn new(fs: &'a dyn FileSystem, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    fn parse(&self, content: &str) -> ParameterResult<IndexMap<String, String>> {
        let invalid = |message: String| ParameterError::InvalidAnswerFile {
            path: self.path.clone(),
            message,
        };

        let AnswerEntries(entries) =
            serde_yaml::from_str(content).map_err(|e| invalid(e.to_string()))?;

        let mut values = IndexMap::new();

        for (key, value) in entries {
            let name = match &key {
                serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
                    return Err(invalid("parameter names must be scalars".to_string()));
                }
                other => scalar_text(other),
            };

            if matches!(
                value,
                serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_)
            ) {
                return Err(ParameterError::NonScalarValue {
                    name,
                    source: self.source(),
                });
            }

            values.insert(name, scalar_text(&value));
        }

        Ok(values)
    }
}

/// Top-level entries of an answer file in file order. A repeated key is
/// kept twice, so the later value wins once folded into a map.
struct AnswerEntries(Vec<(serde_yaml::Value, serde_yaml::Value)>);

impl<'de> Deserialize<'de> for AnswerEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AnswerEntriesVisitor)
    }
}

struct AnswerEntriesVisitor;

impl<'de> Visitor<'de> for AnswerEntriesVisitor {
    type Value = AnswerEntries;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of parameter names to values")
    }

    // Empty or comment-only file
    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(AnswerEntries(Vec::new()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(AnswerEntries(Vec::new()))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();

        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }

        Ok(AnswerEntries(entries))
    }
}

impl OverrideLayer for AnswerFileLayer<'_> {
    fn source(&self) -> OverrideSource {
        OverrideSource::AnswerFile(self.path.clone())
    }

    fn load(&self) -> ParameterResult<Option<IndexMap<String, String>>> {
        if !self.fs.is_file(&self.path) {
            return Ok(None);
        }

        let content = self
            .fs
            .read_to_string(&self.path)
            .map_err(|e| ParameterError::Io {
                path: self.path.clone(),
                message: format!("{:#}", e),
            })?;

        self.parse(&content).map(Some)
    }
}

/// Name/value pairs given directly by the caller
pub struct ExplicitLayer {
    values: IndexMap<String, String>,
}

impl ExplicitLayer {
    pub fn new(values: IndexMap<String, String>) -> Self {
        Self { values }
    }
}

impl OverrideLayer for ExplicitLayer {
    fn source(&self) -> OverrideSource {
        OverrideSource::Explicit
    }

    fn load(&self) -> ParameterResult<Option<IndexMap<String, String>>> {
        Ok(Some(self.values.clone()))
    }
}

/// Applies answer files and explicit overrides onto a parameter collection.
///
/// Layers, from least to most important:
///   * `<project_root>/params/<environment>.yml`, or the answer file the user chose
///   * explicit `KEY=VALUE` overrides
///
/// Application stops at the first key the template does not declare. Layers
/// applied before that point stay applied.
pub struct OverrideResolver<'a> {
    fs: &'a dyn FileSystem,
    output: &'a dyn Output,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem, output: &'a dyn Output) -> Self {
        Self { fs, output }
    }

    pub fn from_context(ctx: &'a crate::context::Context) -> Self {
        Self::new(&*ctx.fs, &*ctx.output)
    }

    /// The ordered layers for a configuration, least important first
    pub fn layers(&self, config: &dyn ResolverConfig) -> Vec<Box<dyn OverrideLayer + 'a>> {
        let answer_file = config
            .answer_file()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| {
                default_answer_file(config.project_root(), config.environment_name())
            });

        vec![
            Box::new(AnswerFileLayer::new(self.fs, answer_file)),
            Box::new(ExplicitLayer::new(config.parameter_overrides().clone())),
        ]
    }

    /// Apply every layer for `config`, then the use-previous flags
    pub fn apply_overrides(
        &self,
        config: &dyn ResolverConfig,
        parameters: &mut ParameterCollection,
    ) -> ParameterResult<()> {
        validate_config(config)?;

        self.apply_layers(&self.layers(config), parameters)?;

        for key in config.use_previous_parameters() {
            parameters.use_previous(key)?;
            self.output
                .dimmed(&format!("Using previous value for {}", key));
        }

        Ok(())
    }

    /// Fold layers onto the collection left to right; later layers win
    pub fn apply_layers(
        &self,
        layers: &[Box<dyn OverrideLayer + 'a>],
        parameters: &mut ParameterCollection,
    ) -> ParameterResult<()> {
        for layer in layers {
            let source = layer.source();

            let Some(values) = layer.load()? else {
                self.output
                    .dimmed(&format!("No {} found, skipping", source));
                continue;
            };

            if values.is_empty() {
                continue;
            }

            self.output.dimmed(&format!(
                "Applying {} value(s) from {}",
                values.len(),
                source
            ));

            for (key, value) in values {
                parameters.set_from(&key, value, source.clone())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::config::ControllerConfig;
    use crate::test_helpers::TemplateBuilder;
    use crate::traits::{MockFileSystem, MockOutput};
    use std::path::Path;

    fn collection() -> ParameterCollection {
        let template = TemplateBuilder::new()
            .parameter("InstanceType")
            .parameter_with_default("Env", "prod")
            .parameter("Port")
            .build();

        ParameterCollection::from_template(&template).unwrap()
    }

    fn write(fs: &MockFileSystem, path: &str, content: &str) {
        fs.write(Path::new(path), content).unwrap();
    }

    #[test]
    fn test_environment_answer_file_applied() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();
        write(&fs, "/app/params/dev.yml", "InstanceType: t3.micro\n");

        let mut params = collection();
        let config = ControllerConfig::new("/app", "dev");
        OverrideResolver::new(&fs, &output)
            .apply_overrides(&config, &mut params)
            .unwrap();

        let param = params.get("InstanceType").unwrap();
        assert_eq!(param.value(), Some("t3.micro"));
        assert_eq!(
            param.source(),
            Some(&OverrideSource::AnswerFile(PathBuf::from("/app/params/dev.yml")))
        );
    }

    #[test]
    fn test_explicit_override_wins_over_answer_file() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();
        write(&fs, "/app/params/dev.yml", "InstanceType: t3.micro\n");

        let mut params = collection();
        let config = ControllerConfig::new("/app", "dev").with_override("InstanceType", "t3.large");
        OverrideResolver::new(&fs, &output)
            .apply_overrides(&config, &mut params)
            .unwrap();

        let param = params.get("InstanceType").unwrap();
        assert_eq!(param.value(), Some("t3.large"));
        assert_eq!(param.source(), Some(&OverrideSource::Explicit));
    }

    #[test]
    fn test_chosen_answer_file_replaces_environment_file() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();
        write(&fs, "/app/params/dev.yml", "Port: \"80\"\n");
        write(&fs, "/tmp/answers.yml", "InstanceType: m5.large\n");

        let mut params = collection();
        let config = ControllerConfig::new("/app", "dev").with_answer_file("/tmp/answers.yml");
        OverrideResolver::new(&fs, &output)
            .apply_overrides(&config, &mut params)
            .unwrap();

        assert_eq!(params.get("InstanceType").unwrap().value(), Some("m5.large"));
        assert!(!params.get("Port").unwrap().is_set());
    }

    #[test]
    fn test_missing_answer_file_is_skipped() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();

        let mut params = collection();
        let config = ControllerConfig::new("/app", "dev").with_override("Port", "443");
        OverrideResolver::new(&fs, &output)
            .apply_overrides(&config, &mut params)
            .unwrap();

        assert_eq!(params.get("Port").unwrap().value(), Some("443"));
        assert!(output.to_text().contains("No answer file /app/params/dev.yml found"));
    }

    #[test]
    fn test_unknown_key_in_answer_file_fails() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();
        write(&fs, "/app/params/dev.yml", "InstanceType: t3.micro\nBogus: 1\n");

        let mut params = collection();
        let config = ControllerConfig::new("/app", "dev").with_override("Port", "443");
        let err = OverrideResolver::new(&fs, &output)
            .apply_overrides(&config, &mut params)
            .unwrap_err();

        match err {
            ParameterError::UnknownParameter { name, source } => {
                assert_eq!(name, "Bogus");
                assert_eq!(
                    source,
                    Some(OverrideSource::AnswerFile(PathBuf::from("/app/params/dev.yml")))
                );
            }
            other => panic!("unexpected error: {}", other),
        }

        // Keys before the bad one stay applied; later layers never run.
        assert_eq!(params.get("InstanceType").unwrap().value(), Some("t3.micro"));
        assert!(!params.get("Port").unwrap().is_set());
    }

    #[test]
    fn test_unknown_explicit_override_keeps_file_layer() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();
        write(&fs, "/app/params/dev.yml", "InstanceType: t3.micro\n");

        let mut params = collection();
        let config = ControllerConfig::new("/app", "dev").with_override("Bogus", "x");
        let result = OverrideResolver::new(&fs, &output).apply_overrides(&config, &mut params);

        assert!(matches!(
            result,
            Err(ParameterError::UnknownParameter { source: Some(OverrideSource::Explicit), .. })
        ));
        assert_eq!(params.get("InstanceType").unwrap().value(), Some("t3.micro"));
    }

    #[test]
    fn test_applying_twice_is_idempotent() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();
        write(&fs, "/app/params/dev.yml", "InstanceType: t3.micro\nEnv: qa\n");
        let config = ControllerConfig::new("/app", "dev").with_override("Port", "443");
        let resolver = OverrideResolver::new(&fs, &output);

        let mut once = collection();
        resolver.apply_overrides(&config, &mut once).unwrap();

        let mut twice = collection();
        resolver.apply_overrides(&config, &mut twice).unwrap();
        resolver.apply_overrides(&config, &mut twice).unwrap();

        assert_eq!(
            once.values().cloned().collect::<Vec<_>>(),
            twice.values().cloned().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_use_previous_applied_after_layers() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();

        let mut params = collection();
        let config = ControllerConfig::new("/app", "dev")
            .with_override("Port", "443")
            .with_use_previous("InstanceType");
        OverrideResolver::new(&fs, &output)
            .apply_overrides(&config, &mut params)
            .unwrap();

        assert!(params.get("InstanceType").unwrap().use_previous());
        assert!(params.missing_for_update().is_empty());
        assert_eq!(params.missing_for_create().len(), 1);
    }

    #[test]
    fn test_use_previous_unknown_parameter() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();

        let mut params = collection();
        let config = ControllerConfig::new("/app", "dev").with_use_previous("Bogus");
        let result = OverrideResolver::new(&fs, &output).apply_overrides(&config, &mut params);

        assert!(matches!(result, Err(ParameterError::UnknownParameter { .. })));
    }

    #[test]
    fn test_invalid_config_rejected_before_any_layer() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();

        let mut params = collection();
        let config = ControllerConfig::new("/app", "").with_override("Port", "443");
        let result = OverrideResolver::new(&fs, &output).apply_overrides(&config, &mut params);

        assert!(matches!(result, Err(ParameterError::InvalidConfigType(_))));
        assert!(!params.get("Port").unwrap().is_set());
    }

    #[test]
    fn test_layers_ordered_file_then_explicit() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();
        let config = ControllerConfig::new("/app", "prod");

        let layers = OverrideResolver::new(&fs, &output).layers(&config);

        assert_eq!(layers.len(), 2);
        assert_eq!(
            layers[0].source(),
            OverrideSource::AnswerFile(PathBuf::from("/app/params/prod.yml"))
        );
        assert_eq!(layers[1].source(), OverrideSource::Explicit);
    }

    #[test]
    fn test_apply_layers_last_write_wins() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();
        let mut first = IndexMap::new();
        first.insert("Port".to_string(), "80".to_string());
        let mut second = IndexMap::new();
        second.insert("Port".to_string(), "8080".to_string());

        let layers: Vec<Box<dyn OverrideLayer>> = vec![
            Box::new(ExplicitLayer::new(first)),
            Box::new(ExplicitLayer::new(second)),
        ];

        let mut params = collection();
        OverrideResolver::new(&fs, &output)
            .apply_layers(&layers, &mut params)
            .unwrap();

        assert_eq!(params.get("Port").unwrap().value(), Some("8080"));
    }

    #[test]
    fn test_answer_file_scalars_rendered_as_text() {
        let fs = MockFileSystem::new();
        write(
            &fs,
            "/a.yml",
            "Port: 8080\nEnabled: true\nRatio: 0.5\nEmpty: ~\nName: web\n",
        );

        let values = AnswerFileLayer::new(&fs, "/a.yml").load().unwrap().unwrap();

        assert_eq!(values["Port"], "8080");
        assert_eq!(values["Enabled"], "true");
        assert_eq!(values["Ratio"], "0.5");
        assert_eq!(values["Empty"], "");
        assert_eq!(values["Name"], "web");
        assert_eq!(values.keys().collect::<Vec<_>>(), ["Port", "Enabled", "Ratio", "Empty", "Name"]);
    }

    #[test]
    fn test_answer_file_repeated_key_last_wins() {
        let fs = MockFileSystem::new();
        write(
            &fs,
            "/a.yml",
            "InstanceType: t3.micro\nPort: 80\nInstanceType: t3.large\n",
        );

        let values = AnswerFileLayer::new(&fs, "/a.yml").load().unwrap().unwrap();

        assert_eq!(values["InstanceType"], "t3.large");
        assert_eq!(values.keys().collect::<Vec<_>>(), ["InstanceType", "Port"]);
    }

    #[test]
    fn test_repeated_key_in_environment_file_resolves_to_last() {
        let fs = MockFileSystem::new();
        let output = MockOutput::new();
        write(
            &fs,
            "/app/params/dev.yml",
            "InstanceType: t3.micro\nInstanceType: t3.large\n",
        );

        let mut params = collection();
        let config = ControllerConfig::new("/app", "dev");
        OverrideResolver::new(&fs, &output)
            .apply_overrides(&config, &mut params)
            .unwrap();

        assert_eq!(params.get("InstanceType").unwrap().value(), Some("t3.large"));
    }

    #[test]
    fn test_comment_only_answer_file_is_empty_layer() {
        let fs = MockFileSystem::new();
        write(&fs, "/a.yml", "# nothing set for this environment\n");

        let values = AnswerFileLayer::new(&fs, "/a.yml").load().unwrap();

        assert_eq!(values, Some(IndexMap::new()));
    }

    #[test]
    fn test_empty_answer_file_is_empty_layer() {
        let fs = MockFileSystem::new();
        write(&fs, "/a.yml", "");

        let values = AnswerFileLayer::new(&fs, "/a.yml").load().unwrap();

        assert_eq!(values, Some(IndexMap::new()));
    }

    #[test]
    fn test_answer_file_must_be_mapping() {
        let fs = MockFileSystem::new();
        write(&fs, "/a.yml", "- InstanceType\n- Port\n");

        let result = AnswerFileLayer::new(&fs, "/a.yml").load();

        assert!(matches!(result, Err(ParameterError::InvalidAnswerFile { .. })));
    }

    #[test]
    fn test_answer_file_nested_value_rejected() {
        let fs = MockFileSystem::new();
        write(&fs, "/a.yml", "Subnets:\n  - a\n  - b\n");

        let result = AnswerFileLayer::new(&fs, "/a.yml").load();

        assert!(matches!(
            result,
            Err(ParameterError::NonScalarValue { ref name, .. }) if name == "Subnets"
        ));
    }

    #[test]
    fn test_malformed_answer_file() {
        let fs = MockFileSystem::new();
        write(&fs, "/a.yml", "InstanceType: [unterminated\n");

        let result = AnswerFileLayer::new(&fs, "/a.yml").load();

        assert!(matches!(result, Err(ParameterError::InvalidAnswerFile { .. })));
    }
}
