use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

use super::parameter::StackParameter;
use crate::traits::FileSystem;

/// A parameter as declared by a stack template
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredParameter {
    pub name: String,
    pub default: Option<String>,
    pub description: Option<String>,
}

impl DeclaredParameter {
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Build the unset parameter slot for this declaration
    pub fn to_parameter(&self) -> StackParameter {
        let mut param = StackParameter::new(self.name.clone());

        if let Some(default) = &self.default {
            param = param.with_default(default.clone());
        }

        if let Some(description) = &self.description {
            param = param.with_description(description.clone());
        }

        param
    }
}

/// Anything that can enumerate the parameters a stack declares
pub trait StackTemplate {
    /// Declared parameters, in declaration order. Duplicates are allowed;
    /// the collection keeps the last one.
    fn parameters(&self) -> Vec<DeclaredParameter>;
}

impl StackTemplate for Vec<DeclaredParameter> {
    fn parameters(&self) -> Vec<DeclaredParameter> {
        self.clone()
    }
}

/// The `Parameters` section of a template document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateDocument {
    #[serde(rename = "Parameters", default)]
    pub parameters: IndexMap<String, ParameterDeclaration>,
}

/// One entry under `Parameters`. `Type`, constraints and the rest are left
/// to the stack service to validate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterDeclaration {
    #[serde(rename = "Default", default, deserialize_with = "deserialize_present")]
    pub default: Option<serde_yaml::Value>,

    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

// `Default: ~` still declares a default, so presence is tracked separately from null.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<serde_yaml::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_yaml::Value::deserialize(deserializer).map(Some)
}

impl TemplateDocument {
    /// Parse a template body (YAML or JSON)
    pub fn parse(content: &str) -> Result<Self> {
        // Intrinsic function tags (!Ref, !Sub...) only appear outside `Parameters`,
        // so parse loosely and pull out the one section we need.
        let root: serde_yaml::Value =
            serde_yaml::from_str(content).context("Failed to parse template")?;

        let Some(section) = root.get("Parameters") else {
            return Ok(Self::default());
        };

        let parameters = serde_yaml::from_value(section.clone())
            .context("Template 'Parameters' section must be a mapping")?;

        Ok(Self { parameters })
    }

    /// Load a template from a file
    pub fn from_file(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs.read_to_string(path)?;

        Self::parse(&content).with_context(|| format!("Failed to load template {:?}", path))
    }
}

impl StackTemplate for TemplateDocument {
    fn parameters(&self) -> Vec<DeclaredParameter> {
        self.parameters
            .iter()
            .map(|(name, decl)| DeclaredParameter {
                name: name.clone(),
                default: decl.default.as_ref().map(scalar_text),
                description: decl.description.clone(),
            })
            .collect()
    }
}

/// Render a YAML value the way it would be passed to the stack service
pub(crate) fn scalar_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Tagged(tagged) => scalar_text(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockFileSystem;
    use std::path::PathBuf;

    const TEMPLATE: &str = r#"
AWSTemplateFormatVersion: "2010-09-09"
Parameters:
  InstanceType:
    Type: String
    Description: EC2 instance type
  Env:
    Type: String
    Default: prod
  Port:
    Type: Number
    Default: 8080
  KeyName:
    Type: String
    Default: ""
Resources:
  Instance:
    Type: AWS::EC2::Instance
    Properties:
      InstanceType: !Ref InstanceType
"#;

    #[test]
    fn test_parse_parameters_in_order() {
        let doc = TemplateDocument::parse(TEMPLATE).unwrap();
        let names: Vec<String> = doc.parameters().into_iter().map(|p| p.name).collect();

        assert_eq!(names, vec!["InstanceType", "Env", "Port", "KeyName"]);
    }

    #[test]
    fn test_parse_defaults() {
        let doc = TemplateDocument::parse(TEMPLATE).unwrap();
        let params = doc.parameters();

        assert!(!params[0].has_default());
        assert_eq!(params[0].description.as_deref(), Some("EC2 instance type"));
        assert_eq!(params[1].default.as_deref(), Some("prod"));
        assert_eq!(params[2].default.as_deref(), Some("8080"));
        assert_eq!(params[3].default.as_deref(), Some(""));
    }

    #[test]
    fn test_null_default_is_still_a_default() {
        let doc = TemplateDocument::parse("Parameters:\n  Tag:\n    Default: ~\n").unwrap();

        assert!(doc.parameters()[0].has_default());
    }

    #[test]
    fn test_template_without_parameters() {
        let doc = TemplateDocument::parse("Resources: {}\n").unwrap();

        assert!(doc.parameters().is_empty());
    }

    #[test]
    fn test_json_template() {
        let doc = TemplateDocument::parse(
            r#"{"Parameters": {"Size": {"Type": "Number", "Default": 3}}}"#,
        )
        .unwrap();

        assert_eq!(doc.parameters()[0].default.as_deref(), Some("3"));
    }

    #[test]
    fn test_parameters_must_be_mapping() {
        let result = TemplateDocument::parse("Parameters:\n  - InstanceType\n");

        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let fs = MockFileSystem::new();
        let path = PathBuf::from("/project/template.yml");
        fs.write(&path, TEMPLATE).unwrap();

        let doc = TemplateDocument::from_file(&fs, &path).unwrap();
        assert_eq!(doc.parameters().len(), 4);
    }

    #[test]
    fn test_from_missing_file() {
        let fs = MockFileSystem::new();

        assert!(TemplateDocument::from_file(&fs, Path::new("/nope.yml")).is_err());
    }

    #[test]
    fn test_to_parameter_carries_declaration() {
        let decl = DeclaredParameter {
            name: "Env".to_string(),
            default: Some("prod".to_string()),
            description: Some("Deployment environment".to_string()),
        };

        let param = decl.to_parameter();
        assert_eq!(param.name(), "Env");
        assert_eq!(param.default(), Some("prod"));
        assert_eq!(param.description(), Some("Deployment environment"));
        assert!(!param.is_set());
    }
}
