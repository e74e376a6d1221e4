//! Test helpers for building stack templates
//!
//! Builds parameter declarations either as in-memory templates or as
//! template documents for the mock filesystem.

#![cfg(test)]

use crate::parameters::template::DeclaredParameter;

/// Builder for a stack template's parameter declarations
pub struct TemplateBuilder {
    parameters: Vec<DeclaredParameter>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self {
            parameters: Vec::new(),
        }
    }

    /// Declare a parameter with no default
    pub fn parameter(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(DeclaredParameter {
            name: name.into(),
            default: None,
            description: None,
        });
        self
    }

    /// Declare a parameter with a default value
    pub fn parameter_with_default(
        mut self,
        name: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        self.parameters.push(DeclaredParameter {
            name: name.into(),
            default: Some(default.into()),
            description: None,
        });
        self
    }

    /// Build the in-memory template
    pub fn build(self) -> Vec<DeclaredParameter> {
        self.parameters
    }

    /// Render as a template document (YAML)
    pub fn to_yaml(&self) -> String {
        let mut yaml = String::from("AWSTemplateFormatVersion: \"2010-09-09\"\nParameters:\n");

        for param in &self.parameters {
            yaml.push_str(&format!("  {}:\n    Type: String\n", param.name));

            if let Some(default) = &param.default {
                yaml.push_str(&format!("    Default: \"{}\"\n", default));
            }
        }

        yaml.push_str("Resources: {}\n");
        yaml
    }
}
