use indexmap::IndexMap;
use serde::Serialize;

use super::error::{OverrideSource, ParameterError, ParameterResult};
use super::parameter::StackParameter;
use super::template::StackTemplate;

/// The remote operation a resolved collection is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOperation {
    Create,
    Update,
}

impl std::fmt::Display for StackOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackOperation::Create => write!(f, "create"),
            StackOperation::Update => write!(f, "update"),
        }
    }
}

/// One entry of the parameter list sent with a create/update call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackParameterValue {
    pub parameter_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_previous_value: Option<bool>,
}

/// Map of the parameters a stack template declares.
///
/// The set of names is fixed when the collection is built from a template.
/// Every write goes through [`ParameterCollection::set`] (or one of its
/// siblings), which rejects names the template does not declare instead of
/// growing the map. Iteration follows declaration order.
#[derive(Debug, Clone, Default)]
pub struct ParameterCollection {
    parameters: IndexMap<String, StackParameter>,
}

impl ParameterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection holding one unset parameter per template declaration.
    /// A name declared twice keeps its first position and its last declaration.
    pub fn from_template(template: &dyn StackTemplate) -> ParameterResult<Self> {
        let mut collection = Self::new();

        for declared in template.parameters() {
            collection.add(declared.to_parameter())?;
        }

        Ok(collection)
    }

    /// Insert or replace a parameter under its own name. Any non-empty name
    /// is accepted as declared.
    pub fn add(&mut self, parameter: StackParameter) -> ParameterResult<()> {
        let name = parameter.name().to_string();

        if name.is_empty() {
            return Err(ParameterError::InvalidParameterType(
                "a parameter needs a name to be keyed by".to_string(),
            ));
        }

        self.parameters.insert(name, parameter);
        Ok(())
    }

    /// Assign a value to a declared parameter
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> ParameterResult<()> {
        self.declared_mut(key, None)?.set(value);
        Ok(())
    }

    /// Assign a value to a declared parameter, recording the override layer
    pub fn set_from(
        &mut self,
        key: &str,
        value: impl Into<String>,
        source: OverrideSource,
    ) -> ParameterResult<()> {
        let param = self.declared_mut(key, Some(&source))?;
        param.set_from(value, source);
        Ok(())
    }

    /// Flag a declared parameter to keep the stack's current value on update
    pub fn use_previous(&mut self, key: &str) -> ParameterResult<()> {
        self.declared_mut(key, None)?.use_previous_value(true);
        Ok(())
    }

    fn declared_mut(
        &mut self,
        key: &str,
        source: Option<&OverrideSource>,
    ) -> ParameterResult<&mut StackParameter> {
        self.parameters
            .get_mut(key)
            .ok_or_else(|| ParameterError::UnknownParameter {
                name: key.to_string(),
                source: source.cloned(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.parameters.contains_key(key)
    }

    pub fn get(&self, key: &str) -> ParameterResult<&StackParameter> {
        self.parameters
            .get(key)
            .ok_or_else(|| ParameterError::NotFound(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &StackParameter> {
        self.parameters.values()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Parameters a CreateStack call cannot do without. There is no previous
    /// value on create, so only a set value or a template default counts.
    pub fn missing_for_create(&self) -> Vec<&StackParameter> {
        self.values()
            .filter(|p| !p.is_set() && !p.has_default())
            .collect()
    }

    /// Parameters an UpdateStack call cannot do without. A parameter flagged
    /// to use its previous value is never missing.
    pub fn missing_for_update(&self) -> Vec<&StackParameter> {
        self.values()
            .filter(|p| !p.is_set() && !p.has_default() && !p.use_previous())
            .collect()
    }

    pub fn missing_for(&self, operation: StackOperation) -> Vec<&StackParameter> {
        match operation {
            StackOperation::Create => self.missing_for_create(),
            StackOperation::Update => self.missing_for_update(),
        }
    }

    /// Parameter list for a create call. Unset parameters are left out so the
    /// template default applies.
    pub fn to_create_parameters(&self) -> Vec<StackParameterValue> {
        self.values()
            .filter_map(|p| {
                p.value().map(|value| StackParameterValue {
                    parameter_key: p.name().to_string(),
                    parameter_value: Some(value.to_string()),
                    use_previous_value: None,
                })
            })
            .collect()
    }

    /// Parameter list for an update call. An explicit value wins over the
    /// previous-value flag.
    pub fn to_update_parameters(&self) -> Vec<StackParameterValue> {
        self.values()
            .filter_map(|p| match p.value() {
                Some(value) => Some(StackParameterValue {
                    parameter_key: p.name().to_string(),
                    parameter_value: Some(value.to_string()),
                    use_previous_value: None,
                }),
                None if p.use_previous() => Some(StackParameterValue {
                    parameter_key: p.name().to_string(),
                    parameter_value: None,
                    use_previous_value: Some(true),
                }),
                None => None,
            })
            .collect()
    }

    pub fn to_parameters(&self, operation: StackOperation) -> Vec<StackParameterValue> {
        match operation {
            StackOperation::Create => self.to_create_parameters(),
            StackOperation::Update => self.to_update_parameters(),
        }
    }
}
