use super::error::OverrideSource;

/// A single parameter declared by a stack template
#[derive(Debug, Clone, PartialEq)]
pub struct StackParameter {
    name: String,
    default: Option<String>,
    description: Option<String>,
    value: Option<String>,
    source: Option<OverrideSource>,
    use_previous: bool,
}

impl StackParameter {
    /// Create a parameter with no default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            description: None,
            value: None,
            source: None,
            use_previous: false,
        }
    }

    /// Set the template default (an empty string is still a default)
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Explicitly assigned value, if any
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Where the current value came from
    pub fn source(&self) -> Option<&OverrideSource> {
        self.source.as_ref()
    }

    /// The value the stack would receive: the assigned value, else the default
    pub fn effective_value(&self) -> Option<&str> {
        self.value().or(self.default())
    }

    /// Assign a value without recording where it came from
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
        self.source = None;
    }

    /// Assign a value and remember which override layer wrote it
    pub fn set_from(&mut self, value: impl Into<String>, source: OverrideSource) {
        self.value = Some(value.into());
        self.source = Some(source);
    }

    /// Keep whatever value the existing stack holds on update
    pub fn use_previous_value(&mut self, use_previous: bool) {
        self.use_previous = use_previous;
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn use_previous(&self) -> bool {
        self.use_previous
    }
}
