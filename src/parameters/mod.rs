//! Stack parameter resolution.
//!
//! A [`ParameterCollection`] is built from the parameters a template declares
//! and then filled in by the [`OverrideResolver`] from answer files and
//! explicit overrides, before being checked for a create or update call.

pub mod collection;
pub mod config;
pub mod error;
pub mod overrides;
pub mod parameter;
pub mod template;

pub use collection::{ParameterCollection, StackOperation, StackParameterValue};
pub use config::{ControllerConfig, ResolverConfig};
pub use error::{OverrideSource, ParameterError, ParameterResult};
pub use overrides::OverrideResolver;
pub use parameter::StackParameter;
pub use template::{StackTemplate, TemplateDocument};
