//! Stack parameter resolution: build the parameter set a stack template
//! declares, fill it from answer files and explicit overrides, and check it
//! before a create or update call.

pub mod commands;
pub mod context;
pub mod output;
pub mod parameters;
pub mod test_helpers;
pub mod traits;
