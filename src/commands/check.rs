use super::resolve::resolve_parameters;
use crate::context::Context;
use crate::parameters::{ControllerConfig, StackOperation};
use anyhow::Result;
use std::path::Path;

/// Handles the 'check' command - verifies a stack operation has every parameter it needs
pub struct CheckCommand;

impl CheckCommand {
    /// Execute the check command
    pub fn execute(
        ctx: &Context,
        template_path: &Path,
        config: &ControllerConfig,
        operation: StackOperation,
    ) -> Result<()> {
        ctx.output.section("Stack Parameters");
        ctx.output.environment_badge(&config.environment_name);
        ctx.output.key_value("Operation", &operation.to_string());

        let parameters = resolve_parameters(ctx, template_path, config)?;
        let missing = parameters.missing_for(operation);

        if missing.is_empty() {
            ctx.output.success(&format!(
                "All {} parameter(s) resolved for {}",
                parameters.len(),
                operation
            ));
            return Ok(());
        }

        ctx.output
            .error(&format!("Missing parameters for stack {}:", operation));

        for param in &missing {
            match param.description() {
                Some(description) => ctx
                    .output
                    .list_item(&format!("{} ({})", param.name(), description)),
                None => ctx.output.list_item(param.name()),
            }
        }

        if operation == StackOperation::Update {
            ctx.output
                .warning("Use --use-previous KEY to keep a parameter's current value");
        }

        let names: Vec<&str> = missing.iter().map(|p| p.name()).collect();
        anyhow::bail!(
            "{} parameter(s) missing for stack {}: {}",
            names.len(),
            operation,
            names.join(", ")
        )
    }
}
