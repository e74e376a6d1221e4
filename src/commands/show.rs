use super::resolve::resolve_parameters;
use crate::context::Context;
use crate::parameters::{ControllerConfig, ParameterCollection, StackOperation, StackParameter};
use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;

/// How resolved parameters are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// Human-readable listing with provenance
    Text,
    /// The parameter list for the stack call, as JSON on stdout
    Json,
}

/// Handles the 'show' command - prints the resolved parameters
pub struct ShowCommand;

impl ShowCommand {
    /// Execute the show command
    pub fn execute(
        ctx: &Context,
        template_path: &Path,
        config: &ControllerConfig,
        operation: StackOperation,
        format: ShowFormat,
    ) -> Result<()> {
        let parameters = resolve_parameters(ctx, template_path, config)?;

        match format {
            ShowFormat::Json => {
                println!("{}", Self::render_json(&parameters, operation)?);
            }
            ShowFormat::Text => Self::render_text(ctx, &parameters, config, operation),
        }

        Ok(())
    }

    fn render_json(parameters: &ParameterCollection, operation: StackOperation) -> Result<String> {
        serde_json::to_string_pretty(&parameters.to_parameters(operation))
            .context("Failed to serialize stack parameters")
    }

    fn render_text(
        ctx: &Context,
        parameters: &ParameterCollection,
        config: &ControllerConfig,
        operation: StackOperation,
    ) {
        ctx.output.section("Resolved Parameters");
        ctx.output.environment_badge(&config.environment_name);

        if parameters.is_empty() {
            ctx.output.dimmed("Template declares no parameters.");
            return;
        }

        for param in parameters.values() {
            ctx.output
                .key_value(param.name(), &Self::describe(param, operation));
        }

        let missing = parameters.missing_for(operation).len();
        if missing > 0 {
            ctx.output.blank();
            ctx.output.warning(&format!(
                "{} parameter(s) still missing for stack {}",
                missing, operation
            ));
        }
    }

    /// One-line summary of where a parameter's value will come from
    fn describe(param: &StackParameter, operation: StackOperation) -> String {
        if let Some(value) = param.value() {
            return match param.source() {
                Some(source) => format!("{} (from {})", value, source),
                None => value.to_string(),
            };
        }

        if operation == StackOperation::Update && param.use_previous() {
            return "<previous value>".to_string();
        }

        match param.default() {
            Some(default) => format!("{} (template default)", default),
            None => "<missing>".to_string(),
        }
    }
}
