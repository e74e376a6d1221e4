use crate::context::Context;
use crate::parameters::{
    ControllerConfig, OverrideResolver, ParameterCollection, TemplateDocument,
};
use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;

/// Load the template's parameters and apply every override layer
pub fn resolve_parameters(
    ctx: &Context,
    template_path: &Path,
    config: &ControllerConfig,
) -> Result<ParameterCollection> {
    if !ctx.fs.exists(template_path) {
        anyhow::bail!("Template not found: {}", template_path.display());
    }

    let template = TemplateDocument::from_file(&*ctx.fs, template_path)?;

    let mut parameters = ParameterCollection::from_template(&template)
        .with_context(|| format!("Invalid parameters in {}", template_path.display()))?;

    ctx.output.dimmed(&format!(
        "Template {} declares {} parameter(s)",
        template_path.display(),
        parameters.len()
    ));

    OverrideResolver::from_context(ctx)
        .apply_overrides(config, &mut parameters)
        .context("Failed to resolve stack parameters")?;

    Ok(parameters)
}
