use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use stack_params::commands::{CheckCommand, ShowCommand, ShowFormat};
use stack_params::context::Context;
use stack_params::parameters::{ControllerConfig, StackOperation};
use stack_params::traits::{QuietOutput, RealFileSystem};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "stackparams")]
#[command(about = "Resolve and validate stack parameters before a create or update", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every parameter the operation needs has a value
    Check {
        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Show the resolved parameters
    Show {
        #[command(flatten)]
        resolve: ResolveArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Path to the stack template
    #[arg(short, long)]
    template: PathBuf,

    /// Environment name; selects params/<environment>.yml
    #[arg(short, long, env = "STACKPARAMS_ENVIRONMENT")]
    environment: String,

    /// Project root containing the params directory
    #[arg(long, env = "STACKPARAMS_PROJECT_ROOT", default_value = ".")]
    project_root: PathBuf,

    /// Answer file to use instead of params/<environment>.yml
    #[arg(short, long)]
    answer_file: Option<PathBuf>,

    /// Override a parameter (repeatable)
    #[arg(short = 'P', long = "parameter", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    parameters: Vec<(String, String)>,

    /// Keep a parameter's current stack value on update (repeatable)
    #[arg(long = "use-previous", value_name = "KEY")]
    use_previous: Vec<String>,

    /// Stack operation to validate for
    #[arg(short, long, value_enum, default_value_t = OperationArg::Create)]
    operation: OperationArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum OperationArg {
    Create,
    Update,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<OperationArg> for StackOperation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::Create => StackOperation::Create,
            OperationArg::Update => StackOperation::Update,
        }
    }
}

impl From<FormatArg> for ShowFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ShowFormat::Text,
            FormatArg::Json => ShowFormat::Json,
        }
    }
}

impl ResolveArgs {
    fn to_config(&self) -> ControllerConfig {
        let mut config = ControllerConfig::new(&self.project_root, &self.environment);
        config.answer_file = self.answer_file.clone();

        for (key, value) in &self.parameters {
            config = config.with_override(key, value);
        }

        for key in &self.use_previous {
            config = config.with_use_previous(key);
        }

        config
    }
}

/// Parse a `KEY=VALUE` override. The value may itself contain `=`.
fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;

    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", s));
    }

    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { resolve } => {
            let ctx = Context::new();
            CheckCommand::execute(
                &ctx,
                &resolve.template,
                &resolve.to_config(),
                resolve.operation.into(),
            )?;
        }
        Commands::Show { resolve, format } => {
            let format = ShowFormat::from(format);
            let ctx = match format {
                ShowFormat::Json => Context {
                    fs: Arc::new(RealFileSystem),
                    output: Arc::new(QuietOutput),
                },
                ShowFormat::Text => Context::new(),
            };
            ShowCommand::execute(
                &ctx,
                &resolve.template,
                &resolve.to_config(),
                resolve.operation.into(),
                format,
            )?;
        }
    }

    Ok(())
}
