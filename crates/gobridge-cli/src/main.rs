//! gobridge CLI - Build Go programs on top of ANTLR-generated parsers.

mod build;
mod colors;
mod init;
mod progress;
mod toolchain;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gobridge_core::ProjectLayout;

#[derive(Parser)]
#[command(name = "gobridge")]
#[command(about = "Build Go programs on top of ANTLR-generated parsers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the generated module and build the binary
    Build {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Print a JSON report instead of progress output
        #[arg(long)]
        json: bool,
    },

    /// Prepare the generated module only (go mod init if needed, go mod tidy)
    Init {
        #[command(flatten)]
        layout: LayoutArgs,

        /// Print a JSON report instead of progress output
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved go executable
    Toolchain,
}

/// Project layout settings shared by `build` and `init`.
#[derive(Args)]
struct LayoutArgs {
    /// Project directory
    #[arg(default_value = ".")]
    project_dir: PathBuf,

    /// Project name, used for the binary (default: project directory name)
    #[arg(long)]
    name: Option<String>,

    /// Module name for the generated sources (default: <name>-generated)
    #[arg(long)]
    module_name: Option<String>,

    /// Generated source directory (default: build/generated-src/antlr/main)
    #[arg(long)]
    generated_dir: Option<PathBuf>,

    /// Hand-written Go source directory (default: src/main/go)
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Output directory for the binary (default: build)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl LayoutArgs {
    /// Resolve the layout. Relative overrides are taken relative to the
    /// project directory.
    fn resolve(&self) -> anyhow::Result<ProjectLayout> {
        let project_dir = std::path::absolute(&self.project_dir)?;
        let mut layout = match &self.name {
            Some(name) => ProjectLayout::with_name(&project_dir, name.as_str()),
            None => ProjectLayout::from_project_dir(&project_dir)?,
        };

        if let Some(module_name) = &self.module_name {
            layout = layout.module_name(module_name.as_str());
        }
        if let Some(dir) = &self.generated_dir {
            layout = layout.generated_root(project_dir.join(dir));
        }
        if let Some(dir) = &self.source_dir {
            layout = layout.source_root(project_dir.join(dir));
        }
        if let Some(dir) = &self.output_dir {
            layout = layout.output_dir(project_dir.join(dir));
        }

        Ok(layout)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format gobridge-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<gobridge_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Build { layout, json } => {
            build::execute(layout.resolve().map_err(format_error)?, json).map_err(format_error)?;
        }

        Commands::Init { layout, json } => {
            init::execute(layout.resolve().map_err(format_error)?, json).map_err(format_error)?;
        }

        Commands::Toolchain => toolchain::execute().map_err(format_error)?,
    }

    Ok(())
}
