use anyhow::Result;
use clap::Parser;

use flow_version::cli::{run_version_workflow, VersionWorkflowArgs};
use flow_version::config::{self, OutputFormat};
use flow_version::ui;

#[derive(clap::Parser)]
#[command(
    name = "flow-version",
    version,
    about = "Compute a semantic version from git-flow branches and tags"
)]
struct Args {
    #[arg(short, long, default_value = ".", help = "Path inside the git repository")]
    path: String,

    #[arg(short, long, help = "Branch to version instead of HEAD")]
    branch: Option<String>,

    #[arg(short, long, value_enum, help = "Output format (overrides configuration)")]
    output: Option<OutputFormat>,

    #[arg(long, help = "Print a single version variable, e.g. FullSemVer")]
    show_variable: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    let filter = if args.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let workflow_args = VersionWorkflowArgs {
        repo_path: args.path,
        branch: args.branch,
        format: args.output.unwrap_or(config.output.format),
        show_variable: args.show_variable,
    };

    if args.verbose {
        ui::display_status(&format!(
            "Computing version in '{}'",
            workflow_args.repo_path
        ));
    }

    let result = run_version_workflow(&workflow_args)?;
    log::debug!("Computed {} for '{}'", result.version, result.branch);

    println!("{}", result.output);
    Ok(())
}
