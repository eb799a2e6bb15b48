mod cmd;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::cmd::changes::{self, ChangesCommandArgs, OutputFormat};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use revsync::config::AppConfig;
use revsync::context::AppContext;
use revsync::domain::revision::UNSPECIFIED_REVISION;
use revsync::error::AppResult;
use revsync::infra::diagnostics::TracingDiagnostics;
use revsync::infra::svn::SvnCli;
use revsync::telemetry::init_tracing;

#[derive(Parser)]
#[command(
    name = "revsync",
    author,
    version,
    about = "Lists the files a deployment must sync since a Subversion revision"
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the net changed and deleted files of a project.
    Changes(ChangesArgs),
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct ChangesArgs {
    /// Project name; defaults to the last segment of the repository URL.
    #[arg(short, long)]
    project: Option<String>,

    /// Repository URL of the project, overriding the configured one.
    #[arg(long, env = "REVSYNC_SVN_URL")]
    url: Option<String>,

    /// First revision of the window; negative means the start of history.
    #[arg(long, default_value_t = UNSPECIFIED_REVISION, allow_negative_numbers = true)]
    from: i64,

    /// Last revision of the window; negative means the latest revision.
    #[arg(long, default_value_t = UNSPECIFIED_REVISION, allow_negative_numbers = true)]
    to: i64,

    /// Name of the exported project directory, used when trimming paths.
    #[arg(long)]
    export_name: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.log_json, level);

    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            Ok(())
        }
        Commands::Changes(args) => run_changes(args).await,
    }
}

async fn run_changes(args: ChangesArgs) -> AppResult<()> {
    let config = AppConfig::load()?;

    if config.username.is_some() && config.password.is_none() {
        tracing::warn!("username configured without a password; svn may refuse the connection");
    }

    let svn = Arc::new(SvnCli::new(config.svn_binary.clone()));
    let context = AppContext::new(config, svn, Arc::new(TracingDiagnostics));

    let format = args.format;
    let result = changes::run(
        &context,
        ChangesCommandArgs {
            project: args.project,
            url: args.url,
            from: args.from,
            to: args.to,
            export_name: args.export_name,
        },
    )
    .await?;

    let rendered = changes::render(&result, format)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }

    Ok(())
}
