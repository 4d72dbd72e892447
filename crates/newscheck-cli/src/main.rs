mod predict;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use newscheck_server::ServerConfig;
use newscheck_server::config::{DEFAULT_ARTIFACTS_DIR, DEFAULT_HOST, DEFAULT_PORT};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "newscheck", version, about = "Fake/real news classification service")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    // Used when no subcommand is given.
    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the model artifacts and serve predictions over HTTP.
    Serve(ServeArgs),
    /// Score one article and print the prediction as JSON.
    Predict(predict::PredictArgs),
}

#[derive(Args, Debug, Clone)]
struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "NEWSCHECK_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "NEWSCHECK_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Reject request bodies larger than this many bytes with 413. Unlimited by default.
    #[arg(long, env = "NEWSCHECK_MAX_BODY_BYTES")]
    max_body_bytes: Option<usize>,

    #[command(flatten)]
    artifacts: ArtifactsArg,
}

#[derive(Args, Debug, Clone)]
pub struct ArtifactsArg {
    /// Directory holding news_verification_model.json and tfidf_feature_extractor.json.
    ///
    /// Relative paths resolve against the working directory. Nothing ships under the
    /// default name; pass `--artifacts models/demo` for a first run from the repo root.
    #[arg(long = "artifacts", env = "NEWSCHECK_ARTIFACTS", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub dir: PathBuf,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            artifacts_dir: args.artifacts.dir,
            max_body_bytes: args.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Predict(args)) => predict::run(&args),
        Some(Command::Serve(args)) => serve(args).await,
        None => serve(cli.serve).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    tracing::info!("newscheck v{}", env!("CARGO_PKG_VERSION"));
    let config = ServerConfig::from(args);
    newscheck_server::run(&config).await
}
