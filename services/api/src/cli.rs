use crate::commands::{run_fuse, run_predict, FuseArgs, PredictArgs};
use crate::server;
use auticare::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "AutiCare screening service",
    about = "Run the AutiCare screening service or exercise scoring and prediction from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Fuse a questionnaire score with an optional video prediction score
    Fuse(FuseArgs),
    /// Send one video URL to the ML service and print the normalized prediction
    Predict(PredictArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override ML_SERVICE_URL for the prediction proxy
    #[arg(long)]
    pub(crate) ml_service_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Fuse(args) => run_fuse(args),
        Command::Predict(args) => run_predict(args).await,
    }
}
