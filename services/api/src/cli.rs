use crate::demo::{run_deadline_check, run_demo, DeadlineCheckArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use interntrack::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "InternTrack",
    about = "Run the InternTrack internship tracking service from the command line",
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
    /// Classify a deadline's proximity the way the catalog displays it
    Deadline {
        #[command(subcommand)]
        command: DeadlineCommand,
    },
    /// Run an end-to-end CLI demo covering listings, tracking, and the sweep
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum DeadlineCommand {
    /// Report days remaining and the proximity level for one deadline
    Check(DeadlineCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Deadline {
            command: DeadlineCommand::Check(args),
        } => run_deadline_check(args),
        Command::Demo(args) => run_demo(args),
    }
}
