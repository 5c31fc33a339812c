use crate::demo::{run_demo, run_replay, DemoArgs, ReplayArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use waitlist::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Waitlist",
    about = "Run the referral waitlist service or explore its ranking from the command line",
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
    /// Walk through a three-person referral scenario and print the queue
    Demo(DemoArgs),
    /// Replay a CSV of signups through the join workflow and print final standings
    Replay(ReplayArgs),
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
        Command::Demo(args) => run_demo(args),
        Command::Replay(args) => run_replay(args),
    }
}
