use crate::demo::{run_demo, DemoArgs};
use crate::report::{
    run_compute, run_decision, run_renewal, run_visa, ComputeArgs, DecisionArgs, RenewalArgs,
    VisaArgs,
};
use crate::server;
use calculateur::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Calculateur",
    about = "Compute legal deadlines for residence permits, administrative decisions and visa refusals",
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
    /// Evaluate a JSON case file
    Compute(ComputeArgs),
    /// Residence permit application or renewal
    Renewal(RenewalArgs),
    /// Litigation against an administrative decision
    Decision(DecisionArgs),
    /// Visa refusal appeal chain
    Visa(VisaArgs),
    /// Walk through the reference scenarios on a pinned date
    Demo(DemoArgs),
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
        Command::Compute(args) => run_compute(args),
        Command::Renewal(args) => run_renewal(args),
        Command::Decision(args) => run_decision(args),
        Command::Visa(args) => run_visa(args),
        Command::Demo(args) => run_demo(args),
    }
}
