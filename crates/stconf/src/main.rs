mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::commands::Request;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a Syncthing connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "stconf", &mut std::io::stdout());
            Ok(())
        }

        // Args are checked before any credential lookup
        Command::Device(args) => {
            let request = commands::device::prepare(args)?;
            connect_and_execute(request, &cli.global).await
        }
        Command::Folder(args) => {
            let request = commands::folder::prepare(args)?;
            connect_and_execute(request, &cli.global).await
        }
    }
}

async fn connect_and_execute(request: Request, global: &GlobalOpts) -> Result<(), CliError> {
    let render = config::resolve_render(global)?;
    let connection = config::resolve_connection(global)?;
    let client = connection.client()?;

    tracing::debug!(?request, url = %client.config_url(), "executing command");
    commands::execute(request, &client, &render).await
}
