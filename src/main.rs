#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use crate::command::check;
use argh::FromArgs;
use mvc_auth::configuration::Configuration;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

mod command;

fn set_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[derive(FromArgs, PartialEq, Debug)]
/// Build and check HTTP authentication adapters from configuration
struct GlobalArguments {
    #[argh(option, short = 'c', default = "String::from(\"config.toml\")")]
    /// the path to the configuration file, defaults to `config.toml`
    config: String,

    #[argh(subcommand)]
    subcommand: SubCommand,
}

#[derive(FromArgs, PartialEq, Debug)]
#[argh(subcommand)]
enum SubCommand {
    Check(check::Options),
}

fn main() -> Result<(), command::Error> {
    let cli_args: GlobalArguments = argh::from_env();
    set_tracing();

    let config = Configuration::load(&cli_args.config)?;

    match cli_args.subcommand {
        SubCommand::Check(_) => check::Command::new(config).run(),
    }
}
