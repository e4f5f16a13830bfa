//! csinv - command-line inventory for Apache CloudStack

use clap::Parser;
use csinv::{api, commands, config::Config};
use std::path::PathBuf;
use std::process;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Command-line inventory for Apache CloudStack
#[derive(Parser, Debug)]
#[command(name = "csinv", version, about, long_about = None)]
struct Args {
    /// Path to an alternate configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Command to run, followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{:#}", e);
                process::exit(1);
            }
        },
        None => Config::load(),
    };

    let Some((name, rest)) = args.command.split_first() else {
        print_command_list();
        return;
    };

    let Some(command) = commands::resolve(name) else {
        print_command_list();
        eprintln!("command \"{}\" not found", name);
        process::exit(2);
    };

    let client = match api::CloudStackClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    let ctx = commands::CommandContext {
        client: &client,
        args: rest,
    };
    if let Err(e) = command.run(&ctx).await {
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }
}

fn print_command_list() {
    eprintln!("Available commands:");
    for name in commands::command_names() {
        eprintln!(" {}", name);
    }
}

/// Default to WARN so empty-listing diagnostics show up without any
/// configuration; -v flags and CSINV_LOG raise verbosity.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("CSINV_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
