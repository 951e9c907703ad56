use std::str::FromStr;

use clap::Parser;
use log::{LevelFilter, debug};

use thread_canvas::cli::Args;

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("invalid log level: {}, using 'warn'", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!(args:?; "Parsed arguments");

    if let Err(err) = thread_canvas::run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
