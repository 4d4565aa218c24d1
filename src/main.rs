mod blocks;
mod cli;
mod config;
mod discover;
mod model;
mod parse;

use std::process;

use log::LevelFilter;

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
