use crab_bank::cli::Shell;
use crab_bank::config::Config;
use crab_bank::session::Session;
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::{env, error::Error, io};

fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new().with_level(LevelFilter::Warn).env().init()?;

    log::debug!("Application started");

    let config = Config::from_args(env::args_os());
    log::debug!("Using configuration: {config:?}");

    let mut shell = Shell::new(Session::new(), config, io::stdin().lock(), io::stdout().lock());
    shell.run()?;

    log::debug!("Application finished");

    Ok(())
}
