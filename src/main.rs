use tracing::{error, info};

mod clock;
mod composer;
mod config;
mod controller;
mod error;
mod letter;
mod logging;
mod repository;
mod session;
mod stats;
mod store;
mod ui;

use clock::{Clock, SystemClock};
use config::Config;
use controller::Controller;
use store::{FileStore, SessionStore};
use ui::App;

const USAGE: &str = "\
Usage: nightly [--stats | --help]

  (no flags)  write tonight's letter or read letters
  --stats     show a summary of your journal
  --help      show this message";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Journal,
    Stats,
    Help,
    Unknown(String),
}

fn parse_args(args: &[String]) -> Command {
    match args.get(1).map(String::as_str) {
        None => Command::Journal,
        Some("--help" | "-h") => Command::Help,
        Some("--stats") => Command::Stats,
        Some(other) => Command::Unknown(other.to_string()),
    }
}

fn main() -> error::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Settled before logging or config touch the disk.
    let command = parse_args(&args);
    match &command {
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Command::Unknown(arg) => {
            eprintln!("unknown argument: {}\n\n{}", arg, USAGE);
            std::process::exit(2);
        }
        Command::Journal | Command::Stats => {}
    }

    let _log_guard = logging::init();
    let config = Config::load();
    let store = FileStore::new(config.session_path());

    if command == Command::Stats {
        let summary = stats::Summary::from_session(&store.load(), SystemClock.today());
        stats::show_stats(summary.as_ref())?;
        return Ok(());
    }

    info!(data_dir = %config.data_dir, "starting");
    let controller = Controller::new(store, SystemClock, config.location.clone());
    let mut app = App::new(controller, config)?;

    app.run().map_err(|e| {
        error!(error = %e, "journal exited with an error");
        e
    })
}
