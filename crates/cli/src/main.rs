// QuoteGrid CLI - roller-blind quote entry and pricing

mod render;
mod session;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use quotegrid_app::bus::EventBus;
use quotegrid_app::dispatcher::Dispatcher;
use quotegrid_app::events::Output;
use quotegrid_config::PriceBook;
use quotegrid_engine::calc;
use quotegrid_engine::pricing::RollerBlindStrategy;
use quotegrid_engine::quote::QuoteStore;
use quotegrid_io::snapshot::SnapshotStore;
use quotegrid_io::{csv, json};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
/// A quote was processed but at least one row failed to price.
pub const EXIT_CALC_ERROR: u8 = 3;

#[derive(Parser)]
#[command(name = "qgrid")]
#[command(about = "Roller-blind quote builder (terminal grid)")]
#[command(version)]
struct Cli {
    /// Price book TOML overriding the built-in tables
    #[arg(long, global = true)]
    pricebook: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive quote entry (default)
    #[command(after_help = "\
Commands inside the session: type 'help'. Quotes are auto-saved once a
minute; an interrupted session offers its snapshot back on the next start.")]
    Session {
        /// Directory for saved quotes and CSV exports
        #[arg(long, short = 'd')]
        save_dir: Option<PathBuf>,

        /// Disable the periodic autosave snapshot
        #[arg(long)]
        no_autosave: bool,
    },

    /// Price a saved quote file and print the totals
    #[command(after_help = "\
Examples:
  qgrid calc quote-20260823-101500.json
  qgrid calc quote.json -o priced.json
  qgrid --pricebook custom.toml calc quote.json")]
    Calc {
        /// Quote file (JSON)
        input: PathBuf,

        /// Write the priced quote back as JSON
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Export a saved quote file as CSV
    Export {
        /// Quote file (JSON)
        input: PathBuf,

        /// Output file (default: the input path with a .csv extension)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    ExitCode::from(run(cli))
}

fn run(cli: Cli) -> u8 {
    let pricebook = match load_pricebook(cli.pricebook.as_deref()) {
        Ok(book) => book,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_USAGE;
        }
    };

    match cli.command.unwrap_or(Commands::Session {
        save_dir: None,
        no_autosave: false,
    }) {
        Commands::Session {
            save_dir,
            no_autosave,
        } => cmd_session(pricebook, save_dir, no_autosave),
        Commands::Calc { input, output } => cmd_calc(&pricebook, &input, output.as_deref()),
        Commands::Export { input, output } => cmd_export(&input, output.as_deref()),
    }
}

fn load_pricebook(path: Option<&Path>) -> Result<PriceBook, String> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| format!("Could not read {}: {}", path.display(), e))?;
            PriceBook::from_toml(&content).map_err(|e| format!("{}: {}", path.display(), e))
        }
        None => Ok(PriceBook::load()),
    }
}

fn cmd_session(pricebook: PriceBook, save_dir: Option<PathBuf>, no_autosave: bool) -> u8 {
    let save_dir = save_dir.unwrap_or_else(default_save_dir);

    let store = if no_autosave {
        None
    } else {
        match SnapshotStore::open_default() {
            Ok(store) => Some(store),
            Err(e) => {
                eprintln!("Auto-save disabled: {}", e);
                None
            }
        }
    };

    let mut dispatcher = Dispatcher::new(pricebook, save_dir, store);
    let mut bus = EventBus::new();
    bus.subscribe(Box::new(|output| match output {
        Output::StateChanged(snapshot) => print!("{}", render::render(snapshot)),
        Output::Notification { message, kind } => println!("[{:?}] {}", kind, message),
        _ => {}
    }));

    let stdin = io::stdin();
    match session::run_session(&mut dispatcher, stdin.lock(), &mut bus) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            EXIT_ERROR
        }
    }
}

fn cmd_calc(pricebook: &PriceBook, input: &Path, output: Option<&Path>) -> u8 {
    let data = match json::read_quote(input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_ERROR;
        }
    };
    let mut store = QuoteStore::from_data(data);
    let strategy = RollerBlindStrategy::new();
    let failure = calc::calculate_and_sum(store.data_mut(), &strategy, pricebook.matrices());

    print!("{}", render::quote_table(store.data()));

    if let Some(path) = output {
        if let Err(e) = json::write_quote(store.data(), path) {
            eprintln!("Could not write {}: {}", path.display(), e);
            return EXIT_ERROR;
        }
    }
    match failure {
        Some(failure) => {
            eprintln!("Row {}: {}", failure.row + 1, failure.message);
            EXIT_CALC_ERROR
        }
        None => EXIT_SUCCESS,
    }
}

fn cmd_export(input: &Path, output: Option<&Path>) -> u8 {
    let data = match json::read_quote(input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_ERROR;
        }
    };
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => input.with_extension("csv"),
    };
    match csv::export(&data, &path) {
        Ok(()) => {
            println!("Exported to {}.", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Could not write {}: {}", path.display(), e);
            EXIT_ERROR
        }
    }
}

fn default_save_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotegrid")
        .join("quotes")
}
