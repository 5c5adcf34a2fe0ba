use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use event_gallery::ingest::{self, DEFAULT_PREFIX, IngestEvent, NewEvent, PhotoSource};
use event_gallery::store::GalleryStore;
use event_gallery::{check, config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Sender};

#[derive(Parser)]
#[command(name = "event-gallery")]
#[command(about = "Manage events and photos for a static photo gallery")]
#[command(long_about = "\
Manage events and photos for a static photo gallery

The gallery root holds an event index, one photo list per event, and the
normalized photos themselves:

  <root>/
  ├── config.toml          # Optional settings (see gen-config)
  ├── events.json          # [{\"id\", \"name\", \"date\", \"description\"}, ...]
  ├── 20250801-event.json  # [\"photo1.jpg\", \"photo1_1.jpg\", ...]
  └── photos/
      └── 20250801-event/  # 800x600 JPEGs, letterboxed on white

Event ids default to the date without separators plus \"-event\"
(2025-08-01 → 20250801-event). Pass --event-id for a second event on the
same date.

Supported inputs: jpg, jpeg, png, bmp, tiff (any case).

Run 'event-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Gallery root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Enable diagnostic logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new event, optionally ingesting its first photos
    #[command(name = "new_event")]
    NewEvent {
        /// Event name
        #[arg(long)]
        name: String,
        /// Event date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Event description (defaults to "<name>の写真です。")
        #[arg(long)]
        description: Option<String>,
        /// Explicit event id (defaults to one derived from the date)
        #[arg(long)]
        event_id: Option<String>,
        /// Directory of photos to add right away
        #[arg(long)]
        photos: Option<PathBuf>,
        /// Filename prefix (accepted for compatibility; names keep the source stem)
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },
    /// Normalize and add photos to an existing event
    #[command(name = "add_photos")]
    AddPhotos {
        /// Event id
        #[arg(long)]
        event: String,
        /// Directory of photos to add
        #[arg(long)]
        photos: PathBuf,
        /// Filename prefix (accepted for compatibility; names keep the source stem)
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },
    /// Report drift between events.json, photo lists, and photo files
    Check {
        /// Only check this event
        #[arg(long)]
        event: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage_exit(e),
    };

    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Unknown subcommands print usage and exit cleanly; other usage errors keep clap's status.
fn usage_exit(e: clap::Error) -> ExitCode {
    match clean_exit_text(&e) {
        Some(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        None => e.exit(),
    }
}

/// Text to print for a parse result that still exits successfully.
fn clean_exit_text(e: &clap::Error) -> Option<String> {
    match e.kind() {
        ErrorKind::InvalidSubcommand => Some(Cli::command().render_help().to_string()),
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Some(e.render().to_string()),
        _ => None,
    }
}

/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_logging(verbose: bool) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "event_gallery=debug".to_string()
        } else {
            "event_gallery=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let store = GalleryStore::new(&cli.root);
    tracing::debug!(root = %store.root().display(), "gallery root");

    match command {
        Command::NewEvent {
            name,
            date,
            description,
            event_id,
            photos,
            prefix,
        } => {
            let config = config::load_config(&cli.root)?;
            let request = NewEvent {
                name,
                date,
                description,
                event_id,
                photos: photos.map(|dir| PhotoSource { dir, prefix }),
            };
            let created =
                with_progress(|tx| ingest::create_event(&store, &config, &request, Some(tx)))?;
            output::print_created_event(&created.event);
            match created.photos {
                None => {}
                Some(Ok(report)) => output::print_ingest_report(&report),
                Some(Err(e)) => {
                    eprintln!("Error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::AddPhotos {
            event,
            photos,
            prefix,
        } => {
            let config = config::load_config(&cli.root)?;
            let source = PhotoSource { dir: photos, prefix };
            let report =
                with_progress(|tx| ingest::add_photos(&store, &config, &event, &source, Some(tx)))?;
            output::print_ingest_report(&report);
        }
        Command::Check { event } => {
            let config = config::load_config(&cli.root)?;
            let report = check::check_gallery(&store, &config, event.as_deref())?;
            output::print_check_report(&report);
            if !report.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Run `f` with a progress channel drained by a printer thread.
fn with_progress<T>(f: impl FnOnce(Sender<IngestEvent>) -> T) -> T {
    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_ingest_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = f(tx);
    // The sender is gone once `f` returns, so the printer finishes.
    let _ = printer.join();
    result
}
