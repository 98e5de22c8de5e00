mod app;
mod command;
mod config;
mod consts;
mod game;
mod highscores;
mod layout;
mod menu;
mod options;
mod theme;
mod util;
mod warning;
use crate::app::App;
use crate::config::Config;
use crate::highscores::HighScores;
use crate::menu::MainMenu;
use crate::util::{Globals, LoadError};
use crate::warning::Warning;
use anyhow::Context;
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
};
use lexopt::{Arg, Parser};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Command-line arguments
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    /// Configuration file to read instead of the default one
    config: Option<PathBuf>,
    /// Do not read any configuration file
    no_config: bool,
    /// File to write log messages to
    log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum CliCommand {
    Run(Arguments),
    Help,
    Version,
}

impl CliCommand {
    fn from_parser(mut parser: Parser) -> Result<CliCommand, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("no-config") => args.no_config = true,
                Arg::Long("log-file") => {
                    args.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(CliCommand::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(CliCommand::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(CliCommand::Run(args))
    }
}

const USAGE: &str = "Usage: hurdlesnake [-c|--config <path>] [--no-config] [--log-file <path>]

Snake with hurdles, story stages & a save slot, played in the terminal

Options:
  -c <path>, --config <path>
                      Read configuration from the given file
  --no-config         Do not read any configuration file
  --log-file <path>   Append log messages to the given file
  -h, --help          Display this help message and exit
  -V, --version       Show the program version and exit
";

fn main() -> ExitCode {
    match CliCommand::from_parser(Parser::from_env()) {
        Ok(CliCommand::Run(args)) => match run(args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                if e
                    .downcast_ref::<io::Error>()
                    .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe)
                {
                    return ExitCode::SUCCESS;
                }
                eprintln!("hurdlesnake: {e:#}");
                ExitCode::from(2)
            }
        },
        Ok(CliCommand::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(CliCommand::Version) => {
            println!("hurdlesnake {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("hurdlesnake: {e}");
            eprintln!("Try 'hurdlesnake --help' for usage.");
            ExitCode::from(2)
        }
    }
}

fn run(args: Arguments) -> anyhow::Result<()> {
    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }
    let config = load_config(&args)?;
    let (globals, warnings) = load_globals(config);
    let mut menu = MainMenu::new(globals);
    for w in warnings {
        menu.warn(w);
    }
    let terminal = ratatui::init();
    // Focus reports let a game pause itself when the window loses focus
    let r = execute!(io::stdout(), EnableFocusChange)
        .and_then(|()| App::new(menu).run(terminal));
    if let Err(e) = execute!(io::stdout(), DisableFocusChange) {
        log::warn!("Failed to disable focus reporting: {e}");
    }
    ratatui::restore();
    r.context("error running the game")
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("failed to open log file")?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
    log::info!("Starting hurdlesnake {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn load_config(args: &Arguments) -> anyhow::Result<Config> {
    if args.no_config {
        log::info!("Not reading any configuration file");
        return Ok(Config::default());
    }
    let (path, allow_missing) = match args.config {
        Some(ref p) => (p.clone(), false),
        None => (Config::default_path()?, true),
    };
    log::info!("Reading configuration from {}", path.display());
    Config::load(&path, allow_missing)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

/// Load the saved options & high scores.  Failures do not stop the program;
/// they are returned as warnings to show on the main menu.
fn load_globals(config: Config) -> (Globals, Vec<Warning>) {
    let mut warnings = Vec::new();
    let options = config.load_options().unwrap_or_else(|e| {
        log::warn!("Failed to load options: {e}");
        warnings.push(Warning::from(e));
        config.options
    });
    let high_scores = config
        .high_scores_file()
        .ok_or_else(|| LoadError::no_path("high scores"))
        .and_then(|path| HighScores::load(&path))
        .unwrap_or_else(|e| {
            log::warn!("Failed to load high scores: {e}");
            warnings.push(Warning::from(e));
            HighScores::default()
        });
    let globals = Globals {
        config,
        options,
        high_scores,
    };
    (globals, warnings)
}
