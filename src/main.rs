use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use radview::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::Controller,
    deck::DeckProvider,
    images::DirImageSource,
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    ui,
};

/// timed diagnostic reading of shuffled clinical images
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Presents a shuffled series of scans, times each diagnosis, and exports a CSV report."
)]
pub struct Cli {
    /// directory the image identifiers are resolved against
    #[clap(short = 'i', long, default_value = ".")]
    images_dir: PathBuf,

    /// directory radiology_report.csv is written to
    #[clap(short = 'o', long, default_value = ".")]
    export_dir: PathBuf,

    /// optional JSON file overriding the image list and pacing
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// log file (defaults to the platform state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// log debug detail
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Config {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path).load(),
            None => Config::default(),
        }
    }

    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

fn build_app(cli: &Cli, config: &Config) -> App {
    let controller = Controller::new(DeckProvider::new(config.images.clone()), config.pacing())
        .with_export_dir(&cli.export_dir);
    App::new(controller, Box::new(DirImageSource::new(&cli.images_dir)))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    logging::initialize(&log_path, cli.log_level());

    let config = cli.load_config();
    log::info!(
        "starting with {} images, images dir {}, export dir {}",
        config.images.len(),
        cli.images_dir.display(),
        cli.export_dir.display()
    );
    let mut app = build_app(&cli, &config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(config.tick_rate()),
    );
    let outcome = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &outcome {
        log::error!("terminal loop failed: {}", e);
    }
    outcome
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<CrosstermEventSource, FixedTicker>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let redraw = match runner.step() {
            AppEvent::Tick(at) => app.on_tick(at),
            AppEvent::Resize => true,
            AppEvent::Key(key) => app.on_key(key, Instant::now()),
        };

        if app.should_quit() {
            log::info!("quit from {}", app.controller.page());
            break;
        }

        if redraw {
            terminal.draw(|f| ui::draw(app, f))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use radview::session::Page;
    use tempfile::tempdir;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["radview"]);

        assert_eq!(cli.images_dir, PathBuf::from("."));
        assert_eq!(cli.export_dir, PathBuf::from("."));
        assert_eq!(cli.config, None);
        assert_eq!(cli.log_file, None);
        assert!(!cli.verbose);
        assert_eq!(cli.log_level(), LevelFilter::Info);
    }

    #[test]
    fn test_cli_dirs() {
        let cli = Cli::parse_from(["radview", "-i", "scans", "--export-dir", "out"]);
        assert_eq!(cli.images_dir, PathBuf::from("scans"));
        assert_eq!(cli.export_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_cli_without_config_uses_defaults() {
        let cli = Cli::parse_from(["radview"]);
        assert_eq!(cli.load_config(), Config::default());
    }

    #[test]
    fn test_cli_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("radview.json");
        std::fs::write(&path, br#"{ "images": ["ct.png"], "countdown_from": 1 }"#).unwrap();

        let cli = Cli::parse_from(["radview", "-c", path.to_str().unwrap(), "-v"]);
        let config = cli.load_config();
        assert_eq!(config.images, vec!["ct.png"]);
        assert_eq!(config.countdown_from, 1);
        assert_eq!(cli.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_build_app_starts_on_landing() {
        let cli = Cli::parse_from(["radview"]);
        let app = build_app(&cli, &Config::default());
        assert_eq!(app.controller.page(), Page::Landing);
        assert_eq!(app.controller.session().deck.len(), 4);
        assert!(!app.should_quit());
    }
}
