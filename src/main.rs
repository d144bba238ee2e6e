use std::{
    fs,
    io::{self, stdin},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use triq::{
    app_dirs::AppDirs,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    session::GameSession,
    settings::{open_schulte_settings, GridSize, Preset, SchulteSettingsStore, SchulteUpdate},
    storage::{FileStorage, Storage},
    App, TICK_RATE_MS,
};

/// schulte table attention trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Find the numbers of a shuffled grid in ascending order as fast as you can. Difficulty choices are remembered between runs."
)]
pub struct Cli {
    /// difficulty preset to switch to before starting
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Preset>,

    /// custom grid size (2-10); overrides the preset
    #[clap(short = 'g', long, value_parser = parse_grid_size)]
    grid_size: Option<GridSize>,

    /// directory holding saved settings
    #[clap(long)]
    settings_dir: Option<PathBuf>,

    /// file receiving diagnostic logs
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_grid_size(s: &str) -> Result<GridSize, String> {
    let n: u32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    GridSize::new(n).map_err(|e| e.to_string())
}

fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(AppDirs::log_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let log_file = fs::File::create(&path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn build_app(cli: &Cli) -> App<FileStorage> {
    let storage = match &cli.settings_dir {
        Some(dir) => FileStorage::with_dir(dir),
        None => FileStorage::new(),
    };
    let mut settings = open_schulte_settings(storage);
    apply_overrides(cli, &mut settings);

    let session = GameSession::new(settings.settings().grid_size);
    App::new(session, settings)
}

fn apply_overrides<S: Storage>(cli: &Cli, settings: &mut SchulteSettingsStore<S>) {
    if let Some(preset) = cli.difficulty {
        settings.apply_preset(preset);
    }
    if let Some(size) = cli.grid_size {
        settings.update_setting(SchulteUpdate::GridSize(size));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_file.clone())?;
    info!("starting triq");

    let mut app = build_app(&cli);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("exiting triq");
    outcome
}

fn run<B: Backend, S: Storage>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<()> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| {
        app.set_area(f.area());
        f.render_widget(&*app, f.area());
    })?;

    while !app.should_quit {
        let event = runner.step();
        if app.handle_event(event) && !app.should_quit {
            terminal.draw(|f| {
                app.set_area(f.area());
                f.render_widget(&*app, f.area());
            })?;
        }
    }

    Ok(())
}
