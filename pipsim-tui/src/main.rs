//! `pipsim` — replay hourly bars in the terminal and trade them by hand.

use std::fs::{File, OpenOptions};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};

use pipsim_core::data::load_store;
use pipsim_core::persistence;
use pipsim_core::{Session, SimConfig};
use pipsim_tui::{AppState, input, ui};

#[derive(Parser)]
#[command(
    name = "pipsim",
    about = "PipSim: manual trading practice on historical hourly bars"
)]
struct Args {
    /// Path to a pipsim.toml. Defaults to ./pipsim.toml, then the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the bar data files (overrides the config).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for account, statistics and history files (overrides the config).
    #[arg(long)]
    settings_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(info);
    }));

    let args = Args::parse();
    let (mut config, config_path) =
        SimConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(dir) = args.settings_dir {
        config.settings_dir = dir;
    }

    init_logging(&config)?;
    info!(config = ?config_path, data_dir = %config.data_dir.display(), "pipsim starting");

    // Load bars and persisted state; missing bar data is fatal.
    let zoom = config.zoom_level()?;
    let bars = load_store(&config.data_dir)
        .with_context(|| format!("loading bar data from {}", config.data_dir.display()))?;
    let persisted = persistence::load(&config.settings_dir);
    let mut app = AppState::new(Session::new(bars, persisted, zoom));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);
    if let Err(err) = &result {
        error!(error = %err, "frame loop failed");
    }

    // Save state before exit, even after a loop failure
    let saved = persistence::save(&config.settings_dir, &app.session.snapshot());
    match &saved {
        Ok(()) => info!(dir = %config.settings_dir.display(), "state saved"),
        Err(err) => error!(error = %err, "saving state failed"),
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result?;
    saved.context("saving session state")?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Poll for input events (50ms timeout for ~20 FPS tick)
        let mut step = Ok(());
        if event::poll(Duration::from_millis(50))? {
            step = match event::read()? {
                Event::Key(key) => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => Ok(()),
            };
        }

        // 3. Re-evaluate the open position against the current bar
        if let Err(err) = step.and_then(|()| app.tick()) {
            app.report_failure(&err);
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

/// The terminal owns stdout, so logs go to a file in the settings directory.
fn init_logging(config: &SimConfig) -> Result<()> {
    std::fs::create_dir_all(&config.settings_dir).with_context(|| {
        format!("creating settings directory {}", config.settings_dir.display())
    })?;
    let path = config.log_path();
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
