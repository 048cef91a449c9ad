use std::{
    io::{self, stdin},
    path::PathBuf,
    sync::Arc,
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
    layout::Rect,
    Terminal,
};

use quotype::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    quote::{BuiltinQuoteProvider, FixedQuoteProvider, HttpQuoteProvider, QuoteProvider},
    runtime::{CrosstermEventSource, EventSource, FixedTicker, QuoteFetcher, Runner, Ticker},
};

/// type a random quote and see how fast you are
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a random quote as fast as you can. Each character is marked correct or incorrect as you go, with elapsed time and words per minute shown live."
)]
pub struct Cli {
    /// quote service URL returning JSON with a `content` field
    #[clap(long)]
    endpoint: Option<String>,

    /// request timeout for the quote service, in seconds
    #[clap(long)]
    timeout_secs: Option<u64>,

    /// use the built-in quote list instead of the network
    #[clap(long)]
    offline: bool,

    /// custom quote to type, repeated after each completion
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// where to write logs
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// config file to read instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Command-line values win over the config file
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(endpoint) = &self.endpoint {
            cfg.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.timeout_secs {
            cfg.timeout_secs = secs;
        }
        if self.offline {
            cfg.offline = true;
        }
        cfg
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn provider(&self, cfg: &Config) -> Result<Arc<dyn QuoteProvider>> {
        let provider: Arc<dyn QuoteProvider> = if let Some(prompt) = &self.prompt {
            Arc::new(FixedQuoteProvider::new(prompt.clone()).context("custom prompt is empty")?)
        } else if cfg.offline {
            Arc::new(BuiltinQuoteProvider::new()?)
        } else {
            Arc::new(HttpQuoteProvider::new(
                cfg.endpoint.clone(),
                cfg.request_timeout(),
            )?)
        };
        Ok(provider)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let cfg = cli.apply(cli.config_store().load_or_init());

    let log_path = cli
        .log_file
        .clone()
        .or_else(AppDirs::log_path)
        .unwrap_or_else(|| PathBuf::from("quotype.log"));
    let _log_guard = match logging::init(&log_path, cfg.log_filter.as_deref()) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    let provider = cli.provider(&cfg)?;
    tracing::info!(
        offline = cfg.offline,
        endpoint = %cfg.endpoint,
        custom_prompt = cli.prompt.is_some(),
        "starting"
    );

    enable_raw_mode()?;
    let mut terminal = or_cleanup(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        restore_terminal,
    )?;

    let events = CrosstermEventSource::new();
    let mut app = App::new(QuoteFetcher::new(provider, events.sender()));
    let mut runner = Runner::new(events, FixedTicker::default());

    let result = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "exiting with error");
    }
    result
}

/// Run `setup`; if it fails, run `cleanup` before handing back the error
fn or_cleanup<T>(setup: impl FnOnce() -> Result<T>, cleanup: impl FnOnce()) -> Result<T> {
    let result = setup();
    if result.is_err() {
        cleanup();
    }
    result
}

/// Best-effort undo of terminal setup, used when setup itself fails
fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    if let Err(err) = disable_raw_mode() {
        tracing::warn!(error = %err, "could not leave raw mode");
    }
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, T>,
) -> Result<()> {
    app.start();
    terminal.draw(|f| f.render_widget(app.controller(), f.area()))?;

    loop {
        let event = runner.step();
        let size = terminal.size()?;
        let screen = Rect::new(0, 0, size.width, size.height);

        match app.on_event(event, screen) {
            Flow::Quit => break,
            Flow::Continue { redraw: true } => {
                terminal.draw(|f| f.render_widget(app.controller(), f.area()))?;
            }
            Flow::Continue { redraw: false } => {}
        }
    }

    tracing::info!("quit");
    Ok(())
}
