use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{error, info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use typist::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    sentences::{SentencePack, SentenceSource},
    App,
};

/// typing speed practice in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the sentence on screen as fast and as accurately as you can. Words per minute, elapsed time and word accuracy update as you type."
)]
pub struct Cli {
    /// custom sentence to practice
    #[clap(short = 'p', long, conflicts_with_all = ["sentences_file", "generated"])]
    prompt: Option<String>,

    /// built-in sentence pack to pick from
    #[clap(short = 'l', long, value_enum)]
    pack: Option<SentencePack>,

    /// file with one practice sentence per line
    #[clap(short = 'f', long, conflicts_with = "generated")]
    sentences_file: Option<PathBuf>,

    /// practice on randomly generated sentences
    #[clap(short = 'g', long)]
    generated: bool,

    /// timer refresh interval in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// write debug output to the log file
    #[clap(short = 'v', long)]
    verbose: bool,

    /// store --pack and --tick-ms as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Config file values with command line overrides applied
    fn effective_config(&self, cfg: &Config) -> Config {
        Config {
            pack: self
                .pack
                .map(|pack| pack.to_string())
                .unwrap_or_else(|| cfg.pack.clone()),
            tick_rate_ms: self.tick_ms.unwrap_or(cfg.tick_rate_ms),
        }
    }

    fn sentence_source(&self, cfg: &Config) -> typist::Result<SentenceSource> {
        if let Some(ref prompt) = self.prompt {
            SentenceSource::from_prompt(prompt)
        } else if let Some(ref path) = self.sentences_file {
            SentenceSource::from_file(path)
        } else if self.generated {
            Ok(SentenceSource::Generated)
        } else {
            SentenceSource::from_pack(cfg.sentence_pack())
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = AppDirs::log_path();
    if let Err(err) = logging::init(&log_path, logging::level_for(cli.verbose)) {
        eprintln!("logging disabled, cannot open {}: {}", log_path.display(), err);
    }

    let store = FileConfigStore::new();
    let cfg = cli.effective_config(&store.load());
    if cli.save_config {
        store.save(&cfg)?;
        info!("saved config to {}", store.path().display());
    }

    let source = cli.sentence_source(&cfg)?;
    let mut app = App::new(source);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(cfg.tick_rate_ms())),
    );

    enable_raw_mode()?;

    let result = with_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;
            start_tui(&mut terminal, &mut app, &runner)
        },
        restore_terminal,
    );

    if let Err(ref err) = result {
        error!("event loop failed: {}", err);
    }
    result
}

/// Put the terminal back the way the shell expects it.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )
}

/// Run `body`, then `restore` whether or not `body` failed. The body's
/// error wins over a restore error.
fn with_restore<B, R>(body: B, restore: R) -> Result<(), Box<dyn Error>>
where
    B: FnOnce() -> Result<(), Box<dyn Error>>,
    R: FnOnce() -> io::Result<()>,
{
    let result = body();
    let restored = restore();
    result?;
    restored?;
    Ok(())
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        let Some(event) = runner.step(app.session.is_ticking()) else {
            warn!("event source disconnected");
            break;
        };

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);

        if app.handle_event(&event, area) {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
