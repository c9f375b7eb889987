mod app;
mod config;
mod corpus;
mod engine;
mod event;
mod logging;
mod session;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::{Block, Widget};

use app::{App, AppScreen};
use config::Config;
use corpus::FallbackCorpus;
use engine::layout::{LayoutResult, Viewport};
use event::{AppEvent, EventSource};
use session::state::NewlinePolicy;
use ui::components::dashboard::Dashboard;
use ui::components::menu::Menu;
use ui::components::status::{ErrorScreen, MinimalScreen};
use ui::components::typing_area::TypingArea;
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "keysmash", version, about = "Terminal typing test with adaptive layout")]
struct Cli {
    #[arg(long, help = "Directory of .txt passages")]
    tests_dir: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, value_enum, help = "How Enter is scored")]
    newline_policy: Option<NewlinePolicyArg>,

    #[arg(long, help = "Seed for passage selection")]
    seed: Option<u64>,

    #[arg(short, long, help = "Config file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Log file path")]
    log_file: Option<PathBuf>,

    #[arg(long, help = "Write the effective config (file plus flags) and exit")]
    save_config: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum NewlinePolicyArg {
    Score,
    MatchReference,
}

impl From<NewlinePolicyArg> for NewlinePolicy {
    fn from(arg: NewlinePolicyArg) -> Self {
        match arg {
            NewlinePolicyArg::Score => NewlinePolicy::Score,
            NewlinePolicyArg::MatchReference => NewlinePolicy::MatchReference,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = &cli.tests_dir {
        config.tests_dir = Some(dir.to_string_lossy().into_owned());
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if let Some(policy) = cli.newline_policy {
        config.newline_policy = policy.into();
    }

    if cli.save_config {
        let path = cli.config.clone().unwrap_or_else(Config::config_path);
        config.save_to(&path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    let _log_guard = logging::init(&log_path, &config.log_level)?;
    logging::install_panic_hook();
    tracing::info!(target: "runtime", version = env!("CARGO_PKG_VERSION"), "startup");

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        tracing::warn!(target: "runtime", theme = %config.theme, "theme_not_found");
        Theme::default()
    });
    let provider = FallbackCorpus::from_config(&config, cli.seed);
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut app = App::new(config, theme, Box::new(provider));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }

    let backend = CrosstermBackend::new(stdout);
    let result = Terminal::new(backend)
        .map_err(anyhow::Error::from)
        .and_then(|mut terminal| {
            let events = EventSource::new(tick_rate);
            let run = run_app(&mut terminal, &mut app, &events);
            let _ = terminal.show_cursor();
            run
        });

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    match &result {
        Ok(()) => tracing::info!(target: "runtime", "shutdown"),
        Err(err) => {
            tracing::error!(target: "runtime", error = %err, "run_failed");
            eprintln!("Error: {err:?}");
        }
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventSource,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Resize(width, height) => {
                tracing::debug!(target: "runtime", width, height, "resize");
            }
            AppEvent::Tick => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let buf = frame.buffer_mut();

    Block::default().style(app.theme.text()).render(area, buf);

    match app.screen {
        AppScreen::Welcome => Menu::new(&app.theme).render(area, buf),
        AppScreen::Session => render_session(area, buf, app),
        AppScreen::Result => {
            if let Some(result) = &app.last_result {
                Dashboard::new(result, &app.theme).render(area, buf);
            }
        }
        AppScreen::Error => {
            let message = app.error_message.as_deref().unwrap_or("Unknown error");
            ErrorScreen::new(message, &app.theme).render(area, buf);
        }
    }
}

fn render_session(area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer, app: &App) {
    let now = Instant::now();
    let Some(layout) = app.layout(Viewport::new(area.width, area.height)) else {
        return;
    };
    let stats = app.live_stats(now);

    match layout {
        LayoutResult::Full(layout) => {
            let source = app
                .session
                .as_ref()
                .map(|state| state.source_label())
                .unwrap_or_default();
            TypingArea::new(&layout, source, &app.theme)
                .stats(stats)
                .cursor_on(app.cursor_on(now))
                .render(area, buf);
        }
        LayoutResult::Degraded(_) => {
            MinimalScreen::new(stats.map(|s| s.wpm), &app.theme).render(area, buf);
        }
    }
}
