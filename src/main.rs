//! Tickerview - a terminal stock quote viewer.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

use tickerview::app::App;
use tickerview::config::Config;
use tickerview::coordinator::Coordinator;
use tickerview::feed::{JsonFileFeed, MockFeed, QuoteSource};
use tickerview::graph::RendererPreference;
use tickerview::registry::ComponentRegistry;
use tickerview::renderer::chart::TerminalEnv;
use tickerview::renderer::{SharedScene, TerminalChartCapability};
use tickerview::{report, ui};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RendererArg {
    /// Probe for the terminal chart renderer, falling back to software
    Auto,
    /// Always draw with the software surface
    Software,
}

impl From<RendererArg> for RendererPreference {
    fn from(arg: RendererArg) -> Self {
        match arg {
            RendererArg::Auto => RendererPreference::Auto,
            RendererArg::Software => RendererPreference::Software,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tickerview")]
#[command(about = "A terminal stock quote viewer", long_about = None)]
struct Args {
    /// JSON snapshot file to read quotes from (mock quotes when omitted)
    #[arg(long)]
    source: Option<PathBuf>,

    /// Seconds between refreshes
    #[arg(long, default_value_t = 60)]
    refresh: u64,

    /// Prices kept per symbol for the graph
    #[arg(long, default_value_t = 120)]
    history: usize,

    /// Graph renderer
    #[arg(long, value_enum, default_value_t = RendererArg::Auto)]
    renderer: RendererArg,

    /// Seed for mock quotes
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Log level when logging is enabled (RUST_LOG takes precedence)
    #[arg(long, default_value_t = Level::DEBUG)]
    log_level: Level,

    /// Fetch once, print the quote table and exit
    #[arg(long)]
    print: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let file = File::create(log_path)
            .with_context(|| format!("cannot create log file {}", log_path.display()))?;
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(args.log_level).into())
            .from_env_lossy();
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Tickerview");
    }

    let mut source: Box<dyn QuoteSource> = match &args.source {
        Some(path) => Box::new(JsonFileFeed::new(path.clone())),
        None => Box::new(MockFeed::new(args.seed)),
    };

    if args.print {
        let snapshot = source.fetch()?;
        print!("{}", report::plain_table(&snapshot));
        return Ok(());
    }

    let mut config = Config {
        refresh_interval: Duration::from_secs(args.refresh.max(1)),
        history_capacity: args.history,
        renderer: args.renderer.into(),
        ..Config::default()
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    if let Ok(size) = crossterm::terminal::window_size() {
        config = config.with_window_pixels(size.columns, size.rows, size.width, size.height);
    }

    let scene = SharedScene::default();
    let capability = TerminalChartCapability::new(TerminalEnv::from_env(), scene.clone());
    let coordinator = Coordinator::new(
        ComponentRegistry::new(),
        Rc::new(capability),
        source,
        config,
    );

    // Run app
    let app = App::new(coordinator, scene);
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        tracing::info!("Tickerview exited");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        if app.should_quit {
            return Ok(());
        }

        app.tick(Instant::now());
        terminal.draw(|f| ui::draw(f, &mut app))?;
        app.frame();

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q'))
                | (KeyModifiers::NONE, KeyCode::Esc)
                | (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.quit(),

                (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                    app.select_previous();
                }
                (KeyModifiers::NONE, KeyCode::Down)
                | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                    app.select_next();
                }
                (KeyModifiers::NONE, KeyCode::Char('g'))
                | (KeyModifiers::NONE, KeyCode::Home) => {
                    app.select_first();
                }
                (_, KeyCode::Char('G')) | (KeyModifiers::NONE, KeyCode::End) => {
                    app.select_last();
                }

                (KeyModifiers::NONE, KeyCode::Char('r')) => app.refresh(Instant::now()),
                (_, KeyCode::Char('T')) => app.cycle_theme(),

                _ => {}
            },
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    app.click(mouse.column, mouse.row);
                }
            }
            _ => {}
        }
    }
}
