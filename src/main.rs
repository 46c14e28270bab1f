use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::LevelFilter;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use simplelog::WriteLogger;
use tokio::sync::mpsc;

use petasync::config::{load_config, load_config_from};
use petasync::sync::api::{OrgApi, OrgStore};
use petasync::sync::http::create_http_client;
use petasync::sync::manager::run_sync_manager;
use petasync::sync::messages::SyncEvent;
use petasync::ui::{self, App};

#[derive(Parser, Debug)]
#[command(name = "petasync", version, about = "Peta jabatan & struktur organisasi di terminal")]
struct Args {
    /// Override the API base URL from the config file
    #[arg(long)]
    api_base_url: Option<String>,

    /// Alternate config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (the terminal itself is taken over by the UI)
    #[arg(long, default_value = "petasync.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    WriteLogger::init(
        LevelFilter::Info,
        simplelog::Config::default(),
        File::create(&args.log_file)
            .with_context(|| format!("Failed to create log file: {:?}", args.log_file))?,
    )
    .context("Failed to initialize logger")?;

    // Load configuration at startup
    let mut config = match &args.config {
        Some(path) => load_config_from(path).context("Failed to load configuration")?,
        None => load_config().context("Failed to load configuration")?,
    };
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }

    let client = create_http_client(config.request_timeout_secs)?;
    let store: Arc<dyn OrgStore> =
        Arc::new(OrgApi::new(client, &config.api_base_url).context("Invalid API base URL")?);

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<SyncEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_sync_manager(store, ui_tx, cmd_rx));

    let mut app = App::new(config, cmd_tx);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &mut ui_rx).await;

    // Restore the terminal even when the loop errored
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    ui_rx: &mut mpsc::UnboundedReceiver<SyncEvent>,
) -> anyhow::Result<()> {
    loop {
        // Drain everything the manager produced since the last frame.
        while let Ok(ev) = ui_rx.try_recv() {
            app.apply_event(ev);
        }
        app.tick(Instant::now());

        terminal.draw(|frame| ui::draw(frame, app))?;

        // The poll interval doubles as the debounce tick.
        if event::poll(Duration::from_millis(120))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.state.should_quit {
            return Ok(());
        }
    }
}
