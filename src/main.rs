use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::{error, info};

use linkdeck::control::{write_control, ControlSender};
use linkdeck::deck::TopologyLayout;
use linkdeck::settings::Settings;
use linkdeck::ui::Theme;
use linkdeck::{events, logging, ui, App, DataSource, FileSource, StreamSource};

/// Poll interval for streaming sources, which deliver as fast as they arrive.
const STREAM_POLL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "linkdeck")]
#[command(about = "Indicator grid for peer-link and topology health telemetry")]
struct Args {
    /// Path to a JSON file holding the latest health message
    #[arg(short, long, default_value = "health.json", conflicts_with_all = ["connect"])]
    file: PathBuf,

    /// Connect to a health server over TCP (host:port)
    #[arg(short, long, conflicts_with_all = ["file"])]
    connect: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Topology layout: standard or mini
    #[arg(long)]
    layout: Option<TopologyLayout>,

    /// Poll interval in milliseconds (file mode)
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Resend the health data request every N milliseconds (connect mode)
    #[arg(long)]
    request_interval: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Apply the file once, export the board to JSON and exit
    #[arg(short, long, conflicts_with_all = ["connect"])]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.log_file.as_deref())?;

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(layout) = args.layout {
        settings.layout = layout;
    }
    if let Some(refresh) = args.refresh {
        settings.refresh_ms = refresh;
    }
    if let Some(interval) = args.request_interval {
        settings.request_interval_ms = Some(interval);
    }
    settings.validate()?;

    if let Some(export_path) = args.export {
        return export_to_file(&args.file, &export_path, &settings);
    }

    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, &settings);
    }

    run_with_file(&args.file, &settings)
}

fn run_with_file(path: &Path, settings: &Settings) -> Result<()> {
    info!("Reading health data from {}", path.display());
    let app = App::new(Box::new(FileSource::new(path)), settings);
    run_tui(app, settings.refresh_interval(), None)
}

/// Run against a health server: snapshots in on the read half, control
/// messages out on the write half.
fn run_with_tcp(addr: &str, settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let (source, control) = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("Failed to connect to {}", addr))?;
        println!("Connected!");
        info!("Connected to health server at {}", addr);

        let (reader, writer) = stream.into_split();
        let source = StreamSource::spawn(reader, addr);

        let (control, rx) = ControlSender::channel();
        tokio::spawn(async move {
            if let Err(e) = write_control(rx, writer).await {
                error!("Control channel stopped: {}", e);
            }
        });

        Ok::<_, anyhow::Error>((Box::new(source) as Box<dyn DataSource>, control))
    })?;

    let app = App::new(source, settings).with_control(control);
    run_tui(app, STREAM_POLL, settings.request_interval())
}

fn run_tui(app: App, refresh: Duration, request_interval: Option<Duration>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = app.with_theme(Theme::auto_detect());
    app.start_fetching();
    app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh, request_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Exiting after {} cycles", app.counter.get());
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh: Duration,
    request_interval: Option<Duration>,
) -> Result<()> {
    let mut last_refresh = Instant::now();
    let mut last_request = Instant::now();

    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(8),    // Indicator grid
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::grid::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    let width = terminal.size()?.width;
                    let columns = ui::grid::column_count(app).max(1);
                    // Grid starts below the header bar
                    events::handle_mouse_event(app, mouse, width / columns, 1);
                }
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh {
            app.reload_data();
            last_refresh = Instant::now();
        }

        if let Some(interval) = request_interval {
            if last_request.elapsed() >= interval {
                app.request_health_data();
                last_request = Instant::now();
            }
        }
    }

    Ok(())
}

/// Apply the current file once and write the resulting board.
fn export_to_file(health_path: &Path, export_path: &Path, settings: &Settings) -> Result<()> {
    let mut app = App::new(Box::new(FileSource::new(health_path)), settings);
    app.start_fetching();

    if !app.reload_data() {
        let reason = app
            .load_error
            .clone()
            .unwrap_or_else(|| "no data".to_string());
        anyhow::bail!("Failed to load {}: {}", health_path.display(), reason);
    }

    app.export_board(export_path)?;
    println!("Exported board to: {}", export_path.display());
    Ok(())
}
