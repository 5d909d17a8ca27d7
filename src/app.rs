//! Application state and user actions.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::control::{port_name, ControlMessage, ControlSender};
use crate::data::{CycleCounter, Snapshot, StateIndex};
use crate::deck::{
    Board, Indicator, IndicatorRegistry, KeyRegistry, Position, SnapshotDispatcher,
    TopologyLayout, LINK_ROWS,
};
use crate::settings::Settings;
use crate::source::DataSource;
use crate::ui::Theme;

/// Label a topology indicator shows before the first tree arrives.
pub const TOPOLOGY_PLACEHOLDER: &str = "X";

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    source: Box<dyn DataSource>,
    control: Option<ControlSender>,
    pub load_error: Option<String>,

    registry: KeyRegistry,
    pub board: Board,
    dispatcher: SnapshotDispatcher,
    pub counter: CycleCounter,
    /// Last snapshot applied to the board.
    pub snapshot: Option<Snapshot>,
    pub last_updated: Option<Instant>,

    /// While false, polled snapshots are discarded.
    pub fetching: bool,
    pub columns: u16,
    pub selected_column: u16,

    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

/// One indicator in an exported board.
#[derive(Debug, Serialize)]
struct ExportedIndicator<'a> {
    column: u16,
    row: u16,
    state: StateIndex,
    label: &'a str,
}

#[derive(Debug, Serialize)]
struct BoardExport<'a> {
    cycles: u64,
    layout: &'static str,
    indicators: Vec<ExportedIndicator<'a>>,
}

impl App {
    /// Create an app over `source` and register the default indicators.
    pub fn new(source: Box<dyn DataSource>, settings: &Settings) -> Self {
        let mut app = Self {
            running: true,
            show_help: false,
            source,
            control: None,
            load_error: None,
            registry: KeyRegistry::new(),
            board: Board::new(),
            dispatcher: SnapshotDispatcher::new(
                settings.latency_table.clone(),
                settings.pps_table.clone(),
                settings.layout,
            ),
            counter: CycleCounter::new(),
            snapshot: None,
            last_updated: None,
            fetching: false,
            columns: settings.columns,
            selected_column: 0,
            theme: Theme::dark(),
            status_message: None,
        };
        app.register_default_indicators();
        app
    }

    /// Route control messages (requests, link drops) through `control`.
    pub fn with_control(mut self, control: ControlSender) -> Self {
        self.control = Some(control);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn layout(&self) -> TopologyLayout {
        self.dispatcher.layout()
    }

    pub fn dispatcher(&self) -> &SnapshotDispatcher {
        &self.dispatcher
    }

    /// Register the topology block plus, when the layout shows them, every
    /// row of the configured link columns.
    pub fn register_default_indicators(&mut self) {
        let layout = self.dispatcher.layout();
        for position in layout.positions() {
            self.register_indicator(position.column, position.row, TOPOLOGY_PLACEHOLDER);
        }
        if layout.has_link_columns() {
            for column in 0..self.columns {
                for row in 0..LINK_ROWS {
                    self.register_indicator(column, row, "");
                }
            }
        }
        info!("Registered {} indicators", self.registry.len());
    }

    /// Register an indicator and put it in its initial appearance.
    ///
    /// A position that is already registered is left untouched.
    pub fn register_indicator(&mut self, column: u16, row: u16, label: &str) {
        if self.registry.resolve(column, row).is_some() {
            return;
        }
        let handle = self.registry.register(column, row);
        self.board.reset(handle, label);
    }

    pub fn unregister_indicator(&mut self, column: u16, row: u16) {
        if let Some(handle) = self.registry.unregister(column, row) {
            self.board.remove(&handle);
        }
    }

    /// What the indicator at `(column, row)` shows, if registered.
    pub fn indicator(&self, column: u16, row: u16) -> Option<&Indicator> {
        let handle = self.registry.resolve(column, row)?;
        self.board.get(&handle)
    }

    pub fn positions(&self) -> Vec<Position> {
        self.registry.positions()
    }

    /// Name of the link shown in `column` by the last snapshot.
    pub fn link_name(&self, column: u16) -> Option<&str> {
        let snapshot = self.snapshot.as_ref()?;
        snapshot
            .links
            .get(usize::from(column))
            .map(|entry| entry.name.as_str())
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// The current status message, unless it has expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_TTL => Some(msg),
            _ => None,
        }
    }

    /// Poll the source and apply any new snapshot.
    ///
    /// Returns true when a snapshot was applied. Source failures land in
    /// `load_error`.
    pub fn reload_data(&mut self) -> bool {
        let polled = self.source.poll();
        self.load_error = self.source.error().map(str::to_string);

        let Some(snapshot) = polled else {
            return false;
        };
        if !self.fetching {
            return false;
        }

        self.apply_snapshot(snapshot);
        true
    }

    /// Apply `snapshot` to the board and count the cycle.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.dispatcher.apply(&snapshot, &self.registry, &mut self.board);
        let cycle = self.counter.increment();
        debug!("Applied snapshot, cycle {}", cycle);
        self.snapshot = Some(snapshot);
        self.last_updated = Some(Instant::now());
    }

    /// Resume applying snapshots and ask the server for fresh data.
    pub fn start_fetching(&mut self) {
        if self.fetching {
            return;
        }
        self.fetching = true;
        info!("Started fetching health data");
        self.request_health_data();
    }

    pub fn stop_fetching(&mut self) {
        if !self.fetching {
            return;
        }
        self.fetching = false;
        info!("Stopped fetching health data");
    }

    pub fn toggle_fetching(&mut self) {
        if self.fetching {
            self.stop_fetching();
            self.set_status_message("Fetching paused".to_string());
        } else {
            self.start_fetching();
            self.set_status_message("Fetching started".to_string());
        }
    }

    /// Send `request_health_data` if fetching and a control channel exists.
    pub fn request_health_data(&mut self) {
        if !self.fetching {
            return;
        }
        if let Some(ref control) = self.control {
            if let Err(e) = control.send(ControlMessage::RequestHealthData) {
                warn!("Failed to request health data: {}", e);
            }
        }
    }

    /// Ask the server to drop the link shown in `column`.
    pub fn drop_link(&mut self, column: u16) {
        let Some(port) = port_name(column) else {
            self.set_status_message(format!("No link in column {}", column + 1));
            return;
        };
        let Some(ref control) = self.control else {
            self.set_status_message("Link control needs --connect".to_string());
            return;
        };

        info!("Dropping link {} (column {})", port, column);
        let message = match control.send(ControlMessage::DropLink { column }) {
            Ok(()) => format!("Dropping link {}", port),
            Err(e) => format!("Drop failed: {}", e),
        };
        self.set_status_message(message);
    }

    pub fn drop_selected_link(&mut self) {
        self.drop_link(self.selected_column);
    }

    pub fn reset_counter(&mut self) {
        self.counter.reset();
        self.set_status_message("Counter reset".to_string());
    }

    pub fn select_next_column(&mut self) {
        if self.selected_column + 1 < self.columns {
            self.selected_column += 1;
        }
    }

    pub fn select_prev_column(&mut self) {
        self.selected_column = self.selected_column.saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Write every registered indicator as JSON.
    pub fn export_board(&self, path: &Path) -> Result<()> {
        let indicators = self
            .registry
            .positions()
            .into_iter()
            .filter_map(|position| {
                let indicator = self.indicator(position.column, position.row)?;
                Some(ExportedIndicator {
                    column: position.column,
                    row: position.row,
                    state: indicator.state,
                    label: &indicator.label,
                })
            })
            .collect();

        let export = BoardExport {
            cycles: self.counter.get(),
            layout: self.dispatcher.layout().label(),
            indicators,
        };

        let json = serde_json::to_string_pretty(&export)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
