//! The indicator grid.
//!
//! Every registered position is drawn as a bordered cell showing its label
//! and state. Link columns run left to right; the topology block sits where
//! the layout puts it.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{StateIndex, HUB, OUT_OF_RANGE};
use crate::deck::{Position, TopologyLayout, EVENTS_ROW, LATENCY_ROW, RATE_ROW, STATUS_ROW};
use crate::ui::Tone;

/// What an indicator at a given position displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Status,
    Events,
    Latency,
    Rate,
    Hub,
    Leaf(usize),
    /// A registered position no dispatcher write targets.
    Unused,
}

impl IndicatorKind {
    pub fn at(layout: TopologyLayout, position: Position) -> Self {
        if layout.contains(position) {
            return match (0..4).find(|&node| layout.position(node) == Some(position)) {
                Some(HUB) => IndicatorKind::Hub,
                Some(node) => IndicatorKind::Leaf(node),
                None => IndicatorKind::Unused,
            };
        }
        match position.row {
            STATUS_ROW => IndicatorKind::Status,
            EVENTS_ROW => IndicatorKind::Events,
            LATENCY_ROW => IndicatorKind::Latency,
            RATE_ROW => IndicatorKind::Rate,
            _ => IndicatorKind::Unused,
        }
    }

    fn title(self) -> String {
        match self {
            IndicatorKind::Status => "status".to_string(),
            IndicatorKind::Events => "events".to_string(),
            IndicatorKind::Latency => "latency".to_string(),
            IndicatorKind::Rate => "pps".to_string(),
            IndicatorKind::Hub => "hub".to_string(),
            IndicatorKind::Leaf(node) => format!("leaf {}", node),
            IndicatorKind::Unused => String::new(),
        }
    }
}

/// Tone for `state` on an indicator of `kind`.
///
/// Latency bands split into thirds of the table: low is good, high is
/// critical.
pub fn tone(kind: IndicatorKind, state: StateIndex, latency_bands: usize) -> Tone {
    match kind {
        IndicatorKind::Status => match state {
            1 => Tone::Good,
            2 => Tone::Critical,
            _ => Tone::Idle,
        },
        IndicatorKind::Latency => match state {
            OUT_OF_RANGE => Tone::Critical,
            s if s <= 0 => Tone::Idle,
            s => {
                let scaled = s as usize * 3;
                if scaled <= latency_bands {
                    Tone::Good
                } else if scaled <= latency_bands * 2 {
                    Tone::Warning
                } else {
                    Tone::Critical
                }
            }
        },
        IndicatorKind::Rate => match state {
            OUT_OF_RANGE => Tone::Warning,
            s if s <= 0 => Tone::Idle,
            _ => Tone::Good,
        },
        IndicatorKind::Hub | IndicatorKind::Leaf(_) => {
            if state > 0 {
                Tone::Good
            } else {
                Tone::Idle
            }
        }
        IndicatorKind::Events | IndicatorKind::Unused => Tone::Idle,
    }
}

/// Number of grid columns needed to show every registered indicator.
pub fn column_count(app: &App) -> u16 {
    app.positions().iter().map(|p| p.column + 1).max().unwrap_or(0)
}

/// Render every registered indicator into `area`.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let positions = app.positions();
    let columns = column_count(app);
    if columns == 0 {
        let empty = Paragraph::new(" No indicators registered")
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(empty, area);
        return;
    }
    let rows = positions.iter().map(|p| p.row + 1).max().unwrap_or(1);

    let column_areas = Layout::horizontal(
        (0..columns).map(|_| Constraint::Ratio(1, u32::from(columns))),
    )
    .split(area);

    for (column, column_area) in (0..columns).zip(column_areas.iter()) {
        let cell_areas =
            Layout::vertical((0..rows).map(|_| Constraint::Ratio(1, u32::from(rows))))
                .split(*column_area);
        for (row, cell_area) in (0..rows).zip(cell_areas.iter()) {
            render_cell(frame, app, Position::new(column, row), *cell_area);
        }
    }
}

fn render_cell(frame: &mut Frame, app: &App, position: Position, area: Rect) {
    let Some(indicator) = app.indicator(position.column, position.row) else {
        return;
    };

    let layout = app.layout();
    let kind = IndicatorKind::at(layout, position);
    let bands = app.dispatcher().latency_table().len();
    let style = app.theme.tone_style(tone(kind, indicator.state, bands));

    let title = match kind {
        IndicatorKind::Status => app
            .link_name(position.column)
            .map(str::to_string)
            .unwrap_or_else(|| format!("link {}", position.column + 1)),
        other => other.title(),
    };

    let selected = layout.has_link_columns()
        && !layout.contains(position)
        && position.column == app.selected_column;
    let border_style = if selected {
        Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD)
    } else {
        style
    };

    let state_text = if indicator.state == OUT_OF_RANGE {
        "out of range".to_string()
    } else {
        format!("state {}", indicator.state)
    };

    let lines = vec![
        Line::from(Span::styled(
            indicator.label.clone(),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(state_text, Style::default().add_modifier(Modifier::DIM))),
    ];

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_at_standard_layout() {
        let layout = TopologyLayout::Standard;
        assert_eq!(IndicatorKind::at(layout, Position::new(0, 0)), IndicatorKind::Status);
        assert_eq!(IndicatorKind::at(layout, Position::new(3, 3)), IndicatorKind::Rate);
        assert_eq!(IndicatorKind::at(layout, Position::new(4, 2)), IndicatorKind::Hub);
        assert_eq!(IndicatorKind::at(layout, Position::new(4, 3)), IndicatorKind::Leaf(3));
        assert_eq!(IndicatorKind::at(layout, Position::new(4, 0)), IndicatorKind::Status);
        assert_eq!(IndicatorKind::at(layout, Position::new(0, 5)), IndicatorKind::Unused);
    }

    #[test]
    fn test_kind_at_mini_layout() {
        let layout = TopologyLayout::Mini;
        assert_eq!(IndicatorKind::at(layout, Position::new(0, 0)), IndicatorKind::Hub);
        assert_eq!(IndicatorKind::at(layout, Position::new(1, 1)), IndicatorKind::Leaf(2));
    }

    #[test]
    fn test_latency_tone_thirds() {
        let kind = IndicatorKind::Latency;
        assert_eq!(tone(kind, 0, 25), Tone::Idle);
        assert_eq!(tone(kind, 8, 25), Tone::Good);
        assert_eq!(tone(kind, 9, 25), Tone::Warning);
        assert_eq!(tone(kind, 16, 25), Tone::Warning);
        assert_eq!(tone(kind, 17, 25), Tone::Critical);
        assert_eq!(tone(kind, OUT_OF_RANGE, 25), Tone::Critical);
    }

    #[test]
    fn test_status_and_topology_tones() {
        assert_eq!(tone(IndicatorKind::Status, 1, 25), Tone::Good);
        assert_eq!(tone(IndicatorKind::Status, 2, 25), Tone::Critical);
        assert_eq!(tone(IndicatorKind::Status, 0, 25), Tone::Idle);
        assert_eq!(tone(IndicatorKind::Rate, OUT_OF_RANGE, 25), Tone::Warning);
        assert_eq!(tone(IndicatorKind::Leaf(1), 12, 25), Tone::Good);
        assert_eq!(tone(IndicatorKind::Hub, 0, 25), Tone::Idle);
    }
}
