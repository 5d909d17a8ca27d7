//! Header bar, status bar and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::format::format_count;

/// Render the header: fetch state, cycle counter and link summary.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (icon_style, fetch_label) = if app.fetching {
        (Style::default().fg(app.theme.healthy), "fetching")
    } else {
        (Style::default().fg(app.theme.warning), "paused")
    };

    let mut spans = vec![
        Span::styled(" ● ", icon_style),
        Span::styled("LINKDECK ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(fetch_label, icon_style),
        Span::raw(" │ cycles "),
        Span::styled(
            format_count(app.counter.get()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(ref snapshot) = app.snapshot {
        let connected = snapshot
            .links
            .iter()
            .filter(|entry| entry.link.status.is_connected())
            .count();
        let down = snapshot.links.len() - connected;
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            connected.to_string(),
            Style::default().fg(app.theme.healthy),
        ));
        spans.push(Span::raw(" connected "));
        spans.push(if down > 0 {
            Span::styled(
                down.to_string(),
                Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        });
        spans.push(Span::raw(" other"));
    }

    spans.push(Span::raw(format!(" │ {}", app.layout().label())));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Temporary status messages take precedence, then source errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "s:start/stop ←→:column d:drop c:reset ?:help q:quit";
    let status = if let Some(ref err) = app.load_error {
        format!(" {} | Error: {} | {}", app.source_description(), err, controls)
    } else if let Some(updated) = app.last_updated {
        format!(
            " {} | Updated {:.1}s ago | {}",
            app.source_description(),
            updated.elapsed().as_secs_f64(),
            controls
        )
    } else {
        format!(" {} | Waiting for data... | {}", app.source_description(), controls)
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Telemetry"),
        Line::from("  s         Start/stop fetching"),
        Line::from("  r         Poll the source now"),
        Line::from("  c         Reset cycle counter"),
        Line::from(""),
        section(" Links"),
        Line::from("  ←/→ h/l   Select link column"),
        Line::from("  1-4       Drop link in column"),
        Line::from("  d         Drop selected link"),
        Line::from(""),
        section(" General"),
        Line::from("  e         Export board to JSON"),
        Line::from("  ?         Toggle help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 21u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
