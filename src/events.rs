use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;

/// Where the `e` key writes the board.
pub const EXPORT_PATH: &str = "linkdeck_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Any key closes the help overlay
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        KeyCode::Char('s') | KeyCode::Char(' ') => app.toggle_fetching(),

        KeyCode::Char('c') => app.reset_counter(),

        KeyCode::Left | KeyCode::Char('h') => app.select_prev_column(),
        KeyCode::Right | KeyCode::Char('l') => app.select_next_column(),

        KeyCode::Char(c @ '1'..='4') => {
            // Digit keys address columns 1-based
            let column = c as u16 - '1' as u16;
            app.selected_column = column.min(app.columns.saturating_sub(1));
            app.drop_link(column);
        }
        KeyCode::Char('d') => app.drop_selected_link(),

        KeyCode::Char('r') => {
            app.reload_data();
        }

        KeyCode::Char('?') => app.toggle_help(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_PATH);
            match app.export_board(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events
///
/// `column_width` is the on-screen width of one grid column and
/// `content_start_row` the first terminal row of the grid.
pub fn handle_mouse_event(
    app: &mut App,
    mouse: MouseEvent,
    column_width: u16,
    content_start_row: u16,
) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev_column(),
        MouseEventKind::ScrollDown => app.select_next_column(),
        MouseEventKind::Down(MouseButton::Left) => {
            if mouse.row >= content_start_row && column_width > 0 {
                let column = mouse.column / column_width;
                if column < app.columns {
                    app.selected_column = column;
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlMessage, ControlSender};
    use crate::settings::Settings;
    use crate::source::ChannelSource;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn test_app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        App::new(Box::new(source), &Settings::default())
    }

    #[test]
    fn test_quit_and_help() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);

        // The key that closes help does nothing else
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        assert!(app.running);

        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn test_start_stop() {
        let mut app = test_app();
        handle_key_event(&mut app, key(KeyCode::Char('s')));
        assert!(app.fetching);
        handle_key_event(&mut app, key(KeyCode::Char('s')));
        assert!(!app.fetching);
    }

    #[test]
    fn test_digit_drops_link() {
        let (control, mut rx) = ControlSender::channel();
        let mut app = test_app().with_control(control);

        handle_key_event(&mut app, key(KeyCode::Char('2')));
        assert_eq!(app.selected_column, 1);
        assert_eq!(rx.try_recv().unwrap(), ControlMessage::DropLink { column: 1 });

        handle_key_event(&mut app, key(KeyCode::Right));
        handle_key_event(&mut app, key(KeyCode::Char('d')));
        assert_eq!(rx.try_recv().unwrap(), ControlMessage::DropLink { column: 2 });
    }

    #[test]
    fn test_mouse_selects_column() {
        let mut app = test_app();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 25,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click, 10, 1);
        assert_eq!(app.selected_column, 2);
    }
}
