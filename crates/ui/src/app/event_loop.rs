use super::App;
use crate::event_handler::EventHandler;

use crossterm::event::Event;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Result;
use std::{panic, time::Duration};

/// Terminal input poll interval
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Frame interval of smooth scrolling
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Run the TUI until the user exits
///
/// Terminal input, feed revisions, fired debounced scrolls and animation
/// frames are all handled on this task, one at a time.
pub async fn run(app: &mut App) -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let backend = CrosstermBackend::new(std::io::stdout());
        if let Ok(mut terminal) = Terminal::new(backend) {
            let _ = terminal.show_cursor();
        }
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    terminal.clear()?;
    terminal.draw(|frame| app.render(frame))?;

    let mut feed_open = true;
    while !app.should_exit() {
        let animating = app.is_animating();
        let tui_poll = async {
            tokio::time::sleep(POLL_INTERVAL).await;
            EventHandler::read()
        };

        tokio::select! {
            maybe_event = tui_poll => {
                match maybe_event? {
                    Some(Event::Key(key)) => app.handle_key(key).await,
                    Some(Event::Resize(..)) => {}
                    _ => continue,
                }
            }
            changed = async {
                if feed_open { app.feed_rx.changed().await } else { std::future::pending().await }
            } => {
                match changed {
                    Ok(()) => app.handle_feed_update(),
                    Err(_) => {
                        tracing::info!("activity feed closed");
                        feed_open = false;
                        app.state_mut().set_error("conversation ended");
                    }
                }
            }
            Some(request) = app.scroll_rx.recv() => app.handle_scroll_request(request),
            _ = async {
                if animating { tokio::time::sleep(FRAME_INTERVAL).await } else { std::future::pending().await }
            } => app.tick_animation(),
        }

        terminal.draw(|frame| app.render(frame))?;
    }

    terminal.show_cursor()?;
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;

    Ok(())
}
