use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use super::input::{InputNormalizer, coalesces};
use super::{InputDriver, OutputDriver};

/// Reads crossterm events, collapsing bursts of pointer drags so a slow
/// frame never replays stale drag positions.
#[derive(Debug, Default)]
pub struct ConsoleInputDriver {
    normalizer: InputNormalizer,
    /// Event read ahead while coalescing that did not belong to the burst.
    pending: Option<Event>,
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_normalized(&mut self) -> io::Result<Event> {
        loop {
            let evt = crossterm::event::read()?;
            if let Some(normalized) = self.normalizer.normalize(evt) {
                return Ok(normalized);
            }
        }
    }
}

/// Folds every immediately available drag that supersedes `first` into it.
/// Returns the latest drag and the first event that broke the run.
fn coalesce_drags<F>(first: Event, mut next_ready: F) -> io::Result<(Event, Option<Event>)>
where
    F: FnMut() -> io::Result<Option<Event>>,
{
    let is_drag = matches!(&first, Event::Mouse(m) if matches!(m.kind, MouseEventKind::Drag(_)));
    if !is_drag {
        return Ok((first, None));
    }
    let mut latest = first;
    while let Some(next) = next_ready()? {
        if !coalesces(&latest, &next) {
            return Ok((latest, Some(next)));
        }
        latest = next;
    }
    Ok((latest, None))
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        let first = match self.pending.take() {
            Some(evt) => evt,
            None => self.next_normalized()?,
        };
        let (evt, pending) = coalesce_drags(first, || {
            if crossterm::event::poll(Duration::ZERO)? {
                self.next_normalized().map(Some)
            } else {
                Ok(None)
            }
        })?;
        self.pending = pending;
        Ok(evt)
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}

pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal.draw(f).map(|_| ())
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
