// Terminal initialization and rendering

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{self, Attribute, Color},
    terminal::{self, ClearType},
};
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crate::error::Result;

pub struct Terminal {
    stdout: Stdout,
    width: u16,
    height: u16,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let (width, height) = terminal::size()?;

        Ok(Self { stdout, width, height })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn clear_screen(&mut self) -> Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(x, y))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn print(&mut self, text: &str) -> Result<()> {
        queue!(self.stdout, style::Print(text))?;
        Ok(())
    }

    pub fn print_colored(&mut self, text: &str, color: Color) -> Result<()> {
        queue!(
            self.stdout,
            style::SetForegroundColor(color),
            style::Print(text),
            style::ResetColor
        )?;
        Ok(())
    }

    pub fn print_highlighted(&mut self, text: &str) -> Result<()> {
        queue!(
            self.stdout,
            style::SetAttribute(Attribute::Reverse),
            style::Print(text),
            style::SetAttribute(Attribute::Reset)
        )?;
        Ok(())
    }

    pub fn print_bar(&mut self, text: &str, fg: Color, bg: Color) -> Result<()> {
        queue!(
            self.stdout,
            style::SetBackgroundColor(bg),
            style::SetForegroundColor(fg),
            style::Print(text),
            style::ResetColor
        )?;
        Ok(())
    }

    /// Waits up to `timeout` for the next input event.
    pub fn read_event(&self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    pub fn update_size(&mut self) -> Result<()> {
        let (width, height) = terminal::size()?;
        self.width = width;
        self.height = height;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
