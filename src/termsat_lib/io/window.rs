//! A small window of stats, redrawn in place while clauses are folded.

use std::{
    fmt::Display,
    io::{stdout, Write},
};

use crossterm::{cursor, terminal, QueueableCommand};

pub struct ContextWindow {
    column: u16,
    bottom: u16,
}

#[derive(Debug, Clone, Copy)]
pub enum WindowItem {
    Clauses,
    Length,
    Peak,
    Time,
}

impl ContextWindow {
    /// Draws the labels of the window below the cursor.
    pub fn new() -> std::io::Result<Self> {
        let mut stdout = stdout();
        writeln!(stdout, "c CLAUSES")?;
        writeln!(stdout, "c LENGTH")?;
        writeln!(stdout, "c PEAK")?;
        writeln!(stdout, "c TIME")?;
        stdout.flush()?;

        let (_, bottom) = cursor::position()?;
        Ok(ContextWindow { column: 12, bottom })
    }

    fn get_offset(&self, item: WindowItem) -> (u16, u16) {
        let the_row = match item {
            WindowItem::Clauses => self.bottom.saturating_sub(4),
            WindowItem::Length => self.bottom.saturating_sub(3),
            WindowItem::Peak => self.bottom.saturating_sub(2),
            WindowItem::Time => self.bottom.saturating_sub(1),
        };
        (self.column, the_row)
    }

    pub fn update_item(&self, item: WindowItem, output: impl Display) -> std::io::Result<()> {
        let mut stdout = stdout();
        let (x, y) = self.get_offset(item);

        stdout.queue(cursor::SavePosition)?;
        stdout.queue(cursor::MoveTo(x, y))?;
        stdout.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
        write!(stdout, "{output}")?;
        stdout.queue(cursor::RestorePosition)?;
        Ok(())
    }

    pub fn flush(&self) -> std::io::Result<()> {
        stdout().flush()
    }
}
