//! Terminal presenter.
//!
//! Writes the transcript top to bottom: a progress marker, the speaker in
//! their role colour, then the line text growing as it is revealed. Output
//! uses `\r\n` line breaks so it renders correctly in raw mode.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use qriadrama_core::presenter::Presenter;
use qriadrama_core::style::RoleStyle;
use tracing::warn;

/// Marker printed after a fully shown line.
pub const CONTINUE_MARKER: &str = "▼";

/// Text printed when the script is over.
pub const END_TEXT: &str = "The End";

/// How much of the transcript stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPolicy {
    /// Never clear.
    #[default]
    KeepAll,
    /// Clear the screen before a line once this many lines are shown.
    Limit(usize),
}

impl From<Option<usize>> for HistoryPolicy {
    fn from(limit: Option<usize>) -> Self {
        limit.map_or(Self::KeepAll, Self::Limit)
    }
}

/// Renders a session into a terminal (or any writer).
#[derive(Debug)]
pub struct TerminalPresenter<W: Write + Send> {
    out: W,
    history: HistoryPolicy,
    lines_on_screen: usize,
    /// Bytes of the current line's text already written.
    written: usize,
    speaker_written: bool,
}

impl<W: Write + Send> TerminalPresenter<W> {
    /// Creates a presenter writing to `out`.
    #[must_use]
    pub fn new(out: W, history: HistoryPolicy) -> Self {
        Self {
            out,
            history,
            lines_on_screen: 0,
            written: 0,
            speaker_written: false,
        }
    }

    /// The underlying writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn start_line(&mut self, current: usize, total: usize) -> io::Result<()> {
        if matches!(self.history, HistoryPolicy::Limit(limit) if self.lines_on_screen >= limit) {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
            self.lines_on_screen = 0;
        }
        if self.lines_on_screen > 0 {
            queue!(self.out, Print("\r\n"))?;
        }
        queue!(
            self.out,
            SetAttribute(Attribute::Dim),
            Print(format!("[{current}/{total}] ")),
            SetAttribute(Attribute::Reset),
        )?;
        self.lines_on_screen += 1;
        self.written = 0;
        self.speaker_written = false;
        self.out.flush()
    }

    fn write_speaker(&mut self, speaker: &str, style: &RoleStyle) -> io::Result<()> {
        self.speaker_written = true;
        if speaker.is_empty() {
            return Ok(());
        }
        if let Some(rgb) = style.color() {
            queue!(
                self.out,
                SetForegroundColor(Color::Rgb {
                    r: rgb.r,
                    g: rgb.g,
                    b: rgb.b,
                })
            )?;
        }
        if style.get("font-weight") == Some("bold") {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        queue!(
            self.out,
            Print(speaker),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print(": "),
        )
    }

    fn write_revealed(
        &mut self,
        speaker: &str,
        revealed: &str,
        style: &RoleStyle,
    ) -> io::Result<()> {
        if !self.speaker_written {
            self.write_speaker(speaker, style)?;
        }
        // Revealed text only grows within a line.
        if let Some(suffix) = revealed.get(self.written..) {
            queue!(self.out, Print(suffix))?;
            self.written = revealed.len();
        }
        self.out.flush()
    }

    fn write_marker(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            Print(" "),
            SetAttribute(Attribute::Dim),
            Print(CONTINUE_MARKER),
            SetAttribute(Attribute::Reset),
        )?;
        self.out.flush()
    }

    fn write_end(&mut self) -> io::Result<()> {
        if self.lines_on_screen > 0 {
            queue!(self.out, Print("\r\n\r\n"))?;
        }
        queue!(
            self.out,
            SetAttribute(Attribute::Bold),
            Print(END_TEXT),
            SetAttribute(Attribute::Reset),
            Print("\r\n"),
        )?;
        self.out.flush()
    }

    fn report(result: io::Result<()>) {
        if let Err(error) = result {
            warn!(%error, "terminal write failed");
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn on_line_changed(&mut self, speaker: &str, revealed: &str, style: &RoleStyle) {
        Self::report(self.write_revealed(speaker, revealed, style));
    }

    fn on_line_fully_shown(&mut self) {
        Self::report(self.write_marker());
    }

    fn on_progress(&mut self, current: usize, total: usize) {
        Self::report(self.start_line(current, total));
    }

    fn on_finished(&mut self) {
        Self::report(self.write_end());
    }
}
