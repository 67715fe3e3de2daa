//! Streaming output formatter
//!
//! Writes listing rows to stdout as they are produced and diagnostics to
//! stderr, for use with `Lister`.

use std::io::{self, Write};

use termcolor::{BufferedStandardStream, Color, ColorChoice, ColorSpec, WriteColor};

use crate::error::LsError;
use crate::tree::ListingOutput;

use super::{Line, NameStyle};

/// Prefix of every diagnostic line.
pub const DIAGNOSTIC_PREFIX: &str = "lsx";

/// Streaming output formatter - stdout rows, stderr diagnostics.
pub struct StreamingFormatter {
    stdout: BufferedStandardStream,
    use_color: bool,
}

impl StreamingFormatter {
    pub fn new(use_color: bool) -> Self {
        let choice = if use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: BufferedStandardStream::stdout(choice),
            use_color,
        }
    }

    fn name_color(style: NameStyle) -> Option<ColorSpec> {
        let mut spec = ColorSpec::new();
        match style {
            NameStyle::Plain => return None,
            NameStyle::Directory => spec.set_fg(Some(Color::Blue)).set_bold(true),
            NameStyle::Symlink => spec.set_fg(Some(Color::Cyan)),
            NameStyle::Executable => spec.set_fg(Some(Color::Green)),
            NameStyle::Special => spec.set_fg(Some(Color::Yellow)),
        };
        Some(spec)
    }
}

impl ListingOutput for StreamingFormatter {
    fn entry(&mut self, line: &Line) -> io::Result<()> {
        self.stdout.write_all(line.head.as_bytes())?;
        match Self::name_color(line.style).filter(|_| self.use_color) {
            Some(spec) => {
                self.stdout.set_color(&spec)?;
                self.stdout.write_all(&line.name)?;
                self.stdout.reset()?;
            }
            None => self.stdout.write_all(&line.name)?,
        }
        self.stdout.write_all(&line.tail)?;
        self.stdout.write_all(b"\n")
    }

    fn header(&mut self, path: &[u8]) -> io::Result<()> {
        self.stdout.write_all(path)?;
        self.stdout.write_all(b":\n")
    }

    fn total(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.stdout, "{}", text)
    }

    fn blank(&mut self) -> io::Result<()> {
        writeln!(self.stdout)
    }

    fn warn(&mut self, err: &LsError) -> io::Result<()> {
        // keep rows that precede the warning ahead of it
        self.stdout.flush()?;
        eprintln!("{}: {}", DIAGNOSTIC_PREFIX, err);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

/// Report a diagnostic that is not tied to a listing, e.g. a bad
/// environment value.
pub fn report(subject: &str, detail: &str) {
    eprintln!("{}: {}: {}", DIAGNOSTIC_PREFIX, subject, detail);
}
