//! Line sources feeding the engine.
//!
//! The driver loop ([`crate::engine::Engine::run_source`]) is written once
//! against [`LineSource`]; the program chains three of them: command-line
//! arguments, piped stdin, then the controlling terminal.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Anything that yields lines until exhausted.
pub trait LineSource {
    /// The next line without its terminator, or `None` when exhausted.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

// ============================================================================
// ARGUMENT VECTOR
// ============================================================================

/// One line per command-line argument.
#[derive(Debug, Clone)]
pub struct ArgvSource {
    lines: std::vec::IntoIter<String>,
}

impl ArgvSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        Self {
            lines: lines.into_iter(),
        }
    }
}

impl LineSource for ArgvSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.next())
    }
}

// ============================================================================
// STREAM
// ============================================================================

/// Newline-terminated records from a reader. A final unterminated record is
/// still a line. Invalid UTF-8 is replaced rather than rejected.
pub struct StreamSource<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> StreamSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for StreamSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        if self.buf.ends_with(b"\n") {
            self.buf.pop();
            if self.buf.ends_with(b"\r") {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

// ============================================================================
// INTERACTIVE TERMINAL
// ============================================================================

/// Lines typed on the controlling terminal. Typed input is echoed in green
/// when stderr is a color terminal.
pub struct InteractiveSource {
    inner: StreamSource<BufReader<File>>,
    stderr: StandardStream,
}

impl InteractiveSource {
    pub const TTY_PATH: &'static str = "/dev/tty";

    /// Opens the controlling terminal.
    pub fn open() -> io::Result<Self> {
        let tty = File::open(Self::TTY_PATH)?;
        let choice = if atty::is(atty::Stream::Stderr) {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Ok(Self {
            inner: StreamSource::new(BufReader::new(tty)),
            stderr: StandardStream::stderr(choice),
        })
    }
}

impl LineSource for InteractiveSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let _ = self
            .stderr
            .set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = self.stderr.flush();
        let line = self.inner.next_line();
        let _ = self.stderr.reset();
        let _ = self.stderr.flush();
        line
    }
}
