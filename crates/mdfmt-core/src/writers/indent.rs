use std::io::{self, Write};

use super::lines;

/// Line prefixing state shared by [`IndentWriter`] and the renderer's
/// writer chain
#[derive(Debug, Clone)]
pub(crate) struct IndentState {
    prefix: Vec<u8>,
    at_line_start: bool,
}

impl IndentState {
    pub(crate) fn new(unit: &str, count: usize) -> Self {
        Self {
            prefix: unit.repeat(count).into_bytes(),
            at_line_start: true,
        }
    }

    pub(crate) fn continuing(unit: &str, count: usize) -> Self {
        Self {
            at_line_start: false,
            ..Self::new(unit, count)
        }
    }

    pub(crate) fn write_to<W: Write + ?Sized>(&mut self, out: &mut W, buf: &[u8]) -> io::Result<()> {
        for line in lines(buf) {
            // blank lines stay blank
            if self.at_line_start && line[0] != b'\n' {
                out.write_all(&self.prefix)?;
            }
            out.write_all(line)?;
            self.at_line_start = line.ends_with(b"\n");
        }
        Ok(())
    }
}

/// Prefixes every non-empty line with `count` copies of an indent unit.
///
/// ```
/// use std::io::Write;
/// use mdfmt_core::writers::IndentWriter;
///
/// let mut w = IndentWriter::new(Vec::new(), "\t", 2);
/// w.write_all(b"Foo\n\nBar").unwrap();
/// assert_eq!(w.into_inner(), b"\t\tFoo\n\n\t\tBar");
/// ```
#[derive(Debug)]
pub struct IndentWriter<W: Write> {
    inner: W,
    state: IndentState,
}

impl<W: Write> IndentWriter<W> {
    pub fn new(inner: W, unit: &str, count: usize) -> Self {
        Self {
            inner,
            state: IndentState::new(unit, count),
        }
    }

    /// Create a writer whose first line is already in progress, so only the
    /// lines after the first newline are indented
    pub fn continuing(inner: W, unit: &str, count: usize) -> Self {
        Self {
            inner,
            state: IndentState::continuing(unit, count),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for IndentWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state.write_to(&mut self.inner, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
