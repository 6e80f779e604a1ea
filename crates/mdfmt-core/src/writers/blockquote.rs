use std::io::{self, Write};

use super::lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Nothing written yet
    Start,
    /// A `>` was written and the rest of the line is not known yet
    AfterMarker,
    InLine,
}

/// Quote marker state shared by [`BlockquoteWriter`] and the renderer's
/// writer chain
#[derive(Debug, Clone)]
pub(crate) struct QuoteState {
    position: Position,
}

impl QuoteState {
    pub(crate) fn new() -> Self {
        Self {
            position: Position::Start,
        }
    }

    pub(crate) fn write_to<W: Write + ?Sized>(&mut self, out: &mut W, buf: &[u8]) -> io::Result<()> {
        for line in lines(buf) {
            if self.position == Position::Start {
                out.write_all(b">")?;
                self.position = Position::AfterMarker;
            }
            // no trailing space on blank lines, no space between nested markers
            if self.position == Position::AfterMarker && !matches!(line[0], b'\n' | b'>') {
                out.write_all(b" ")?;
            }
            out.write_all(line)?;
            if line.ends_with(b"\n") {
                out.write_all(b">")?;
                self.position = Position::AfterMarker;
            } else {
                self.position = Position::InLine;
            }
        }
        Ok(())
    }
}

/// Prefixes every line with a blockquote marker.
///
/// Nested quotes come from stacking writers: each level adds one `>` in
/// front of the lines of the level inside it.
///
/// ```
/// use std::io::Write;
/// use mdfmt_core::writers::BlockquoteWriter;
///
/// let mut w = BlockquoteWriter::new(BlockquoteWriter::new(Vec::new()));
/// w.write_all(b"A\nB").unwrap();
/// assert_eq!(w.into_inner().into_inner(), b">> A\n>> B");
/// ```
#[derive(Debug)]
pub struct BlockquoteWriter<W: Write> {
    inner: W,
    state: QuoteState,
}

impl<W: Write> BlockquoteWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            state: QuoteState::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for BlockquoteWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state.write_to(&mut self.inner, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
