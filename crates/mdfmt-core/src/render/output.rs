use std::io::{self, Write};

use crate::writers::{IndentState, QuoteState};

/// One formatting context on the writer chain
#[derive(Debug)]
enum Layer {
    Indent(IndentState),
    Quote(QuoteState),
}

impl Layer {
    fn write_to<W: Write + ?Sized>(&mut self, out: &mut W, buf: &[u8]) -> io::Result<()> {
        match self {
            Layer::Indent(state) => state.write_to(out, buf),
            Layer::Quote(state) => state.write_to(out, buf),
        }
    }
}

/// The writer chain of a render pass.
///
/// Rules push a layer when they enter a node that opens a formatting context
/// and pop it when they leave. Every write goes through all active layers,
/// innermost first, before it reaches the sink.
pub struct Output<'w> {
    sink: &'w mut dyn Write,
    layers: Vec<Layer>,
    /// Bytes accepted from rules so far
    written: usize,
}

impl<'w> Output<'w> {
    pub fn new(sink: &'w mut dyn Write) -> Self {
        Self {
            sink,
            layers: Vec::new(),
            written: 0,
        }
    }

    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_all(s.as_bytes())
    }

    /// Indent every following line by `count` copies of `unit`
    pub fn push_indent(&mut self, unit: &str, count: usize) {
        self.layers.push(Layer::Indent(IndentState::new(unit, count)));
    }

    /// Like [`push_indent`](Self::push_indent), but the current line is
    /// already in progress and is left alone
    pub fn push_continuing_indent(&mut self, unit: &str, count: usize) {
        self.layers
            .push(Layer::Indent(IndentState::continuing(unit, count)));
    }

    /// Quote every following line
    pub fn push_blockquote(&mut self) {
        self.layers.push(Layer::Quote(QuoteState::new()));
    }

    /// Remove the innermost layer
    pub fn pop_layer(&mut self) {
        self.layers.pop();
    }

    /// Number of active layers
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Bytes written through this chain, before any layer adds its prefixes
    pub fn written(&self) -> usize {
        self.written
    }
}

impl Write for Output<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write_through(&mut self.layers, &mut *self.sink, buf)?;
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

/// The part of a chain below one layer
struct Chain<'c, W: Write + ?Sized> {
    layers: &'c mut [Layer],
    sink: &'c mut W,
}

impl<W: Write + ?Sized> Write for Chain<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        write_through(&mut *self.layers, &mut *self.sink, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

fn write_through<W: Write + ?Sized>(layers: &mut [Layer], sink: &mut W, buf: &[u8]) -> io::Result<()> {
    match layers.split_last_mut() {
        None => sink.write_all(buf),
        Some((top, rest)) => top.write_to(&mut Chain { layers: rest, sink }, buf),
    }
}
