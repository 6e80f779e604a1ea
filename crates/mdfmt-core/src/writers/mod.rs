//! Line-oriented stream writers
//!
//! Each writer wraps another [`Write`] and rewrites the bytes passing
//! through it without buffering the document. They compose: a blockquote
//! inside a list item is a [`BlockquoteWriter`] feeding an [`IndentWriter`].
//!
//! Every writer reports the number of *input* bytes consumed, which is always
//! the full buffer on success, and returns the first error of its sink
//! unchanged.

mod blockquote;
mod indent;
mod trim;

pub use blockquote::BlockquoteWriter;
pub use indent::IndentWriter;
pub use trim::{TrimLeftWriter, TrimRightWriter, TrimWriter};

pub(crate) use blockquote::QuoteState;
pub(crate) use indent::IndentState;

use std::io::{self, Write};

/// String and single-byte write primitives on top of [`Write::write`].
///
/// All three calls go through the same `write` path, so a writer behaves the
/// same no matter how its input is delivered.
pub trait WriteExt: Write {
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.write_all(s.as_bytes())?;
        Ok(s.len())
    }

    fn write_byte(&mut self, b: u8) -> io::Result<()> {
        self.write_all(&[b])
    }
}

impl<W: Write + ?Sized> WriteExt for W {}

/// Split `buf` into lines, each keeping its trailing `\n`
fn lines(buf: &[u8]) -> impl Iterator<Item = &[u8]> {
    buf.split_inclusive(|&b| b == b'\n')
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::WriteExt;
    use std::io::Write;

    /// The ways a test string is delivered to a writer
    #[derive(Debug, Clone, Copy)]
    pub enum Mode {
        Write,
        WriteStr,
        WriteByte,
        Chunks(usize),
        Mixed,
    }

    pub const MODES: [Mode; 7] = [
        Mode::Write,
        Mode::WriteStr,
        Mode::WriteByte,
        Mode::Chunks(2),
        Mode::Chunks(3),
        Mode::Chunks(7),
        Mode::Mixed,
    ];

    /// Deliver `input` to `w` and return the byte count it reported
    pub fn feed<W: Write>(w: &mut W, input: &str, mode: Mode) -> usize {
        let bytes = input.as_bytes();
        match mode {
            Mode::Write => w.write(bytes).unwrap(),
            Mode::WriteStr => w.write_str(input).unwrap(),
            Mode::WriteByte => {
                for &b in bytes {
                    w.write_byte(b).unwrap();
                }
                bytes.len()
            }
            Mode::Chunks(n) => bytes.chunks(n).map(|c| w.write(c).unwrap()).sum(),
            Mode::Mixed => {
                let mut size = 0;
                for (i, chunk) in bytes.chunks(3).enumerate() {
                    size += match i % 3 {
                        0 => w.write(chunk).unwrap(),
                        1 => {
                            for &b in chunk {
                                w.write_byte(b).unwrap();
                            }
                            chunk.len()
                        }
                        _ => match std::str::from_utf8(chunk) {
                            Ok(s) => w.write_str(s).unwrap(),
                            Err(_) => w.write(chunk).unwrap(),
                        },
                    };
                }
                size
            }
        }
    }
}
