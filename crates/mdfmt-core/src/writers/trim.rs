use std::io::{self, Write};

/// Set of bytes to trim
#[derive(Clone)]
struct Cutset([bool; 256]);

impl Cutset {
    fn new(chars: &str) -> Self {
        let mut set = [false; 256];
        for &b in chars.as_bytes() {
            set[usize::from(b)] = true;
        }
        Self(set)
    }

    fn contains(&self, b: u8) -> bool {
        self.0[usize::from(b)]
    }
}

impl std::fmt::Debug for Cutset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes: Vec<u8> = (0..=255u8).filter(|&b| self.contains(b)).collect();
        f.debug_tuple("Cutset")
            .field(&String::from_utf8_lossy(&bytes))
            .finish()
    }
}

/// Drops the leading run of cutset bytes from the whole stream
#[derive(Debug)]
pub struct TrimLeftWriter<W: Write> {
    inner: W,
    cutset: Cutset,
    trimming: bool,
}

impl<W: Write> TrimLeftWriter<W> {
    pub fn new(inner: W, cutset: &str) -> Self {
        Self {
            inner,
            cutset: Cutset::new(cutset),
            trimming: true,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for TrimLeftWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.trimming {
            self.inner.write_all(buf)?;
            return Ok(buf.len());
        }

        if let Some(start) = buf.iter().position(|&b| !self.cutset.contains(b)) {
            self.trimming = false;
            self.inner.write_all(&buf[start..])?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Drops the trailing run of cutset bytes from the whole stream.
///
/// Cutset bytes are held back until a byte outside the cutset arrives. Bytes
/// still held when the writer is taken apart with
/// [`into_inner`](Self::into_inner) or dropped are discarded; `flush` does
/// not release them.
#[derive(Debug)]
pub struct TrimRightWriter<W: Write> {
    inner: W,
    cutset: Cutset,
    pending: Vec<u8>,
}

impl<W: Write> TrimRightWriter<W> {
    pub fn new(inner: W, cutset: &str) -> Self {
        Self {
            inner,
            cutset: Cutset::new(cutset),
            pending: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Bytes currently held back
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// End the stream, discarding the held back tail
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for TrimRightWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match buf.iter().rposition(|&b| !self.cutset.contains(b)) {
            None => self.pending.extend_from_slice(buf),
            Some(last) => {
                if !self.pending.is_empty() {
                    self.inner.write_all(&self.pending)?;
                    self.pending.clear();
                }
                self.inner.write_all(&buf[..=last])?;
                self.pending.extend_from_slice(&buf[last + 1..]);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Trims cutset bytes from both ends of the whole stream
#[derive(Debug)]
pub struct TrimWriter<W: Write> {
    inner: TrimLeftWriter<TrimRightWriter<W>>,
}

impl<W: Write> TrimWriter<W> {
    pub fn new(inner: W, cutset: &str) -> Self {
        Self {
            inner: TrimLeftWriter::new(TrimRightWriter::new(inner, cutset), cutset),
        }
    }

    pub fn get_ref(&self) -> &W {
        self.inner.get_ref().get_ref()
    }

    /// End the stream, discarding the held back tail
    pub fn into_inner(self) -> W {
        self.inner.into_inner().into_inner()
    }
}

impl<W: Write> Write for TrimWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
