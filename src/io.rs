//! I/O wrappers for tracking data transfer.
//!
//! [`TickingReader`] and [`TickingWriter`] wrap any [`std::io::Read`] or
//! [`std::io::Write`] and advance a [`Tracker`] by the number of bytes each successful
//! call moved. Create the tracker with the byte count as its total, and the rendered
//! rate reads as bytes per second.

use std::io::{self, Read, Write};

use crate::Tracker;

/// A wrapper around [`Read`] that advances a [`Tracker`] by the bytes read.
pub struct TickingReader<R> {
    inner: R,
    tracker: Tracker,
}

impl<R> TickingReader<R> {
    /// Creates a new `TickingReader` wrapping `inner`.
    pub const fn new(inner: R, tracker: Tracker) -> Self {
        Self { inner, tracker }
    }

    /// Unwraps the reader, dropping this handle to the tracker.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for TickingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.tracker.advance_by(n as u64);
        }
        Ok(n)
    }
}

/// A wrapper around [`Write`] that advances a [`Tracker`] by the bytes written.
pub struct TickingWriter<W> {
    inner: W,
    tracker: Tracker,
}

impl<W> TickingWriter<W> {
    /// Creates a new `TickingWriter` wrapping `inner`.
    pub const fn new(inner: W, tracker: Tracker) -> Self {
        Self { inner, tracker }
    }

    /// Unwraps the writer, dropping this handle to the tracker.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for TickingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        if n > 0 {
            self.tracker.advance_by(n as u64);
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
