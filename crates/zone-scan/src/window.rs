//! The sliding input window backing one open source.
//!
//! File sources read through a fixed-size buffer; on refill, unconsumed
//! tail bytes move to the front and the rest is filled from the reader.
//! String sources wrap the caller's memory directly and are never
//! refilled. The buffer grows (doubling) only when a single lexical
//! construct occupies the entire window, which keeps arbitrarily long
//! quoted strings and escape-laden tokens parseable without a cap beyond
//! the semantic ones.

use std::io::Read;

/// Compile-time size of the sliding window for file sources.
pub const WINDOW_SIZE: usize = 4096;

enum Storage<'s> {
    Owned(Vec<u8>),
    Borrowed(&'s [u8]),
}

pub struct Window<'s> {
    storage: Storage<'s>,
    len: usize,
    base: u64,
}

impl<'s> Window<'s> {
    /// An empty owned window for a file source.
    pub fn for_file() -> Self {
        Window {
            storage: Storage::Owned(vec![0; WINDOW_SIZE]),
            len: 0,
            base: 0,
        }
    }

    /// Wrap caller-owned memory; `data()` is the whole source.
    pub fn for_text(text: &'s [u8]) -> Self {
        Window {
            len: text.len(),
            storage: Storage::Borrowed(text),
            base: 0,
        }
    }

    /// Currently valid bytes.
    pub fn data(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(buf) => &buf[..self.len],
            Storage::Borrowed(text) => text,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Absolute source offset of `data()[0]`.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Discard everything before `keep_from`, slide the tail to the
    /// front and fill the remainder from `reader`. Returns the number of
    /// bytes read; zero means the source is exhausted.
    ///
    /// Growing happens when nothing can be discarded and the buffer is
    /// already full.
    pub fn refill<R: Read>(&mut self, reader: &mut R, keep_from: usize) -> std::io::Result<usize> {
        let buf = match &mut self.storage {
            Storage::Owned(buf) => buf,
            // string sources hold all their data up front
            Storage::Borrowed(_) => return Ok(0),
        };
        debug_assert!(keep_from <= self.len);

        if keep_from > 0 {
            buf.copy_within(keep_from..self.len, 0);
            self.len -= keep_from;
            self.base += keep_from as u64;
        } else if self.len == buf.len() {
            buf.resize(buf.len() * 2, 0);
        }

        let mut total = 0;
        while self.len < buf.len() {
            let n = reader.read(&mut buf[self.len..])?;
            if n == 0 {
                break;
            }
            self.len += n;
            total += n;
        }
        Ok(total)
    }
}
