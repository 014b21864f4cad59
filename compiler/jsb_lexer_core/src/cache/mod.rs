//! Ring-buffer byte cache with bounded backtracking.
//!
//! The cache sits between a raw byte source and the scanner. Every byte
//! handed out by [`ByteCache::getc`] is also written into a fixed-size ring,
//! so the scanner can return bytes with [`ByteCache::step_back`] and read
//! them again without touching the source.
//!
//! # Layout
//!
//! ```text
//! ring: [ .. retained bytes .. | .. free .. ]
//!                  ^ index (next write / replay position)
//!
//! size   = bytes physically held (grows until == capacity, then wraps)
//! behind = bytes stepped back and waiting to be replayed
//! ```
//!
//! Invariant: `behind <= size <= capacity`. Stepping back further than the
//! ring retains is an error, never a silent wrap.

use std::io::{self, Read};

use thiserror::Error;

/// Smallest ring the cache will allocate; smaller requests are clamped up.
pub const MIN_CAPACITY: usize = 128;

/// Size of the read-ahead buffer used to batch reads from the source.
const READ_AHEAD: usize = 4096;

/// Failures surfaced by the byte cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying source returned an I/O error.
    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),
    /// A caller asked to un-read more bytes than the ring retains.
    #[error("cannot step back {requested} byte(s): only {available} retained")]
    BacktrackOutOfRange { requested: usize, available: usize },
    /// A literal probe was longer than half the ring.
    #[error("lookahead of {len} bytes exceeds the cache limit of {max}")]
    LookaheadTooLong { len: usize, max: usize },
}

/// Pull buffer over a byte source with forward reads and bounded backtrack.
///
/// Exclusively owned by the thread that scans it; there is no interior
/// synchronisation.
pub struct ByteCache<R> {
    source: R,
    /// Ring of the most recently read bytes.
    ring: Box<[u8]>,
    /// Number of bytes currently held in `ring`.
    size: usize,
    /// Next write position, or next replay position while `behind > 0`.
    index: usize,
    /// Bytes stepped back and not yet re-read.
    behind: usize,
    /// Absolute offset of the next byte `getc` returns.
    charnum: u64,
    /// 1-based line of the next byte `getc` returns.
    line: u64,
    read_ahead: Box<[u8]>,
    read_pos: usize,
    read_len: usize,
    /// Set once the source reported end of input.
    exhausted: bool,
}

impl<R: Read> ByteCache<R> {
    /// Create a cache with a ring of `capacity` bytes over `source`.
    ///
    /// `capacity` is clamped to at least [`MIN_CAPACITY`].
    pub fn new(capacity: usize, source: R) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        Self {
            source,
            ring: vec![0; capacity].into_boxed_slice(),
            size: 0,
            index: 0,
            behind: 0,
            charnum: 0,
            line: 1,
            read_ahead: vec![0; READ_AHEAD].into_boxed_slice(),
            read_pos: 0,
            read_len: 0,
            exhausted: false,
        }
    }

    /// Read the next byte.
    ///
    /// Returns `Ok(None)` at end of input. End of input does not consume
    /// anything, so callers must not step back for it.
    pub fn getc(&mut self) -> Result<Option<u8>, CacheError> {
        if self.behind > 0 {
            let b = self.ring[self.index];
            self.index = (self.index + 1) % self.capacity();
            self.behind -= 1;
            self.advance_position(b);
            return Ok(Some(b));
        }

        let Some(b) = self.next_source_byte()? else {
            return Ok(None);
        };
        self.ring[self.index] = b;
        self.index = (self.index + 1) % self.capacity();
        if self.size < self.capacity() {
            self.size += 1;
        }
        self.advance_position(b);
        Ok(Some(b))
    }

    /// Return the most recently read byte to the cache.
    pub fn step_back(&mut self) -> Result<(), CacheError> {
        if self.behind >= self.size {
            return Err(CacheError::BacktrackOutOfRange {
                requested: 1,
                available: self.retained(),
            });
        }
        self.behind += 1;
        self.index = (self.index + self.capacity() - 1) % self.capacity();
        self.charnum -= 1;
        if self.ring[self.index] == b'\n' {
            self.line -= 1;
        }
        Ok(())
    }

    /// Return the last `count` bytes to the cache.
    ///
    /// Fails without moving if `count` exceeds what the ring retains.
    pub fn step_back_count(&mut self, count: usize) -> Result<(), CacheError> {
        let available = self.retained();
        if count > available {
            return Err(CacheError::BacktrackOutOfRange {
                requested: count,
                available,
            });
        }
        for _ in 0..count {
            self.step_back()?;
        }
        Ok(())
    }

    /// Probe whether the upcoming bytes equal `literal`.
    ///
    /// Returns `literal.len()` on a match and `0` otherwise. The cache
    /// position is restored in both cases; use [`skip`](Self::skip) to
    /// consume a match. Literals longer than half the ring are rejected so
    /// the restore can never outrun the backtrack guarantee.
    pub fn match_literal(&mut self, literal: &[u8]) -> Result<usize, CacheError> {
        let max = self.capacity() / 2;
        if literal.len() > max {
            return Err(CacheError::LookaheadTooLong {
                len: literal.len(),
                max,
            });
        }

        let mut consumed = 0;
        let probed = self.probe(literal, &mut consumed);
        self.step_back_count(consumed)?;
        Ok(if probed? { literal.len() } else { 0 })
    }

    /// Probe each literal in order and return the index of the first match.
    ///
    /// Order matters: list longer literals before their prefixes to get a
    /// greedy match. Empty literals never match. Position is restored.
    pub fn match_first(&mut self, literals: &[&[u8]]) -> Result<Option<usize>, CacheError> {
        for (i, literal) in literals.iter().enumerate() {
            if !literal.is_empty() && self.match_literal(literal)? == literal.len() {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }

    /// Consume `count` bytes, stopping early at end of input.
    ///
    /// Returns how many bytes were actually consumed.
    pub fn skip(&mut self, count: usize) -> Result<usize, CacheError> {
        for done in 0..count {
            if self.getc()?.is_none() {
                return Ok(done);
            }
        }
        Ok(count)
    }

    /// Absolute offset of the next byte to be read.
    pub fn charnum(&self) -> u64 {
        self.charnum
    }

    /// 1-based line number of the next byte to be read.
    pub fn line_number(&self) -> u64 {
        self.line
    }

    /// Ring capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.ring.len()
    }

    /// How many bytes can currently be stepped back.
    pub fn retained(&self) -> usize {
        self.size - self.behind
    }

    /// Bytes stepped back and awaiting replay.
    pub fn behind(&self) -> usize {
        self.behind
    }

    /// Read bytes for a probe, counting how many were consumed so the
    /// caller can restore even when the source fails mid-probe.
    fn probe(&mut self, literal: &[u8], consumed: &mut usize) -> Result<bool, CacheError> {
        for &expected in literal {
            match self.getc()? {
                Some(b) => {
                    *consumed += 1;
                    if b != expected {
                        return Ok(false);
                    }
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    fn advance_position(&mut self, b: u8) {
        self.charnum += 1;
        if b == b'\n' {
            self.line += 1;
        }
    }

    fn next_source_byte(&mut self) -> Result<Option<u8>, CacheError> {
        if self.read_pos == self.read_len {
            if self.exhausted {
                return Ok(None);
            }
            self.fill()?;
            if self.read_len == 0 {
                return Ok(None);
            }
        }
        let b = self.read_ahead[self.read_pos];
        self.read_pos += 1;
        Ok(Some(b))
    }

    /// Refill the read-ahead buffer with one batched read.
    fn fill(&mut self) -> Result<(), CacheError> {
        self.read_pos = 0;
        self.read_len = 0;
        loop {
            match self.source.read(&mut self.read_ahead) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.read_len = n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}
