use crate::buffer::LineBuffer;
use crate::error::Result;
use crate::memory::{AllocPolicy, Allocator, SystemAllocator};
use std::io::{self, BufRead, BufReader, Read};
use std::ops::Deref;

pub struct LineReader<R> {
    inner: R,
    buffer: LineBuffer,
    lines_read: u64,
    // an error cut the previous line short; skip its remainder first
    resync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    // line bytes plus the trailing `0` terminator
    raw: &'a [u8],
}

impl<'a> Line<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.raw[..self.len()]
    }

    pub fn with_terminator(&self) -> &'a [u8] {
        self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len() - 1
    }

    // undercounts by one when the line has no trailing newline
    pub fn legacy_len(&self) -> usize {
        self.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ends_with_newline(&self) -> bool {
        self.as_bytes().last() == Some(&b'\n')
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl Deref for Line<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self::builder(inner).build()
    }

    pub fn builder(inner: R) -> LineReaderBuilder<R> {
        LineReaderBuilder {
            inner,
            policy: AllocPolicy::default(),
            alloc: None,
        }
    }

    // After an I/O or allocation error in the middle of a line, the next call
    // drops the rest of that line and starts at the one after it.
    pub fn read_line(&mut self) -> Result<Option<Line<'_>>> {
        if self.resync {
            self.skip_line()?;
            self.resync = false;
        }
        self.buffer.begin()?;

        loop {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.abandon_line();
                    return Err(e.into());
                }
            };
            if available.is_empty() {
                break;
            }

            let (chunk, complete) = match available.iter().position(|&b| b == b'\n') {
                Some(idx) => (&available[..=idx], true),
                None => (available, false),
            };
            let used = chunk.len();
            if let Err(e) = self.buffer.extend(chunk) {
                self.abandon_line();
                return Err(e);
            }
            self.inner.consume(used);

            if complete {
                break;
            }
        }

        if self.buffer.is_empty() {
            return Ok(None);
        }

        self.buffer.finish()?;
        self.lines_read += 1;
        Ok(Some(Line {
            raw: self.buffer.contents(),
        }))
    }

    fn skip_line(&mut self) -> Result<()> {
        loop {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if available.is_empty() {
                return Ok(());
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(idx) => {
                    self.inner.consume(idx + 1);
                    return Ok(());
                }
                None => {
                    let used = available.len();
                    self.inner.consume(used);
                }
            }
        }
    }

    fn abandon_line(&mut self) {
        // nothing consumed yet means a retry can still read the whole line
        self.resync = !self.buffer.is_empty();
        self.buffer.discard();
    }

    pub fn fgetln(&mut self, length: &mut usize) -> Result<Option<&[u8]>> {
        match self.read_line()? {
            Some(line) => {
                *length = line.legacy_len();
                Ok(Some(line.as_bytes()))
            }
            None => Ok(None),
        }
    }
}

impl<R: Read> LineReader<BufReader<R>> {
    pub fn from_read(inner: R) -> Self {
        Self::new(BufReader::new(inner))
    }
}

impl<R> LineReader<R> {
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn alloc_policy(&self) -> AllocPolicy {
        self.buffer.policy()
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[must_use]
pub struct LineReaderBuilder<R> {
    inner: R,
    policy: AllocPolicy,
    alloc: Option<Box<dyn Allocator>>,
}

impl<R: BufRead> LineReaderBuilder<R> {
    pub fn alloc_policy(mut self, policy: AllocPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn allocator(mut self, alloc: Box<dyn Allocator>) -> Self {
        self.alloc = Some(alloc);
        self
    }

    pub fn build(self) -> LineReader<R> {
        let alloc = self.alloc.unwrap_or_else(|| Box::new(SystemAllocator));
        LineReader {
            inner: self.inner,
            buffer: LineBuffer::new(self.policy, alloc),
            lines_read: 0,
            resync: false,
        }
    }
}
