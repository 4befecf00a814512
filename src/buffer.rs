use crate::memory::{checked_allocate, checked_reallocate, AllocPolicy, Allocator};
use crate::error::Result;

pub const LINE_CHUNK: usize = 128;

pub const OK_TO_WASTE: usize = 512;

pub struct LineBuffer {
    buf: Vec<u8>,
    len: usize,
    policy: AllocPolicy,
    alloc: Box<dyn Allocator>,
}

impl LineBuffer {
    pub fn new(policy: AllocPolicy, alloc: Box<dyn Allocator>) -> Self {
        Self {
            buf: Vec::new(),
            len: 0,
            policy,
            alloc,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn policy(&self) -> AllocPolicy {
        self.policy
    }

    pub fn begin(&mut self) -> Result<()> {
        if self.buf.is_empty() {
            self.buf = checked_allocate(self.alloc.as_mut(), self.policy, LINE_CHUNK)?;
        }
        self.len = 0;
        Ok(())
    }

    pub fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        let needed = self.len + bytes.len();
        if needed > self.capacity() {
            let mut cap = self.capacity();
            while cap < needed {
                cap += LINE_CHUNK;
            }
            checked_reallocate(self.alloc.as_mut(), self.policy, &mut self.buf, cap)?;
        }
        self.buf[self.len..needed].copy_from_slice(bytes);
        self.len = needed;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        if self.len >= self.capacity() {
            checked_reallocate(self.alloc.as_mut(), self.policy, &mut self.buf, self.len + 1)?;
        }
        self.buf[self.len] = 0;

        if self.capacity() - self.len > OK_TO_WASTE {
            // A failed shrink leaves the oversized buffer in place.
            let _ = self.alloc.try_resize(&mut self.buf, self.len + 1);
        }
        Ok(())
    }

    pub fn discard(&mut self) {
        self.len = 0;
    }

    pub fn contents(&self) -> &[u8] {
        &self.buf[..=self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::tests::LimitedAllocator;
    use crate::memory::SystemAllocator;
    use crate::error::Error;

    fn system_buffer() -> LineBuffer {
        LineBuffer::new(AllocPolicy::Propagate, Box::new(SystemAllocator))
    }

    fn fill(buffer: &mut LineBuffer, n: usize) {
        buffer.begin().unwrap();
        buffer.extend(&vec![b'x'; n]).unwrap();
        buffer.finish().unwrap();
    }

    #[test]
    fn allocates_lazily() {
        let mut buffer = system_buffer();
        assert_eq!(buffer.capacity(), 0);
        buffer.begin().unwrap();
        assert_eq!(buffer.capacity(), LINE_CHUNK);
    }

    #[test]
    fn grows_in_chunk_steps() {
        let mut buffer = system_buffer();
        buffer.begin().unwrap();
        buffer.extend(&[b'a'; LINE_CHUNK - 1]).unwrap();
        assert_eq!(buffer.capacity(), LINE_CHUNK);
        buffer.extend(b"bc").unwrap();
        assert_eq!(buffer.capacity(), 2 * LINE_CHUNK);
        buffer.extend(&[b'd'; 3 * LINE_CHUNK]).unwrap();
        assert_eq!(buffer.capacity(), 5 * LINE_CHUNK);
        assert_eq!(buffer.len, 4 * LINE_CHUNK + 1);
    }

    #[test]
    fn terminator_takes_one_extra_byte_when_full() {
        let mut buffer = system_buffer();
        fill(&mut buffer, LINE_CHUNK);
        assert_eq!(buffer.capacity(), LINE_CHUNK + 1);
        assert_eq!(buffer.contents().len(), LINE_CHUNK + 1);
        assert_eq!(buffer.contents()[LINE_CHUNK], 0);

        // the next growth step starts from the odd capacity
        fill(&mut buffer, LINE_CHUNK + 2);
        assert_eq!(buffer.capacity(), 2 * LINE_CHUNK + 1);
    }

    #[test]
    fn shrinks_once_slack_exceeds_threshold() {
        let mut buffer = system_buffer();
        fill(&mut buffer, 10 * LINE_CHUNK);
        assert_eq!(buffer.capacity(), 10 * LINE_CHUNK + 1);

        // 385 bytes of slack is tolerated
        fill(&mut buffer, 7 * LINE_CHUNK);
        assert_eq!(buffer.capacity(), 10 * LINE_CHUNK + 1);

        fill(&mut buffer, 3);
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.contents(), b"xxx\0");
    }

    #[test]
    fn slack_at_threshold_is_kept() {
        let mut buffer = system_buffer();
        fill(&mut buffer, OK_TO_WASTE + 100);
        let cap = buffer.capacity();
        fill(&mut buffer, cap - OK_TO_WASTE);
        assert_eq!(buffer.capacity(), cap);
    }

    #[test]
    fn failed_shrink_keeps_buffer() {
        let mut buffer = LineBuffer::new(
            AllocPolicy::Propagate,
            Box::new(LimitedAllocator {
                limit: usize::MAX,
                refuse_shrink: true,
            }),
        );
        fill(&mut buffer, 8 * LINE_CHUNK);
        fill(&mut buffer, 2);
        assert_eq!(buffer.capacity(), 8 * LINE_CHUNK + 1);
        assert_eq!(buffer.contents(), b"xx\0");
    }

    #[test]
    fn failed_growth_is_reported() {
        let mut buffer = LineBuffer::new(
            AllocPolicy::Propagate,
            Box::new(LimitedAllocator {
                limit: 2 * LINE_CHUNK,
                refuse_shrink: false,
            }),
        );
        buffer.begin().unwrap();
        buffer.extend(&[b'a'; 2 * LINE_CHUNK]).unwrap();
        let err = buffer.extend(b"b").unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfMemory {
                requested,
                ..
            } if requested == 3 * LINE_CHUNK
        ));
        assert_eq!(buffer.len, 2 * LINE_CHUNK);
    }
}
