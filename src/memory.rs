use crate::error::{Error, Result};

pub const OOM_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocPolicy {
    Abort,
    #[default]
    Propagate,
}

// Implementations must leave `buf` untouched when they fail.
pub trait Allocator {
    fn try_resize(
        &mut self,
        buf: &mut Vec<u8>,
        new_len: usize,
    ) -> std::result::Result<(), AllocFailed>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocFailed;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn try_resize(
        &mut self,
        buf: &mut Vec<u8>,
        new_len: usize,
    ) -> std::result::Result<(), AllocFailed> {
        if new_len > buf.len() {
            buf.try_reserve_exact(new_len - buf.len())
                .map_err(|_| AllocFailed)?;
            buf.resize(new_len, 0);
        } else {
            // fresh allocation, so `buf` survives a failed shrink
            let mut smaller = Vec::new();
            smaller
                .try_reserve_exact(new_len)
                .map_err(|_| AllocFailed)?;
            smaller.extend_from_slice(&buf[..new_len]);
            *buf = smaller;
        }
        Ok(())
    }
}

pub fn checked_allocate(
    alloc: &mut dyn Allocator,
    policy: AllocPolicy,
    len: usize,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match alloc.try_resize(&mut buf, len) {
        Ok(()) => Ok(buf),
        Err(AllocFailed) => Err(out_of_memory(policy, "allocate", len)),
    }
}

pub fn checked_reallocate(
    alloc: &mut dyn Allocator,
    policy: AllocPolicy,
    buf: &mut Vec<u8>,
    len: usize,
) -> Result<()> {
    alloc
        .try_resize(buf, len)
        .map_err(|AllocFailed| out_of_memory(policy, "reallocate", len))
}

fn out_of_memory(policy: AllocPolicy, op: &'static str, requested: usize) -> Error {
    let err = Error::OutOfMemory { op, requested };
    if policy == AllocPolicy::Abort {
        eprintln!("{err}");
        std::process::exit(OOM_EXIT_CODE);
    }
    err
}
