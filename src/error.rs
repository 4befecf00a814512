use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("out of memory ({op}): {requested} bytes")]
    OutOfMemory { op: &'static str, requested: usize },
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
