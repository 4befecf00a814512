use crate::memory::AllocPolicy;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMode {
    Legacy,
    Exact,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub ext: String,
    pub recursive: bool,
    pub exact: bool,
    pub abort_on_oom: bool,
    pub quiet: bool,
}

impl Config {
    pub fn length_mode(&self) -> LengthMode {
        if self.exact {
            LengthMode::Exact
        } else {
            LengthMode::Legacy
        }
    }

    pub fn alloc_policy(&self) -> AllocPolicy {
        if self.abort_on_oom {
            AllocPolicy::Abort
        } else {
            AllocPolicy::Propagate
        }
    }
}
