mod buffer;
pub mod config;
mod dump;
mod error;
mod lines;
pub mod memory;
pub mod progress;
mod scanner;

pub use buffer::{LINE_CHUNK, OK_TO_WASTE};
pub use config::Config;
pub use error::{Error, Result};
pub use lines::{Line, LineReader, LineReaderBuilder};
pub use memory::{AllocFailed, AllocPolicy, Allocator, SystemAllocator, OOM_EXIT_CODE};
pub use progress::{ProgressReporter, ProgressSink};

use std::fs::File;
use std::io::{self, BufWriter, Write};

pub fn run(config: Config) -> anyhow::Result<()> {
    let sources = scanner::collect_sources(&config)?;
    let mut progress = ProgressReporter::new(!config.quiet, sources.len());
    execute(&config, &sources, &mut progress)
}

pub fn run_with_progress(config: Config, progress: &mut dyn ProgressSink) -> anyhow::Result<()> {
    let sources = scanner::collect_sources(&config)?;
    execute(&config, &sources, progress)
}

fn execute(
    config: &Config,
    sources: &[scanner::Source],
    progress: &mut dyn ProgressSink,
) -> anyhow::Result<()> {
    use anyhow::Context;

    let dumper = dump::LineDumper::new(config.length_mode(), config.alloc_policy());
    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Não foi possível criar arquivo de saída {:?}", path))?;
            let mut writer = BufWriter::new(file);
            dumper.dump_all(sources, &mut writer, progress)?;
            writer
                .flush()
                .context("Falha ao finalizar escrita do arquivo de saída")?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            dumper.dump_all(sources, &mut writer, progress)?;
            writer
                .flush()
                .context("Falha ao finalizar escrita na saída padrão")?;
        }
    }

    progress.finish(config.output.as_deref());
    Ok(())
}
