use crate::config::LengthMode;
use crate::lines::{Line, LineReader};
use crate::memory::AllocPolicy;
use crate::progress::ProgressSink;
use crate::scanner::Source;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

pub struct LineDumper {
    mode: LengthMode,
    policy: AllocPolicy,
}

impl LineDumper {
    pub fn new(mode: LengthMode, policy: AllocPolicy) -> Self {
        Self { mode, policy }
    }

    pub fn dump_all<W: Write>(
        &self,
        sources: &[Source],
        writer: &mut W,
        progress: &mut dyn ProgressSink,
    ) -> Result<u64> {
        let mut total = 0;
        for source in sources {
            total += self.dump_source(source, writer, progress)?;
        }
        Ok(total)
    }

    pub fn dump_source<W: Write>(
        &self,
        source: &Source,
        writer: &mut W,
        progress: &mut dyn ProgressSink,
    ) -> Result<u64> {
        let path = source.path();
        progress.start_file(path);

        let lines = match source {
            Source::Stdin => {
                let stdin = io::stdin();
                self.dump_reader(stdin.lock(), writer, progress)
            }
            Source::File(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Falha ao abrir arquivo {:?}", path))?;
                self.dump_reader(BufReader::new(file), writer, progress)
            }
        }
        .with_context(|| format!("Erro ao ler linha em {:?}", path))?;

        progress.finish_file(path, lines);
        Ok(lines)
    }

    pub fn dump_reader<R: BufRead, W: Write>(
        &self,
        reader: R,
        writer: &mut W,
        progress: &mut dyn ProgressSink,
    ) -> Result<u64> {
        let mut reader = LineReader::builder(reader)
            .alloc_policy(self.policy)
            .build();

        while let Some(line) = reader.read_line()? {
            self.write_line(&line, writer)
                .context("Erro ao escrever na saída")?;
            progress.on_line();
        }

        Ok(reader.lines_read())
    }

    fn write_line<W: Write>(&self, line: &Line<'_>, writer: &mut W) -> io::Result<()> {
        let length = match self.mode {
            LengthMode::Legacy => line.legacy_len(),
            LengthMode::Exact => line.len(),
        };
        write!(writer, "{}\t", length)?;
        writer.write_all(line)?;
        if !line.ends_with_newline() {
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}
