use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn path(&self) -> &Path {
        match self {
            Source::Stdin => Path::new("-"),
            Source::File(path) => path,
        }
    }
}

pub fn collect_sources(config: &Config) -> Result<Vec<Source>> {
    let mut sources = Vec::new();
    let output = config.output.as_deref();
    let mut scanned_dir = false;

    for input in &config.inputs {
        if input.as_os_str() == "-" {
            sources.push(Source::Stdin);
        } else if input.is_dir() {
            scanned_dir = true;
            let mut files = Vec::new();
            if config.recursive {
                collect_recursive(input, output, &config.ext, &mut files)?;
            } else {
                collect_shallow(input, output, &config.ext, &mut files)?;
            }
            files.sort();
            sources.extend(files.into_iter().map(Source::File));
        } else if input.is_file() {
            if !is_output(input, output) {
                sources.push(Source::File(input.to_path_buf()));
            }
        } else {
            return Err(anyhow!("Caminho inválido: {:?}", input));
        }
    }

    if sources.is_empty() {
        if scanned_dir {
            return Err(anyhow!(
                "Nenhum arquivo de entrada encontrado com a extensão informada"
            ));
        }
        return Err(anyhow!(
            "Nenhum arquivo de entrada para ler"
        ));
    }

    Ok(sources)
}

fn collect_recursive(
    input: &Path,
    output: Option<&Path>,
    ext: &str,
    acc: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in WalkDir::new(input) {
        let entry = entry.with_context(|| format!("Falha ao percorrer diretório {:?}", input))?;
        let path = entry.path();
        if path.is_file() && has_matching_ext(path, ext) && !is_output(path, output) {
            acc.push(path.to_path_buf());
        }
    }
    Ok(())
}

fn collect_shallow(
    input: &Path,
    output: Option<&Path>,
    ext: &str,
    acc: &mut Vec<PathBuf>,
) -> Result<()> {
    let dir_iter =
        fs::read_dir(input).with_context(|| format!("Falha ao ler diretório {:?}", input))?;
    for entry in dir_iter {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && has_matching_ext(&path, ext) && !is_output(&path, output) {
            acc.push(path);
        }
    }
    Ok(())
}

fn has_matching_ext(path: &Path, ext: &str) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e.eq_ignore_ascii_case(ext),
        None => false,
    }
}

fn is_output(path: &Path, output: Option<&Path>) -> bool {
    output.map_or(false, |out| same_file(path, out))
}

fn same_file(a: &Path, b: &Path) -> bool {
    let ca = fs::canonicalize(a).unwrap_or_else(|_| a.to_path_buf());
    let cb = fs::canonicalize(b).unwrap_or_else(|_| b.to_path_buf());
    ca == cb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn build_config(inputs: Vec<PathBuf>, output: Option<PathBuf>, recursive: bool) -> Config {
        Config {
            inputs,
            output,
            ext: "txt".into(),
            recursive,
            exact: false,
            abort_on_oom: false,
            quiet: true,
        }
    }

    #[test]
    fn collects_recursive_entries() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir_all(&sub).unwrap();
        let file_a = dir.path().join("a.txt");
        let file_b = sub.join("b.txt");
        let file_other = sub.join("c.csv");
        File::create(&file_a).unwrap();
        File::create(&file_b).unwrap();
        File::create(&file_other).unwrap();

        let config = build_config(vec![dir.path().to_path_buf()], None, true);
        let sources = collect_sources(&config).unwrap();
        assert_eq!(sources, vec![Source::File(file_a), Source::File(file_b)]);
    }

    #[test]
    fn shallow_scan_skips_nested_and_output() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir_all(&sub).unwrap();
        let input = dir.path().join("data.txt");
        let output = dir.path().join("dump.txt");
        File::create(&input).unwrap();
        File::create(&output).unwrap();
        File::create(sub.join("deep.txt")).unwrap();

        let config = build_config(vec![dir.path().to_path_buf()], Some(output), false);
        let sources = collect_sources(&config).unwrap();
        assert_eq!(sources, vec![Source::File(input)]);
    }

    #[test]
    fn explicit_files_ignore_extension_filter() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("data.csv");
        File::create(&input).unwrap();
        let config = build_config(vec![PathBuf::from("-"), input.clone()], None, false);
        let sources = collect_sources(&config).unwrap();
        assert_eq!(sources, vec![Source::Stdin, Source::File(input)]);
        assert_eq!(sources[0].path(), Path::new("-"));
    }

    #[test]
    fn errors_when_nothing_matches() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("data.csv")).unwrap();
        let config = build_config(vec![dir.path().to_path_buf()], None, false);
        let err = collect_sources(&config).unwrap_err();
        assert!(format!("{err}").contains("Nenhum arquivo"));
    }

    #[test]
    fn output_as_only_input_is_reported_without_extension_hint() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("dump.txt");
        File::create(&output).unwrap();
        let config = build_config(vec![output.clone()], Some(output), false);
        let err = collect_sources(&config).unwrap_err();
        let message = format!("{err}");
        assert!(message.contains("Nenhum arquivo"));
        assert!(!message.contains("extensão"));
    }

    #[test]
    fn rejects_missing_paths() {
        let dir = tempdir().unwrap();
        let config = build_config(vec![dir.path().join("missing.txt")], None, false);
        let err = collect_sources(&config).unwrap_err();
        assert!(format!("{err}").contains("Caminho inválido"));
    }
}
