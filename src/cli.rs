use clap::Parser;
use fgetln::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fgetln",
    version,
    about = "Lê arquivos linha a linha e exibe cada linha com o tamanho informado.",
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(
        value_name = "CAMINHO",
        help = "Arquivos, diretórios ou '-' para a entrada padrão",
        required = true
    )]
    pub inputs: Vec<PathBuf>,

    #[arg(
        short,
        long,
        value_name = "ARQUIVO",
        help = "Grava a listagem neste arquivo em vez da saída padrão"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'e',
        long = "extension",
        alias = "ext",
        default_value = "txt",
        value_name = "EXT",
        help = "Extensão usada para filtrar os arquivos dos diretórios de entrada"
    )]
    pub ext: String,

    #[arg(
        short,
        long,
        help = "Percorre diretórios recursivamente em busca de arquivos"
    )]
    pub recursive: bool,

    #[arg(
        long,
        help = "Informa o tamanho exato da linha em vez do tamanho legado (bytes - 1)"
    )]
    pub exact: bool,

    #[arg(
        long = "abort-on-oom",
        help = "Encerra o processo com código 2 quando faltar memória para uma linha"
    )]
    pub abort_on_oom: bool,

    #[arg(
        long = "quiet",
        help = "Suprime mensagens de progresso",
        action = clap::ArgAction::SetTrue
    )]
    pub quiet: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            inputs: self.inputs,
            output: self.output,
            ext: self.ext,
            recursive: self.recursive,
            exact: self.exact,
            abort_on_oom: self.abort_on_oom,
            quiet: self.quiet,
        }
    }
}
