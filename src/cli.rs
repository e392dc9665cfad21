use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pagesort",
    about = "Sort integer lines using bounded resident memory"
)]
pub struct Args {
    /// Keep at most N elements in memory (rounded down to a multiple of 8)
    #[arg(short = 'm', long = "memory", value_name = "N", default_value_t = 131072)]
    pub memory: usize,

    /// Write result to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<String>,

    /// Input files ('-' for stdin)
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,
}
