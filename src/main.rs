use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use clap::Parser;

use pagesort::array::PagedArray;
use pagesort::cli::Args;
use pagesort::error::Result;
use pagesort::input;

/// Set up SIGPIPE handling for Unix systems
/// This prevents "broken pipe" errors when output is piped to commands like `head`
#[cfg(unix)]
fn setup_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
fn setup_sigpipe() {
    // Windows doesn't have SIGPIPE
}

fn main() {
    setup_sigpipe();

    if let Err(e) = run() {
        eprintln!("pagesort: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut array = PagedArray::new(args.memory)?;

    // Read values from files or stdin
    if args.files.is_empty() {
        let stdin = io::stdin();
        input::append_values(BufReader::new(stdin.lock()), &mut array)?;
    } else {
        for path in &args.files {
            let reader: Box<dyn BufRead> = if path == "-" {
                Box::new(BufReader::new(io::stdin().lock()))
            } else {
                Box::new(BufReader::new(File::open(path)?))
            };
            input::append_values(reader, &mut array)?;
        }
    }

    array.sort()?;

    let mut out = BufWriter::new(open_output(&args)?);
    for i in 0..array.len() {
        writeln!(out, "{}", array.get(i)?)?;
    }
    out.flush()?;

    array.dispose()?;
    Ok(())
}

/// Open output file or return stdout
fn open_output(args: &Args) -> io::Result<Box<dyn Write>> {
    match &args.output {
        Some(path) => Ok(Box::new(File::create(path)?)),
        None => Ok(Box::new(io::stdout())),
    }
}
