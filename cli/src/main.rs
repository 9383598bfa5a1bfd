//! docdump CLI - print the contents of an Excel workbook and a Word document
//!
//! With no arguments the default targets are read.

use clap::Parser;
use colored::*;
use docdump::{flow_backends, tabular_backends, Backend, Targets};
use std::io::{self, Write};
use std::path::PathBuf;

/// Print the contents of an Excel workbook and a Word document
#[derive(Parser)]
#[command(
    name = "docdump",
    author = "iyulab",
    version,
    about = "Print the contents of Excel and Word files",
    long_about = "docdump - dump the sheets of an .xlsx workbook and the paragraphs\n\
                  and tables of a .docx document as plain text.\n\n\
                  Each format is read by the first available backend; a failing\n\
                  backend is reported and the next one is tried."
)]
struct Cli {
    /// Directory holding the default targets
    #[arg(long, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Spreadsheet to read (overrides the default)
    #[arg(long, value_name = "FILE")]
    xlsx: Option<PathBuf>,

    /// Word document to read (overrides the default)
    #[arg(long, value_name = "FILE")]
    docx: Option<PathBuf>,

    /// List the backends of this build and exit
    #[arg(long)]
    list_backends: bool,
}

impl Cli {
    fn targets(&self) -> Targets {
        let mut targets = Targets::default();
        if let Some(dir) = &self.base_dir {
            targets = targets.with_base_dir(dir);
        }
        if let Some(path) = &self.xlsx {
            targets = targets.with_tabular(path);
        }
        if let Some(path) = &self.docx {
            targets = targets.with_flow(path);
        }
        targets
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.list_backends {
        print_backends()?;
        return Ok(());
    }

    let stdout = io::stdout();
    docdump::run(&cli.targets(), stdout.lock())?;
    Ok(())
}

fn print_backends() -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{}", "Spreadsheet backends".cyan().bold())?;
    for backend in tabular_backends() {
        write_backend(&mut out, backend.as_ref())?;
    }

    writeln!(out, "\n{}", "Word document backends".cyan().bold())?;
    for backend in flow_backends() {
        write_backend(&mut out, backend.as_ref())?;
    }

    Ok(())
}

fn write_backend<W: Write, D>(out: &mut W, backend: &dyn Backend<Output = D>) -> io::Result<()> {
    let mark = if backend.is_available() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    writeln!(out, "  {} {}", mark, backend.name())
}
