//! Backend fallback and the transcript run.

use crate::backend::{flow_backends, tabular_backends, Backend, FlowBackend, TabularBackend};
use crate::config::{locate, Targets};
use crate::error::{Error, Result};
use crate::render;
use std::io::Write;
use std::path::Path;

/// What happened to one target during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The file does not exist.
    NotFound,
    /// A backend read the file and its contents were printed.
    Dumped,
    /// No backend could read the file.
    NoBackend,
}

impl Outcome {
    fn from_dumped(dumped: bool) -> Self {
        if dumped {
            Outcome::Dumped
        } else {
            Outcome::NoBackend
        }
    }
}

/// Per-target outcomes of [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub tabular: Outcome,
    pub flow: Outcome,
}

/// Prints documents to a writer using the first backend that can read them.
///
/// Unavailable backends are skipped without output. A backend that fails
/// prints `Error with <name>: <error>` and the next one is tried.
///
/// # Example
///
/// ```no_run
/// use docdump::DocumentDumper;
/// use std::path::Path;
///
/// let mut dumper = DocumentDumper::new(std::io::stdout());
/// dumper.dump_tabular(Path::new("book.xlsx"))?;
/// dumper.dump_flow_text(Path::new("plan.docx"))?;
/// # Ok::<(), docdump::Error>(())
/// ```
pub struct DocumentDumper<W: Write> {
    out: W,
    tabular: Vec<TabularBackend>,
    flow: Vec<FlowBackend>,
}

impl<W: Write> DocumentDumper<W> {
    /// Dumper using the default backend registries.
    pub fn new(out: W) -> Self {
        Self::with_backends(out, tabular_backends(), flow_backends())
    }

    /// Dumper with explicit backend lists, tried in the given order.
    pub fn with_backends(out: W, tabular: Vec<TabularBackend>, flow: Vec<FlowBackend>) -> Self {
        Self { out, tabular, flow }
    }

    /// Print every sheet of the spreadsheet at `path`.
    ///
    /// Returns `Ok(false)` when no backend could read the file. Errors are
    /// only returned for failed writes.
    pub fn dump_tabular(&mut self, path: &Path) -> Result<bool> {
        writeln!(self.out, "=== Reading Excel file: {} ===\n", path.display())?;

        match first_success(&mut self.out, &self.tabular, path)? {
            Some(workbook) => {
                render::write_workbook(&mut self.out, &workbook)?;
                Ok(true)
            }
            None => {
                writeln!(self.out, "No suitable library found for reading Excel files")?;
                Ok(false)
            }
        }
    }

    /// Print the non-blank paragraphs and the tables of the document at `path`.
    pub fn dump_flow_text(&mut self, path: &Path) -> Result<bool> {
        writeln!(self.out, "\n\n=== Reading Word document: {} ===\n", path.display())?;

        match first_success(&mut self.out, &self.flow, path)? {
            Some(doc) => {
                render::write_flow_document(&mut self.out, &doc)?;
                Ok(true)
            }
            None => {
                writeln!(self.out, "No suitable library found for reading Word documents")?;
                Ok(false)
            }
        }
    }

    /// Dump the spreadsheet target, then the document target.
    ///
    /// A missing target prints a not-found line and the run goes on.
    pub fn run(&mut self, targets: &Targets) -> Result<RunSummary> {
        let tabular = match locate(&targets.tabular) {
            Some(path) => Outcome::from_dumped(self.dump_tabular(&path)?),
            None => {
                writeln!(self.out, "Excel file not found: {}", targets.tabular.display())?;
                Outcome::NotFound
            }
        };

        let flow = match locate(&targets.flow) {
            Some(path) => Outcome::from_dumped(self.dump_flow_text(&path)?),
            None => {
                writeln!(self.out, "Word file not found: {}", targets.flow.display())?;
                Outcome::NotFound
            }
        };

        self.out.flush()?;
        Ok(RunSummary { tabular, flow })
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn first_success<W, D>(
    out: &mut W,
    backends: &[Box<dyn Backend<Output = D>>],
    path: &Path,
) -> Result<Option<D>>
where
    W: Write,
{
    for backend in backends.iter().filter(|b| b.is_available()) {
        match backend.open(path) {
            Ok(doc) => return Ok(Some(doc)),
            Err(Error::BackendUnavailable(_)) => continue,
            Err(e) => writeln!(out, "Error with {}: {}", backend.name(), e)?,
        }
    }
    Ok(None)
}

/// Dump `targets` to `out` with the default backends.
///
/// # Example
///
/// ```no_run
/// let summary = docdump::run(&docdump::Targets::default(), std::io::stdout())?;
/// println!("{:?}", summary);
/// # Ok::<(), docdump::Error>(())
/// ```
pub fn run<W: Write>(targets: &Targets, out: W) -> Result<RunSummary> {
    DocumentDumper::new(out).run(targets)
}
