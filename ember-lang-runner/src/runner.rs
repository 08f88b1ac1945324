use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gc::Gc;

use ember_lang_core::trace::TraceSink;
use ember_lang_interpreter::environment::Environment;
use ember_lang_interpreter::object::Object;
use ember_lang_interpreter::{evaluate_with, Diagnostic};
use rustyline::error::ReadlineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line editor failed: {0}")]
    Readline(#[from] ReadlineError),
}

pub fn execute_file(path: &Path, tracer: &mut dyn TraceSink) -> Result<ExitCode, RunnerError> {
    let source = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "running file");
    Ok(execute(&source, tracer))
}

pub fn execute(source: &str, tracer: &mut dyn TraceSink) -> ExitCode {
    let mut environment = Environment::new();
    let result = evaluate_with(source, &mut environment, tracer);

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    match report(&result, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            tracing::error!(%error, "cannot write result");
            ExitCode::FAILURE
        }
    }
}

/// Writes the value to `out` or every diagnostic to `err`. Returns whether
/// the evaluation succeeded.
pub fn report(
    result: &Result<Gc<Object>, Vec<Diagnostic>>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<bool> {
    match result {
        Ok(object) => {
            writeln!(out, "{}", object)?;
            Ok(true)
        }
        Err(diagnostics) => {
            for diagnostic in diagnostics {
                writeln!(err, "{}", diagnostic)?;
            }
            Ok(false)
        }
    }
}
