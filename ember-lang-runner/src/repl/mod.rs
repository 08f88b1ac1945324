mod evaluator;
mod printer;
mod reader;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use ember_lang_core::trace::TraceSink;
use evaluator::{Evaluator, InterpreterEvaluator};
use printer::{InterpreterPrinter, Printer};
use reader::{ReadOutput, Reader};

struct Repl<E: Evaluator, P: Printer> {
    reader: Reader,
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn run(mut self) -> Result<(), ReadlineError> {
        loop {
            match self.reader.read()? {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Value(line) => {
                    let result = self.evaluator.evaluate(&line);
                    self.printer.print(result)
                }
            }
        }
        Ok(())
    }
}

/// Runs an interactive session until end of input. Bindings made on one line
/// stay visible to the following ones.
pub fn start(tracer: Box<dyn TraceSink>) -> Result<(), crate::runner::RunnerError> {
    let rl = DefaultEditor::new()?;
    tracing::debug!("starting repl");

    Repl {
        reader: Reader::new(rl),
        evaluator: InterpreterEvaluator::new(tracer),
        printer: InterpreterPrinter {},
    }
    .run()?;
    Ok(())
}
