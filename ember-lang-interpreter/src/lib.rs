pub mod builtins;
pub mod diagnostic;
pub mod environment;
pub mod evaluator;
pub mod object;

use gc::Gc;

use ember_lang_core::lexer::Tokenizer;
use ember_lang_core::parser::Parser;
use ember_lang_core::trace::{NoopTracer, TraceSink};

pub use diagnostic::{Diagnostic, DiagnosticKind};
use environment::Environment;
use evaluator::Evaluator;
use object::Object;

/// Tokenizes, parses and evaluates `source` in a fresh environment.
pub fn evaluate(source: &str) -> Result<Gc<Object>, Vec<Diagnostic>> {
    let mut environment = Environment::new();
    evaluate_with(source, &mut environment, &mut NoopTracer)
}

/// Like [`evaluate`], but keeps bindings in `environment` and reports every
/// phase to `tracer`. Nothing is evaluated when the source has parse errors.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn evaluate_with(
    source: &str,
    environment: &mut Environment,
    tracer: &mut dyn TraceSink,
) -> Result<Gc<Object>, Vec<Diagnostic>> {
    let program = {
        let mut parser = Parser::with_tracer(Tokenizer::new(source), &mut *tracer);
        parser
            .parse_program()
            .map_err(|errors| errors.into_iter().map(Diagnostic::from).collect::<Vec<_>>())?
    };

    let result = Evaluator::with_tracer(tracer).eval_program(&program, environment);
    if let Err(error) = &result {
        tracing::debug!(%error, "evaluation failed");
    }
    result.map_err(|error| vec![Diagnostic::from(error)])
}
