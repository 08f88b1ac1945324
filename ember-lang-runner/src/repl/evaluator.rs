use gc::Gc;

use ember_lang_core::trace::TraceSink;
use ember_lang_interpreter::environment::Environment;
use ember_lang_interpreter::object::Object;
use ember_lang_interpreter::{evaluate_with, Diagnostic};

pub trait Evaluator {
    type Object;

    fn evaluate(&mut self, source: &str) -> Self::Object;
}

pub struct InterpreterEvaluator {
    environment: Environment,
    tracer: Box<dyn TraceSink>,
}

impl InterpreterEvaluator {
    pub fn new(tracer: Box<dyn TraceSink>) -> Self {
        Self {
            environment: Environment::new(),
            tracer,
        }
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = Result<Gc<Object>, Vec<Diagnostic>>;

    fn evaluate(&mut self, source: &str) -> Self::Object {
        evaluate_with(source, &mut self.environment, self.tracer.as_mut())
    }
}
