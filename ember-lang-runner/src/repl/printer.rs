use gc::Gc;

use ember_lang_interpreter::object::Object;
use ember_lang_interpreter::Diagnostic;

pub trait Printer {
    type Object;

    fn print(&mut self, object: Self::Object);
}

pub struct InterpreterPrinter {}

impl Printer for InterpreterPrinter {
    type Object = Result<Gc<Object>, Vec<Diagnostic>>;

    fn print(&mut self, object: Self::Object) {
        match object {
            Ok(obj) => println!("{}", obj),
            Err(diagnostics) => {
                for diagnostic in diagnostics {
                    println!("{}", diagnostic);
                }
            }
        }
    }
}
