use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use crate::environment::Environment;
use ember_lang_core::ast;
use gc::{Finalize, Gc, Trace};

use thiserror::Error;

#[derive(Debug, PartialEq, Clone, Trace, Finalize)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Array(Vec<Gc<Object>>),
    Hash(HashMap<HashKey, (Gc<Object>, Gc<Object>)>),
    Function(Function),
    Null,
}

#[derive(Debug, PartialEq, Clone, Eq, Hash, Trace, Finalize)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl Object {
    pub fn null() -> Gc<Object> {
        Gc::new(Object::Null)
    }
    pub fn boolean(value: bool) -> Gc<Object> {
        Gc::new(Object::Boolean(value))
    }
    pub fn integer(value: i64) -> Gc<Object> {
        Gc::new(Object::Integer(value))
    }
    pub fn string(value: String) -> Gc<Object> {
        Gc::new(Object::String(value))
    }
    pub fn array(array: Vec<Gc<Object>>) -> Gc<Object> {
        Gc::new(Object::Array(array))
    }
    pub fn hash(hash: HashMap<HashKey, (Gc<Object>, Gc<Object>)>) -> Gc<Object> {
        Gc::new(Object::Hash(hash))
    }
    pub fn function(
        parameters: Vec<ast::Identifier>,
        body: Rc<ast::BlockStatement>,
        environment: Environment,
    ) -> Gc<Object> {
        Gc::new(Object::Function(Function {
            parameters,
            body,
            environment,
        }))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "INTEGER",
            Object::Boolean(_) => "BOOLEAN",
            Object::String(_) => "STRING",
            Object::Array(_) => "ARRAY",
            Object::Hash(_) => "HASH",
            Object::Function(_) => "FUNCTION",
            Object::Null => "NULL",
        }
    }

    /// Integer zero and null are falsy, booleans are themselves, every other
    /// object is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Integer(value) => *value != 0,
            Object::Boolean(value) => *value,
            Object::Null => false,
            _ => true,
        }
    }
}

impl TryFrom<&Object> for HashKey {
    type Error = EvaluationError;

    fn try_from(value: &Object) -> Result<Self, Self::Error> {
        match value {
            Object::Integer(int) => Ok(HashKey::Integer(*int)),
            Object::String(str) => Ok(HashKey::String(str.clone())),
            Object::Boolean(bool) => Ok(HashKey::Boolean(*bool)),
            other => Err(EvaluationError::UnusableHashKey(other.type_name())),
        }
    }
}

/// A closure: the parameters and body of a function literal together with the
/// environment that was active when the literal was evaluated.
#[derive(Clone, Trace, Finalize)]
pub struct Function {
    #[unsafe_ignore_trace]
    pub parameters: Vec<ast::Identifier>,
    #[unsafe_ignore_trace]
    pub body: Rc<ast::BlockStatement>,
    pub environment: Environment,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.parameters == other.parameters
            && Rc::ptr_eq(&self.body, &other.body)
            && self.environment == other.environment
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body.to_string())
            .finish()
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "\"{}\"", value),
            Object::Null => write!(f, "null"),
            Object::Array(arr) => {
                write!(f, "[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", obj)?;
                }
                write!(f, "]")
            }
            Object::Hash(hash) => {
                let mut pairs = hash
                    .values()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>();
                pairs.sort();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Object::Function(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(|id| id.name.as_ref())
                    .collect::<Vec<&str>>();
                write!(f, "fn({}) {}", parameters.join(", "), function.body)
            }
        }
    }
}

/// Short-circuit channel of every evaluation step. Both variants stop the
/// enclosing statement sequence and are never evaluated further.
#[derive(Debug, PartialEq)]
pub enum QuickReturn {
    Return(Gc<Object>),
    Error(EvaluationError),
}

impl From<EvaluationError> for QuickReturn {
    fn from(value: EvaluationError) -> Self {
        QuickReturn::Error(value)
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum EvaluationError {
    #[error("identifier not found: {0}")]
    UnknownIdentifier(Rc<str>),
    #[error("type mismatch: {left} {operation} {right}")]
    TypeMismatch {
        left: &'static str,
        operation: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("unknown operator: {operation}{right}")]
    UnknownPrefixOperator {
        operation: ast::PrefixOperationKind,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operation} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operation: ast::InfixOperationKind,
        right: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow: {left} {operation} {right}")]
    IntegerOverflow {
        left: i64,
        operation: ast::InfixOperationKind,
        right: i64,
    },
    #[error("integer overflow: -({0})")]
    NegationOverflow(i64),
    #[error("index operator not supported: {left}[{index}]")]
    IndexNotSupported {
        left: &'static str,
        index: &'static str,
    },
    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),
    #[error("not a function: {0}")]
    CallNonFunction(&'static str),
    #[error("wrong number of arguments: expected {expected}, got {actual}")]
    WrongArgumentCount { expected: usize, actual: usize },
    #[error("argument to `{function}` must be {expected}, got {got}")]
    BuiltinArgumentType {
        function: &'static str,
        expected: &'static str,
        got: &'static str,
    },
}
