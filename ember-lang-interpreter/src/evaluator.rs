use std::collections::HashMap;

use gc::Gc;

use crate::builtins;
use crate::environment::Environment;
use crate::object::{EvaluationError, Function, HashKey, Object, QuickReturn};
use ember_lang_core::ast;
use ember_lang_core::ast::{Expression, InfixOperationKind, PrefixOperationKind};
use ember_lang_core::trace::{NoopTracer, TraceEvent, TraceSink};

type EvalResult = Result<Gc<Object>, QuickReturn>;

/// Evaluates `program` in `environment` without tracing.
pub fn eval_program(
    program: &ast::Program,
    environment: &mut Environment,
) -> Result<Gc<Object>, EvaluationError> {
    let mut tracer = NoopTracer;
    Evaluator::with_tracer(&mut tracer).eval_program(program, environment)
}

/// Tree-walking evaluator. The active scope is always passed in explicitly;
/// the evaluator itself only holds the trace sink.
pub struct Evaluator<'t> {
    tracer: &'t mut dyn TraceSink,
}

impl<'t> Evaluator<'t> {
    pub fn with_tracer(tracer: &'t mut dyn TraceSink) -> Self {
        Self { tracer }
    }

    pub fn eval_program(
        &mut self,
        program: &ast::Program,
        environment: &mut Environment,
    ) -> Result<Gc<Object>, EvaluationError> {
        let mut output = Object::null();
        for statement in &program.statements {
            let result = self.eval_statement(statement, environment);

            match result {
                Err(QuickReturn::Return(value)) => return Ok(value),
                Err(QuickReturn::Error(error)) => return Err(error),
                Ok(object) => output = object,
            };
        }
        Ok(output)
    }

    fn record(&mut self, kind: &'static str, result: &EvalResult) {
        if !self.tracer.enabled() {
            return;
        }
        let summary = match result {
            Ok(object) => object.to_string(),
            Err(QuickReturn::Return(object)) => format!("return {}", object),
            Err(QuickReturn::Error(error)) => format!("error: {}", error),
        };
        self.tracer.record(TraceEvent::NodeEvaluated {
            kind,
            result: &summary,
        });
    }

    fn eval_statement(
        &mut self,
        statement: &ast::Statement,
        environment: &mut Environment,
    ) -> EvalResult {
        let result = match statement {
            ast::Statement::Expression(expression) => {
                self.eval_expression(expression, environment)
            }
            ast::Statement::Return(statement) => {
                self.eval_return_statement(statement, environment)
            }
            ast::Statement::Let(statement) => self.eval_let_statement(statement, environment),
        };
        self.record(statement.kind(), &result);
        result
    }

    fn eval_let_statement(
        &mut self,
        statement: &ast::LetStatement,
        environment: &mut Environment,
    ) -> EvalResult {
        let value = self.eval_expression(&statement.value, environment)?;
        environment.set(statement.identifier.name.clone(), value.clone());
        Ok(value)
    }

    fn eval_return_statement(
        &mut self,
        statement: &ast::ReturnStatement,
        environment: &mut Environment,
    ) -> EvalResult {
        let value = self.eval_expression(&statement.value, environment)?;
        Err(QuickReturn::Return(value))
    }

    fn eval_block_statement(
        &mut self,
        block: &ast::BlockStatement,
        environment: &mut Environment,
    ) -> EvalResult {
        let mut result = Object::null();
        for statement in &block.statements {
            result = self.eval_statement(statement, environment)?;
        }
        Ok(result)
    }

    fn eval_expression(&mut self, expression: &Expression, environment: &mut Environment) -> EvalResult {
        let result = self.eval_expression_kind(expression, environment);
        self.record(expression.kind(), &result);
        result
    }

    fn eval_expression_kind(
        &mut self,
        expression: &Expression,
        environment: &mut Environment,
    ) -> EvalResult {
        match expression {
            Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
            Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
            Expression::StringLiteral(value) => Ok(Object::string(value.clone())),
            Expression::ArrayLiteral(array) => {
                Ok(Object::array(self.eval_expressions(array, environment)?))
            }
            Expression::HashLiteral(literal) => self.eval_hash_literal(literal, environment),
            Expression::Identifier(identifier) => environment.get(&identifier.name).ok_or(
                QuickReturn::Error(EvaluationError::UnknownIdentifier(identifier.name.clone())),
            ),
            Expression::PrefixOperation(kind, expression) => {
                let right = self.eval_expression(expression, environment)?;
                eval_prefix_operation(*kind, &right).map_err(QuickReturn::Error)
            }
            Expression::InfixOperation(kind, left, right) => {
                let left = self.eval_expression(left, environment)?;
                let right = self.eval_expression(right, environment)?;
                eval_infix_operation(*kind, &left, &right).map_err(QuickReturn::Error)
            }
            Expression::IfExpression {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_expression(condition, environment)?;
                if condition.is_truthy() {
                    self.eval_block_statement(consequence, environment)
                } else if let Some(alternative) = alternative {
                    self.eval_block_statement(alternative, environment)
                } else {
                    Ok(Object::null())
                }
            }
            Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
                parameters.clone(),
                body.clone(),
                environment.clone(),
            )),
            Expression::CallExpression {
                function,
                arguments,
            } => self.eval_call_expression(function, arguments, environment),
            Expression::IndexExpression { left, index } => {
                let left = self.eval_expression(left, environment)?;
                let index = self.eval_expression(index, environment)?;
                eval_index_expression(&left, &index).map_err(QuickReturn::Error)
            }
        }
    }

    fn eval_expressions(
        &mut self,
        expressions: &[Expression],
        environment: &mut Environment,
    ) -> Result<Vec<Gc<Object>>, QuickReturn> {
        let mut result = Vec::with_capacity(expressions.len());
        for expression in expressions {
            result.push(self.eval_expression(expression, environment)?);
        }
        Ok(result)
    }

    fn eval_hash_literal(
        &mut self,
        literal: &[(Expression, Expression)],
        environment: &mut Environment,
    ) -> EvalResult {
        let mut hashmap = HashMap::with_capacity(literal.len());
        for (key, value) in literal {
            let key = self.eval_expression(key, environment)?;
            let hashed_key = HashKey::try_from(&*key)?;
            let value = self.eval_expression(value, environment)?;
            hashmap.insert(hashed_key, (key, value));
        }
        Ok(Object::hash(hashmap))
    }

    /// Arguments are evaluated before the callee. A callee that resolves to a
    /// user function is always applied; otherwise a built-in with the
    /// callee's name is tried before reporting the failure.
    fn eval_call_expression(
        &mut self,
        function: &Expression,
        arguments: &[Expression],
        environment: &mut Environment,
    ) -> EvalResult {
        let arguments = self.eval_expressions(arguments, environment)?;

        let failure = match self.eval_expression(function, environment) {
            Ok(callee) => match &*callee {
                Object::Function(callee) => return self.apply_function(callee, arguments),
                other => EvaluationError::CallNonFunction(other.type_name()),
            },
            Err(QuickReturn::Error(error)) => error,
            Err(signal) => return Err(signal),
        };

        let builtin = match function {
            Expression::Identifier(identifier) => builtins::lookup(&identifier.name),
            _ => None,
        };
        match builtin {
            Some(builtin) => builtin.apply(arguments).map_err(QuickReturn::Error),
            None => Err(QuickReturn::Error(failure)),
        }
    }

    fn apply_function(&mut self, function: &Function, arguments: Vec<Gc<Object>>) -> EvalResult {
        if function.parameters.len() != arguments.len() {
            return Err(QuickReturn::Error(EvaluationError::WrongArgumentCount {
                expected: function.parameters.len(),
                actual: arguments.len(),
            }));
        }

        let mut call_environment = Environment::new_enclosed(&function.environment);
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            call_environment.set(parameter.name.clone(), argument);
        }
        match self.eval_block_statement(&function.body, &mut call_environment) {
            Ok(object) => Ok(object),
            Err(QuickReturn::Return(value)) => Ok(value),
            Err(error) => Err(error),
        }
    }
}

fn eval_prefix_operation(
    kind: PrefixOperationKind,
    right: &Object,
) -> Result<Gc<Object>, EvaluationError> {
    match (kind, right) {
        (PrefixOperationKind::Bang, right) => Ok(Object::boolean(!right.is_truthy())),
        (PrefixOperationKind::Minus, Object::Integer(value)) => value
            .checked_neg()
            .map(Object::integer)
            .ok_or(EvaluationError::NegationOverflow(*value)),
        (PrefixOperationKind::Minus, right) => Err(EvaluationError::UnknownPrefixOperator {
            operation: kind,
            right: right.type_name(),
        }),
    }
}

fn eval_infix_operation(
    kind: InfixOperationKind,
    left: &Object,
    right: &Object,
) -> Result<Gc<Object>, EvaluationError> {
    match (left, right) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(kind, *left, *right)
        }
        (Object::String(left), Object::String(right)) if kind == InfixOperationKind::Plus => {
            Ok(Object::string(format!("{}{}", left, right)))
        }
        (Object::String(_), Object::String(_)) => Err(unknown_infix_operator(kind, left, right)),
        _ if std::mem::discriminant(left) != std::mem::discriminant(right) => {
            Err(EvaluationError::TypeMismatch {
                left: left.type_name(),
                operation: kind,
                right: right.type_name(),
            })
        }
        _ => match kind {
            InfixOperationKind::Equal => Ok(Object::boolean(left == right)),
            InfixOperationKind::NotEqual => Ok(Object::boolean(left != right)),
            _ => Err(unknown_infix_operator(kind, left, right)),
        },
    }
}

fn unknown_infix_operator(
    kind: InfixOperationKind,
    left: &Object,
    right: &Object,
) -> EvaluationError {
    EvaluationError::UnknownInfixOperator {
        left: left.type_name(),
        operation: kind,
        right: right.type_name(),
    }
}

fn eval_integer_infix_operation(
    kind: InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Gc<Object>, EvaluationError> {
    let overflow = || EvaluationError::IntegerOverflow {
        left,
        operation: kind,
        right,
    };
    let value = match kind {
        InfixOperationKind::Plus => left.checked_add(right).ok_or_else(overflow)?,
        InfixOperationKind::Minus => left.checked_sub(right).ok_or_else(overflow)?,
        InfixOperationKind::Multiply => left.checked_mul(right).ok_or_else(overflow)?,
        InfixOperationKind::Divide => {
            if right == 0 {
                return Err(EvaluationError::DivisionByZero);
            }
            left.checked_div(right).ok_or_else(overflow)?
        }
        InfixOperationKind::LessThan => return Ok(Object::boolean(left < right)),
        InfixOperationKind::GreaterThan => return Ok(Object::boolean(left > right)),
        InfixOperationKind::Equal => return Ok(Object::boolean(left == right)),
        InfixOperationKind::NotEqual => return Ok(Object::boolean(left != right)),
    };
    Ok(Object::integer(value))
}

/// Out of range array reads and missing hash keys are null, every other
/// misuse is an error.
fn eval_index_expression(left: &Object, index: &Object) -> Result<Gc<Object>, EvaluationError> {
    match (left, index) {
        (Object::Array(array), Object::Integer(index)) => Ok(usize::try_from(*index)
            .ok()
            .and_then(|index| array.get(index))
            .cloned()
            .unwrap_or_else(Object::null)),
        (Object::Hash(hash), index) => {
            let hashed_index = HashKey::try_from(index)?;
            Ok(hash
                .get(&hashed_index)
                .map(|(_, value)| value.clone())
                .unwrap_or_else(Object::null))
        }
        _ => Err(EvaluationError::IndexNotSupported {
            left: left.type_name(),
            index: index.type_name(),
        }),
    }
}
