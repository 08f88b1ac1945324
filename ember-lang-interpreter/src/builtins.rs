use gc::Gc;

use crate::object::{EvaluationError, Object};

type BuiltinResult = Result<Gc<Object>, EvaluationError>;

/// A host function callable by name when no user function of that name is in
/// scope.
#[derive(Clone, Copy)]
pub struct BuiltinFunction {
    pub name: &'static str,
    func: fn(Vec<Gc<Object>>) -> BuiltinResult,
}

impl BuiltinFunction {
    pub fn apply(&self, args: Vec<Gc<Object>>) -> BuiltinResult {
        (self.func)(args)
    }
}

impl std::fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinFunction")
            .field("name", &self.name)
            .finish()
    }
}

const BUILTINS: &[BuiltinFunction] = &[
    BuiltinFunction {
        name: "len",
        func: builtin_len,
    },
    BuiltinFunction {
        name: "first",
        func: builtin_first,
    },
    BuiltinFunction {
        name: "rest",
        func: builtin_rest,
    },
    BuiltinFunction {
        name: "append",
        func: builtin_append,
    },
];

pub fn lookup(name: &str) -> Option<BuiltinFunction> {
    BUILTINS.iter().find(|builtin| builtin.name == name).copied()
}

fn check_argument_count(args: &[Gc<Object>], expected: usize) -> Result<(), EvaluationError> {
    if args.len() != expected {
        return Err(EvaluationError::WrongArgumentCount {
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

fn expect_array<'a>(
    function: &'static str,
    arg: &'a Object,
) -> Result<&'a Vec<Gc<Object>>, EvaluationError> {
    match arg {
        Object::Array(arr) => Ok(arr),
        other => Err(EvaluationError::BuiltinArgumentType {
            function,
            expected: "ARRAY",
            got: other.type_name(),
        }),
    }
}

fn builtin_len(args: Vec<Gc<Object>>) -> BuiltinResult {
    check_argument_count(&args, 1)?;
    match &*args[0] {
        Object::String(s) => Ok(Object::integer(s.chars().count() as i64)),
        Object::Array(arr) => Ok(Object::integer(arr.len() as i64)),
        other => Err(EvaluationError::BuiltinArgumentType {
            function: "len",
            expected: "STRING or ARRAY",
            got: other.type_name(),
        }),
    }
}

fn builtin_first(args: Vec<Gc<Object>>) -> BuiltinResult {
    check_argument_count(&args, 1)?;
    let arr = expect_array("first", &args[0])?;
    Ok(arr.first().cloned().unwrap_or_else(Object::null))
}

/// Everything after the first element, or null for arrays shorter than two.
fn builtin_rest(args: Vec<Gc<Object>>) -> BuiltinResult {
    check_argument_count(&args, 1)?;
    let arr = expect_array("rest", &args[0])?;
    if arr.len() < 2 {
        return Ok(Object::null());
    }
    Ok(Object::array(arr[1..].to_owned()))
}

fn builtin_append(args: Vec<Gc<Object>>) -> BuiltinResult {
    check_argument_count(&args, 2)?;
    let arr = expect_array("append", &args[0])?;
    let mut new_arr = arr.clone();
    new_arr.push(args[1].clone());
    Ok(Object::array(new_arr))
}

#[cfg(test)]
mod tests {
    use super::{builtin_append, builtin_first, builtin_len, builtin_rest, lookup};
    use crate::object::{EvaluationError, Object};

    #[test]
    fn test_len() {
        let no_arguments = builtin_len(vec![]);
        assert_eq!(
            no_arguments,
            Err(EvaluationError::WrongArgumentCount {
                expected: 1,
                actual: 0
            })
        );

        let too_many_arguments = builtin_len(vec![
            Object::string("hello".to_owned()),
            Object::string("world".to_owned()),
        ]);
        assert_eq!(
            too_many_arguments,
            Err(EvaluationError::WrongArgumentCount {
                expected: 1,
                actual: 2
            })
        );

        let empty_array = builtin_len(vec![Object::array(vec![])]);
        assert_eq!(empty_array, Ok(Object::integer(0)));

        let string_len = builtin_len(vec![Object::string("hello".to_owned())]);
        assert_eq!(string_len, Ok(Object::integer(5)));

        let multibyte = builtin_len(vec![Object::string("héllo".to_owned())]);
        assert_eq!(multibyte, Ok(Object::integer(5)));

        let integer_len = builtin_len(vec![Object::integer(42)]);
        assert_eq!(
            integer_len,
            Err(EvaluationError::BuiltinArgumentType {
                function: "len",
                expected: "STRING or ARRAY",
                got: "INTEGER"
            })
        );
    }

    #[test]
    fn test_first_and_rest() {
        let array = || {
            Object::array(vec![
                Object::integer(1),
                Object::integer(2),
                Object::integer(3),
            ])
        };
        assert_eq!(builtin_first(vec![array()]), Ok(Object::integer(1)));
        assert_eq!(builtin_first(vec![Object::array(vec![])]), Ok(Object::null()));
        assert_eq!(
            builtin_rest(vec![array()]),
            Ok(Object::array(vec![Object::integer(2), Object::integer(3)]))
        );
        assert_eq!(
            builtin_rest(vec![Object::array(vec![Object::integer(1)])]),
            Ok(Object::null())
        );
        assert_eq!(
            builtin_first(vec![Object::integer(1)]),
            Err(EvaluationError::BuiltinArgumentType {
                function: "first",
                expected: "ARRAY",
                got: "INTEGER"
            })
        );
    }

    #[test]
    fn test_append_does_not_mutate() {
        let original = Object::array(vec![Object::integer(1), Object::integer(2)]);
        let appended = builtin_append(vec![original.clone(), Object::integer(3)]);

        assert_eq!(
            appended,
            Ok(Object::array(vec![
                Object::integer(1),
                Object::integer(2),
                Object::integer(3)
            ]))
        );
        assert_eq!(
            original,
            Object::array(vec![Object::integer(1), Object::integer(2)])
        );
        assert_eq!(
            builtin_append(vec![original]),
            Err(EvaluationError::WrongArgumentCount {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("append").map(|builtin| builtin.name), Some("append"));
        assert!(lookup("push").is_none());
    }
}
