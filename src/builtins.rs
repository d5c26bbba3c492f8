// ABOUTME: Native functions pre-populated into the global environment

use crate::ast::StaticType;
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::token::Span;
use crate::value::{NativeFunction, Value};
use std::rc::Rc;

fn call_span() -> Span {
    Span::default()
}

fn expect_int(value: &Value, name: &'static str, position: usize) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(RuntimeError::TypeMismatch {
            expected: format!("{name} argument {position} to be int"),
            actual: other.static_type().to_string(),
            span: call_span(),
        }),
    }
}

fn mod_fn(args: &[Value]) -> Result<Value, RuntimeError> {
    let a = expect_int(&args[0], "mod", 0)?;
    let b = expect_int(&args[1], "mod", 1)?;
    if b < 0 {
        return Err(RuntimeError::NegativeArgument {
            name: "mod",
            span: call_span(),
        });
    }
    if b == 0 {
        return Err(RuntimeError::DivisionByZero { span: call_span() });
    }
    Ok(Value::Int(a % b))
}

fn pow_fn(args: &[Value]) -> Result<Value, RuntimeError> {
    let base = expect_int(&args[0], "pow", 0)?;
    let exponent = expect_int(&args[1], "pow", 1)?;
    if exponent < 0 {
        return Err(RuntimeError::NegativeArgument {
            name: "pow",
            span: call_span(),
        });
    }
    Ok(Value::Int(base.pow(exponent as u32)))
}

/// Declares `mod` and `pow` into `env` with declared type
/// `NATIVE_FUNCTION`, before any user statement executes.
pub fn register_builtins(env: &Rc<Environment>) -> Result<(), RuntimeError> {
    declare_native(env, "mod", 2, mod_fn)?;
    declare_native(env, "pow", 2, pow_fn)?;
    Ok(())
}

fn declare_native(
    env: &Rc<Environment>,
    name: &'static str,
    arity: usize,
    func: fn(&[Value]) -> Result<Value, RuntimeError>,
) -> Result<(), RuntimeError> {
    let value = Value::NativeFunction(Rc::new(NativeFunction { name, arity, func }));
    env.declare(name, value, Some(StaticType::NativeFunction), call_span())
}
