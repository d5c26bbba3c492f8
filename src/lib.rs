// ABOUTME: Library root exposing the interpreter pipeline for the CLI and integration tests

pub mod ast;
pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

use env::Environment;
use error::InterpreterError;
use std::rc::Rc;

/// Lexes, parses, and evaluates `source` against a fresh global
/// environment pre-populated with the built-in registry. Returns the
/// environment so a caller (the CLI, or a test) can inspect the final
/// bindings.
pub fn interpret(source: &str) -> Result<Rc<Environment>, InterpreterError> {
    let program = parser::parse(source)?;
    let env = Environment::new();
    builtins::register_builtins(&env)?;
    eval::run(&program, &env)?;
    Ok(env)
}
