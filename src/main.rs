// ABOUTME: CLI entry point: run a source file through the pipeline and dump the result

mod ast;
mod builtins;
mod env;
mod error;
mod eval;
mod lexer;
mod parser;
mod token;
mod value;

use clap::Parser as ClapParser;
use error::InterpreterError;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Interpreter for a small, statically-typed, imperative scripting language.
#[derive(ClapParser, Debug)]
#[command(name = "titanite")]
#[command(about = "Lex, parse, and evaluate a .ti source file")]
struct Cli {
    /// Path to the source file to run
    source: PathBuf,
}

#[derive(Serialize)]
struct EnvironmentEntry {
    name: String,
    declared_type: String,
    value: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli.source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &PathBuf) -> Result<(), String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;

    let env = interpret(&source)
        .map_err(|e| error::InterpreterErrorDiagnostic(&e).to_string())?;

    let entries: Vec<EnvironmentEntry> = env
        .local_bindings()
        .into_iter()
        .map(|(name, declared_type, value)| EnvironmentEntry {
            name,
            declared_type: declared_type.to_string(),
            value: value.to_string(),
        })
        .collect();

    for entry in &entries {
        let line = serde_json::to_string(entry).map_err(|e| e.to_string())?;
        println!("{line}");
    }

    Ok(())
}

fn interpret(source: &str) -> Result<std::rc::Rc<env::Environment>, InterpreterError> {
    let program = parser::parse(source)?;
    let global = env::Environment::new();
    builtins::register_builtins(&global)?;
    eval::run(&program, &global)?;
    Ok(global)
}
