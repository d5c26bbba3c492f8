// ABOUTME: Tree-walking evaluator: statement execution and expression evaluation

use crate::ast::{BinaryOp, Expr, ExprKind, LogicalOp, StaticType, Stmt, StmtKind, UnaryOp};
use crate::env::Environment;
use crate::error::RuntimeError;
use crate::value::{UserFunction, Value};
use std::rc::Rc;

/// What a statement produced: either it ran to completion normally, or it
/// is unwinding with a `return` value toward the nearest enclosing call.
/// Kept distinct from `RuntimeError` so the type system forces every call
/// site to decide whether to propagate or absorb it.
pub enum Flow {
    Normal,
    Return(Value),
}

/// Executes a whole program's top-level statements against `env` in order.
/// A `return` that escapes every statement is a runtime error (§4.3).
pub fn run(program: &[Stmt], env: &Rc<Environment>) -> Result<(), RuntimeError> {
    for stmt in program {
        match execute(stmt, env)? {
            Flow::Normal => {}
            Flow::Return(_) => {
                return Err(RuntimeError::TopLevelReturn { span: stmt.span });
            }
        }
    }
    Ok(())
}

fn execute_block(statements: &[Stmt], enclosing: &Rc<Environment>) -> Result<Flow, RuntimeError> {
    let scope = Environment::with_parent(enclosing.clone());
    execute_statements_in(statements, &scope)
}

fn execute_statements_in(statements: &[Stmt], scope: &Rc<Environment>) -> Result<Flow, RuntimeError> {
    for stmt in statements {
        match execute(stmt, scope)? {
            Flow::Normal => {}
            flow @ Flow::Return(_) => return Ok(flow),
        }
    }
    Ok(Flow::Normal)
}

fn execute(stmt: &Stmt, env: &Rc<Environment>) -> Result<Flow, RuntimeError> {
    match &stmt.kind {
        StmtKind::VarDecl {
            declared_type,
            name,
            initializer,
        } => {
            let value = evaluate(initializer, env)?;
            check_type(*declared_type, &value, initializer.span)?;
            env.declare(name, value, Some(*declared_type), stmt.span)?;
            Ok(Flow::Normal)
        }
        StmtKind::Expression(expr) => {
            evaluate(expr, env)?;
            Ok(Flow::Normal)
        }
        StmtKind::Print(expr) => {
            let value = evaluate(expr, env)?;
            println!("{value}");
            Ok(Flow::Normal)
        }
        StmtKind::Block(statements) => execute_block(statements, env),
        StmtKind::If {
            condition,
            then_block,
            elifs,
            else_block,
        } => {
            if as_bool(&evaluate(condition, env)?, condition.span)? {
                return execute_block(then_block, env);
            }
            for (elif_condition, elif_block) in elifs {
                if as_bool(&evaluate(elif_condition, env)?, elif_condition.span)? {
                    return execute_block(elif_block, env);
                }
            }
            if let Some(else_block) = else_block {
                return execute_block(else_block, env);
            }
            Ok(Flow::Normal)
        }
        StmtKind::While { condition, body } => {
            while as_bool(&evaluate(condition, env)?, condition.span)? {
                match execute_block(body, env)? {
                    Flow::Normal => {}
                    flow @ Flow::Return(_) => return Ok(flow),
                }
            }
            Ok(Flow::Normal)
        }
        StmtKind::FunctionDecl(decl) => {
            let function = Value::Function(Rc::new(UserFunction {
                decl: decl.clone(),
                closure: env.clone(),
            }));
            env.declare(&decl.name, function, Some(StaticType::Function), stmt.span)?;
            Ok(Flow::Normal)
        }
        StmtKind::Return(value) => {
            let result = match value {
                Some(expr) => evaluate(expr, env)?,
                None => Value::Unit,
            };
            Ok(Flow::Return(result))
        }
    }
}

fn evaluate(expr: &Expr, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    match &expr.kind {
        ExprKind::Literal(value) => Ok(value.clone()),
        ExprKind::Identifier(name) => env.lookup(name, expr.span),
        ExprKind::Grouping(inner) => evaluate(inner, env),
        ExprKind::Unary { op, operand } => evaluate_unary(*op, operand, env, expr.span),
        ExprKind::Binary { left, op, right } => evaluate_binary(left, *op, right, env, expr.span),
        ExprKind::Logical { left, op, right } => evaluate_logical(left, *op, right, env),
        ExprKind::Assignment { name, value } => {
            let evaluated = evaluate(value, env)?;
            env.assign(name, evaluated.clone(), expr.span)?;
            Ok(evaluated)
        }
        ExprKind::Call { callee, arguments } => evaluate_call(callee, arguments, env, expr.span),
    }
}

fn evaluate_unary(
    op: UnaryOp,
    operand: &Expr,
    env: &Rc<Environment>,
    span: crate::token::Span,
) -> Result<Value, RuntimeError> {
    let value = evaluate(operand, env)?;
    match op {
        UnaryOp::Not => match value {
            Value::Boolean(b) => Ok(Value::Boolean(!b)),
            other => Err(type_error("bool", &other, span)),
        },
        UnaryOp::Negate => match value {
            Value::Int(n) => Ok(Value::Int(-n)),
            Value::Double(n) => Ok(Value::Double(-n)),
            other => Err(type_error("int or double", &other, span)),
        },
    }
}

fn evaluate_binary(
    left: &Expr,
    op: BinaryOp,
    right: &Expr,
    env: &Rc<Environment>,
    span: crate::token::Span,
) -> Result<Value, RuntimeError> {
    let lhs = evaluate(left, env)?;
    let rhs = evaluate(right, env)?;

    match op {
        BinaryOp::Equals => return Ok(Value::Boolean(values_equal(&lhs, &rhs))),
        BinaryOp::NotEquals => return Ok(Value::Boolean(!values_equal(&lhs, &rhs))),
        _ => {}
    }

    match op {
        BinaryOp::Divide => {
            let (a, b) = as_f64_pair(&lhs, &rhs, span)?;
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero { span });
            }
            Ok(Value::Double(a / b))
        }
        BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply => {
            arithmetic(&lhs, &rhs, op, span)
        }
        BinaryOp::Greater | BinaryOp::GreaterEquals | BinaryOp::Lesser | BinaryOp::LesserEquals => {
            let (a, b) = as_f64_pair(&lhs, &rhs, span)?;
            let result = match op {
                BinaryOp::Greater => a > b,
                BinaryOp::GreaterEquals => a >= b,
                BinaryOp::Lesser => a < b,
                BinaryOp::LesserEquals => a <= b,
                _ => unreachable!(),
            };
            Ok(Value::Boolean(result))
        }
        BinaryOp::Equals | BinaryOp::NotEquals => unreachable!(),
    }
}

fn arithmetic(lhs: &Value, rhs: &Value, op: BinaryOp, span: crate::token::Span) -> Result<Value, RuntimeError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => {
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Subtract => a - b,
                BinaryOp::Multiply => a * b,
                _ => unreachable!(),
            };
            Ok(Value::Int(result))
        }
        (Value::Double(a), Value::Double(b)) => {
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Subtract => a - b,
                BinaryOp::Multiply => a * b,
                _ => unreachable!(),
            };
            Ok(Value::Double(result))
        }
        _ => Err(type_error("matching numeric operands", lhs, span)),
    }
}

fn evaluate_logical(left: &Expr, op: LogicalOp, right: &Expr, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    let lhs = evaluate(left, env)?;
    let lhs_bool = as_bool(&lhs, left.span)?;

    match op {
        LogicalOp::And if !lhs_bool => Ok(Value::Boolean(false)),
        LogicalOp::Or if lhs_bool => Ok(Value::Boolean(true)),
        _ => {
            let rhs = evaluate(right, env)?;
            as_bool(&rhs, right.span).map(Value::Boolean)
        }
    }
}

fn evaluate_call(
    callee: &Expr,
    arguments: &[Expr],
    env: &Rc<Environment>,
    span: crate::token::Span,
) -> Result<Value, RuntimeError> {
    let callee_value = evaluate(callee, env)?;
    let mut args = Vec::with_capacity(arguments.len());
    for arg in arguments {
        args.push(evaluate(arg, env)?);
    }

    match callee_value {
        Value::Function(function) => call_user_function(&function, args, span),
        Value::NativeFunction(native) => {
            if args.len() != native.arity {
                return Err(RuntimeError::ArityMismatch {
                    expected: native.arity,
                    actual: args.len(),
                    span,
                });
            }
            (native.func)(&args)
        }
        _ => Err(RuntimeError::NotCallable { span }),
    }
}

fn call_user_function(function: &Rc<UserFunction>, args: Vec<Value>, span: crate::token::Span) -> Result<Value, RuntimeError> {
    if args.len() != function.decl.params.len() {
        return Err(RuntimeError::ArityMismatch {
            expected: function.decl.params.len(),
            actual: args.len(),
            span,
        });
    }

    let call_scope = Environment::with_parent(function.closure.clone());
    for (param, arg) in function.decl.params.iter().zip(args.into_iter()) {
        check_type(param.declared_type, &arg, span)?;
        call_scope.declare(&param.name, arg, Some(param.declared_type), span)?;
    }

    match execute_statements_in(&function.decl.body, &call_scope)? {
        Flow::Return(value) => Ok(value),
        Flow::Normal => Ok(Value::Unit),
    }
}

fn check_type(declared: StaticType, value: &Value, span: crate::token::Span) -> Result<(), RuntimeError> {
    if declared == StaticType::Any || declared == value.static_type() {
        Ok(())
    } else {
        Err(RuntimeError::TypeMismatch {
            expected: declared.to_string(),
            actual: value.static_type().to_string(),
            span,
        })
    }
}

fn type_error(expected: &str, actual: &Value, span: crate::token::Span) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.static_type().to_string(),
        span,
    }
}

fn as_bool(value: &Value, span: crate::token::Span) -> Result<bool, RuntimeError> {
    match value {
        Value::Boolean(b) => Ok(*b),
        other => Err(type_error("bool", other, span)),
    }
}

fn as_f64_pair(lhs: &Value, rhs: &Value, span: crate::token::Span) -> Result<(f64, f64), RuntimeError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Ok((*a as f64, *b as f64)),
        (Value::Double(a), Value::Double(b)) => Ok((*a, *b)),
        (Value::Int(a), Value::Double(b)) => Ok((*a as f64, *b)),
        (Value::Double(a), Value::Int(b)) => Ok((*a, *b as f64)),
        _ => Err(type_error("matching numeric operands", lhs, span)),
    }
}

fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Double(a), Value::Double(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        _ => false,
    }
}
