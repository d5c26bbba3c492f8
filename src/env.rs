// ABOUTME: Lexical scope chain mapping names to declared-type/value bindings

use crate::ast::StaticType;
use crate::error::RuntimeError;
use crate::token::Span;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

struct Binding {
    declared_type: StaticType,
    value: Value,
}

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Binding>>,
    parent: Option<Rc<Environment>>,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("declared_type", &self.declared_type)
            .field("value", &self.value)
            .finish()
    }
}

impl Environment {
    /// Creates a new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment whose enclosing scope is `parent`.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Declares `name` in THIS scope. Fails if `name` already exists here;
    /// shadowing an enclosing scope's binding is fine.
    pub fn declare(
        &self,
        name: &str,
        value: Value,
        declared_type: Option<StaticType>,
        span: Span,
    ) -> Result<(), RuntimeError> {
        if self.bindings.borrow().contains_key(name) {
            return Err(RuntimeError::AlreadyDeclared {
                name: name.to_string(),
                span,
            });
        }
        let resolved_type = declared_type.unwrap_or_else(|| value.static_type());
        self.bindings.borrow_mut().insert(
            name.to_string(),
            Binding {
                declared_type: resolved_type,
                value,
            },
        );
        Ok(())
    }

    /// Resolves `name` through this scope and its ancestors, innermost first.
    pub fn lookup(&self, name: &str, span: Span) -> Result<Value, RuntimeError> {
        if let Some(binding) = self.bindings.borrow().get(name) {
            return Ok(binding.value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.lookup(name, span);
        }
        Err(RuntimeError::UndefinedVariable {
            name: name.to_string(),
            span,
        })
    }

    /// Assigns `value` to the nearest existing binding of `name`, enforcing
    /// that its runtime type matches the binding's declared type.
    pub fn assign(&self, name: &str, value: Value, span: Span) -> Result<(), RuntimeError> {
        let mut bindings = self.bindings.borrow_mut();
        if let Some(binding) = bindings.get_mut(name) {
            if binding.declared_type != StaticType::Any && binding.declared_type != value.static_type() {
                return Err(RuntimeError::TypeMismatch {
                    expected: binding.declared_type.to_string(),
                    actual: value.static_type().to_string(),
                    span,
                });
            }
            binding.value = value;
            return Ok(());
        }
        drop(bindings);
        if let Some(parent) = &self.parent {
            return parent.assign(name, value, span);
        }
        Err(RuntimeError::UndefinedVariable {
            name: name.to_string(),
            span,
        })
    }

    /// Snapshot of this scope's own bindings (not its ancestors'), for
    /// the CLI's final-environment dump. Sorted by name so output is
    /// stable across `HashMap` iteration order.
    pub fn local_bindings(&self) -> Vec<(String, StaticType, Value)> {
        let mut entries: Vec<_> = self
            .bindings
            .borrow()
            .iter()
            .map(|(name, binding)| (name.clone(), binding.declared_type, binding.value.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}
