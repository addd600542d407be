//! Tree-walking evaluator.
//!
//! Statements execute against a closure (the call's local scope) and a
//! `Context` carrying the output stream. Scoping is flat per call: a method
//! call gets a fresh closure holding `self` and its formal parameters, and
//! free-variable lookup never walks outer scopes. `return` travels through
//! the error channel of `exec` and is caught at `MethodBody` nodes and at
//! the method-call boundary.

mod exec;

pub(crate) use exec::execute_method_body;

use crate::ast::Statement;
use crate::runtime::context::{Context, SimpleContext};
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Closure;

pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Runs top-level statements in a fresh closure and returns everything
    /// the program printed.
    pub fn run(&self, program: &[Statement]) -> Result<String, RuntimeError> {
        let mut context = SimpleContext::new();
        self.run_with_context(program, &mut context)?;
        Ok(context.into_output())
    }

    /// Runs top-level statements against a caller-provided context.
    pub fn run_with_context(
        &self,
        program: &[Statement],
        context: &mut dyn Context,
    ) -> Result<(), RuntimeError> {
        let mut closure = Closure::new();
        for statement in program {
            exec::exec_statement(statement, &mut closure, context)
                .map_err(exec::Unwind::into_runtime_error)?;
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
