use std::rc::Rc;

use crate::ast::{ArithmeticOp, Expression, Statement};
use crate::runtime::class::{self, ADD_METHOD, INIT_METHOD, Instance};
use crate::runtime::compare;
use crate::runtime::context::{Context, DummyContext};
use crate::runtime::error::RuntimeError;
use crate::runtime::value::{self, Closure, Object, Value};

/// Non-local exits of statement execution: a `return` in flight, or a
/// runtime failure.
pub(crate) enum Unwind {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

impl Unwind {
    /// Collapses the signal at the top level, where an uncaught `return` is
    /// a runtime failure.
    pub(crate) fn into_runtime_error(self) -> RuntimeError {
        match self {
            Unwind::Return(_) => RuntimeError::ReturnOutsideMethod,
            Unwind::Error(error) => error,
        }
    }
}

/// Runs a method body against its call closure.
///
/// A `return` that unwinds all the way here (a body not wrapped in
/// `MethodBody`) is still absorbed as the call's value: the method boundary
/// is the outermost catch.
pub(crate) fn execute_method_body(
    body: &Statement,
    closure: &mut Closure,
    context: &mut dyn Context,
) -> Result<Value, RuntimeError> {
    match exec_statement(body, closure, context) {
        Ok(result) => Ok(result),
        Err(Unwind::Return(result)) => Ok(result),
        Err(Unwind::Error(error)) => Err(error),
    }
}

pub(crate) fn exec_statement(
    statement: &Statement,
    closure: &mut Closure,
    context: &mut dyn Context,
) -> Result<Value, Unwind> {
    match statement {
        Statement::Assignment { name, value } => {
            let value = eval_expression(value, closure, context)?;
            closure.insert(name.clone(), value.clone());
            Ok(value)
        }
        Statement::FieldAssignment {
            object,
            field,
            value,
        } => {
            let target = resolve_dotted(object, closure)?;
            let value = eval_expression(value, closure, context)?;
            write_field(&target, field, value.clone())?;
            Ok(value)
        }
        Statement::Print(args) => {
            // The whole line is rendered before anything reaches the output,
            // so a failing argument leaves no partial line behind. Nested
            // `__str__` calls run against a sink context.
            let mut line = String::new();
            let mut nested = DummyContext::new();
            for (index, arg) in args.iter().enumerate() {
                let value = eval_expression(arg, closure, context)?;
                if index > 0 {
                    line.push(' ');
                }
                value::write_value(&mut line, &value, &mut nested)?;
            }
            line.push('\n');
            context.output().push_str(&line);
            Ok(Value::none())
        }
        Statement::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            let condition = eval_expression(condition, closure, context)?;
            if condition.is_true() {
                exec_statement(then_body, closure, context)
            } else if let Some(else_body) = else_body {
                exec_statement(else_body, closure, context)
            } else {
                Ok(Value::none())
            }
        }
        Statement::Return(value) => {
            let value = eval_expression(value, closure, context)?;
            Err(Unwind::Return(value))
        }
        Statement::Compound(statements) => {
            for statement in statements {
                exec_statement(statement, closure, context)?;
            }
            Ok(Value::none())
        }
        Statement::ClassDefinition(class) => {
            closure.insert(class.name().to_string(), Value::class(Rc::clone(class)));
            Ok(Value::none())
        }
        Statement::MethodBody(body) => match exec_statement(body, closure, context) {
            Ok(_) => Ok(Value::none()),
            Err(Unwind::Return(result)) => Ok(result),
            Err(error) => Err(error),
        },
        Statement::Expr(expression) => Ok(eval_expression(expression, closure, context)?),
    }
}

pub(crate) fn eval_expression(
    expression: &Expression,
    closure: &mut Closure,
    context: &mut dyn Context,
) -> Result<Value, RuntimeError> {
    match expression {
        Expression::Number(value) => Ok(Value::number(*value)),
        Expression::String(text) => Ok(Value::string(text.clone())),
        Expression::Bool(value) => Ok(Value::bool(*value)),
        Expression::None => Ok(Value::none_object()),
        Expression::Variable(dotted) => resolve_dotted(dotted, closure),
        Expression::MethodCall {
            object,
            method,
            args,
        } => {
            let target = eval_expression(object, closure, context)?;
            if !has_matching_method(&target, method, args.len()) {
                return Err(RuntimeError::MethodCallError {
                    method: method.clone(),
                });
            }
            let mut actual_args = Vec::with_capacity(args.len());
            for arg in args {
                actual_args.push(eval_expression(arg, closure, context)?);
            }
            class::call_method(&target, method, actual_args, context)
        }
        Expression::NewInstance { class, args } => {
            let instance = Value::instance(Instance::new(Rc::clone(class)));
            // Arguments are evaluated only when a matching constructor runs.
            let has_init = class
                .method(INIT_METHOD)
                .is_some_and(|init| init.formal_params.len() == args.len());
            if has_init {
                let mut actual_args = Vec::with_capacity(args.len());
                for arg in args {
                    actual_args.push(eval_expression(arg, closure, context)?);
                }
                class::call_method(&instance, INIT_METHOD, actual_args, context)?;
            }
            Ok(instance)
        }
        Expression::Stringify(argument) => {
            let value = eval_expression(argument, closure, context)?;
            let mut rendered = String::new();
            value::write_value(&mut rendered, &value, context)?;
            Ok(Value::string(rendered))
        }
        Expression::Arithmetic { op, lhs, rhs } => {
            let lhs = eval_expression(lhs, closure, context)?;
            let rhs = eval_expression(rhs, closure, context)?;
            apply_arithmetic(*op, lhs, rhs, context)
        }
        Expression::Comparison { op, lhs, rhs } => {
            let lhs = eval_expression(lhs, closure, context)?;
            let rhs = eval_expression(rhs, closure, context)?;
            Ok(Value::bool(compare::compare(*op, &lhs, &rhs, context)?))
        }
        Expression::And(lhs, rhs) => {
            // Both operands are evaluated; `and` does not short-circuit.
            let lhs = eval_expression(lhs, closure, context)?;
            let rhs = eval_expression(rhs, closure, context)?;
            Ok(Value::bool(lhs.is_true() && rhs.is_true()))
        }
        Expression::Or(lhs, rhs) => {
            // Both operands are evaluated; `or` does not short-circuit.
            let lhs = eval_expression(lhs, closure, context)?;
            let rhs = eval_expression(rhs, closure, context)?;
            Ok(Value::bool(lhs.is_true() || rhs.is_true()))
        }
        Expression::Not(argument) => {
            let value = eval_expression(argument, closure, context)?;
            Ok(Value::bool(!value.is_true()))
        }
    }
}

/// Resolves a dotted identifier chain against the closure.
///
/// A single name must exist in the closure. Longer chains walk instance
/// fields; a missing field reads as the empty handle.
fn resolve_dotted(dotted: &[String], closure: &Closure) -> Result<Value, RuntimeError> {
    let Some((first, rest)) = dotted.split_first() else {
        return Err(RuntimeError::VariableNotFound {
            name: String::new(),
        });
    };
    let mut current = closure
        .get(first)
        .cloned()
        .ok_or_else(|| RuntimeError::VariableNotFound {
            name: first.clone(),
        })?;
    for segment in rest {
        current = read_field(&current, segment)?;
    }
    Ok(current)
}

fn read_field(target: &Value, field: &str) -> Result<Value, RuntimeError> {
    let type_name = target.type_name();
    let Some(object) = target.object_ref() else {
        return Err(RuntimeError::NotAnInstance { type_name });
    };
    match &*object.borrow() {
        Object::Instance(instance) => {
            Ok(instance.fields().get(field).cloned().unwrap_or_default())
        }
        _ => Err(RuntimeError::NotAnInstance { type_name }),
    }
}

fn write_field(target: &Value, field: &str, value: Value) -> Result<(), RuntimeError> {
    let type_name = target.type_name();
    let Some(object) = target.object_ref() else {
        return Err(RuntimeError::NotAnInstance { type_name });
    };
    match &mut *object.borrow_mut() {
        Object::Instance(instance) => {
            instance.fields_mut().insert(field.to_string(), value);
            Ok(())
        }
        _ => Err(RuntimeError::NotAnInstance { type_name }),
    }
}

fn has_matching_method(target: &Value, method: &str, argument_count: usize) -> bool {
    let Some(object) = target.object_ref() else {
        return false;
    };
    match &*object.borrow() {
        Object::Instance(instance) => instance.has_method(method, argument_count),
        _ => false,
    }
}

fn apply_arithmetic(
    op: ArithmeticOp,
    lhs: Value,
    rhs: Value,
    context: &mut dyn Context,
) -> Result<Value, RuntimeError> {
    match op {
        ArithmeticOp::Add => add_values(lhs, rhs, context),
        ArithmeticOp::Sub => numeric_op("Sub", &lhs, &rhs, |a, b| Ok(a - b)),
        ArithmeticOp::Mult => numeric_op("Mult", &lhs, &rhs, |a, b| Ok(a * b)),
        ArithmeticOp::Div => numeric_op("Div", &lhs, &rhs, |a, b| {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Ok(a / b)
        }),
    }
}

fn numeric_op(
    operation: &'static str,
    lhs: &Value,
    rhs: &Value,
    apply: impl Fn(i64, i64) -> Result<i64, RuntimeError>,
) -> Result<Value, RuntimeError> {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => Ok(Value::number(apply(a, b)?)),
        _ => Err(RuntimeError::NumbersOnly { operation }),
    }
}

/// Addition: numbers add, strings concatenate, and an instance on the left
/// dispatches `__add__` with the right operand.
fn add_values(lhs: Value, rhs: Value, context: &mut dyn Context) -> Result<Value, RuntimeError> {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(Value::number(a + b));
    }
    if let (Some(a), Some(b)) = (lhs.as_string(), rhs.as_string()) {
        return Ok(Value::string(a + &b));
    }
    if lhs.is_instance() {
        return class::call_method(&lhs, ADD_METHOD, vec![rhs], context);
    }
    Err(RuntimeError::AdditionNotSupported)
}
