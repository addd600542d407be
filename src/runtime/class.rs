use std::rc::Rc;

use crate::ast::Statement;
use crate::interpreter::execute_method_body;
use crate::runtime::context::Context;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::{Closure, Object, Value};

pub const INIT_METHOD: &str = "__init__";
pub const STR_METHOD: &str = "__str__";
pub const ADD_METHOD: &str = "__add__";
pub const EQ_METHOD: &str = "__eq__";
pub const LT_METHOD: &str = "__lt__";

/// A named callable owned by a class, invoked with an implicit `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub formal_params: Vec<String>,
    pub body: Rc<Statement>,
}

impl Method {
    pub fn new(name: impl Into<String>, formal_params: Vec<String>, body: Statement) -> Self {
        Self {
            name: name.into(),
            formal_params,
            body: Rc::new(body),
        }
    }
}

/// Class descriptor: name, method table, optional parent (single
/// inheritance). Descriptors are shared via `Rc` and outlive every instance
/// that references them.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    name: String,
    methods: Vec<Method>,
    parent: Option<Rc<Class>>,
}

impl Class {
    pub fn new(name: impl Into<String>, methods: Vec<Method>, parent: Option<Rc<Class>>) -> Self {
        Self {
            name: name.into(),
            methods,
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up `name` along the parent chain; the nearest match wins.
    pub fn method(&self, name: &str) -> Option<&Method> {
        let mut current = Some(self);
        while let Some(class) = current {
            if let Some(method) = class.methods.iter().find(|method| method.name == name) {
                return Some(method);
            }
            current = class.parent.as_deref();
        }
        None
    }
}

/// A class instance: class reference plus mutable field map.
#[derive(Debug)]
pub struct Instance {
    class: Rc<Class>,
    fields: Closure,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: Closure::new(),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn fields(&self) -> &Closure {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Closure {
        &mut self.fields
    }

    /// True when the class chain declares `method` with exactly
    /// `argument_count` formal parameters.
    pub fn has_method(&self, method: &str, argument_count: usize) -> bool {
        self.class
            .method(method)
            .is_some_and(|found| found.formal_params.len() == argument_count)
    }
}

/// Calls `method` on `instance` with `actual_args`.
///
/// The call closure binds `self` to a handle sharing the instance and the
/// formal parameters positionally. A `return` unwinding out of the body is
/// absorbed here as the call's value.
pub fn call_method(
    instance: &Value,
    method: &str,
    actual_args: Vec<Value>,
    context: &mut dyn Context,
) -> Result<Value, RuntimeError> {
    let type_name = instance.type_name();
    let Some(object) = instance.object_ref() else {
        return Err(RuntimeError::NotAnInstance { type_name });
    };
    let declaration = {
        let borrowed = object.borrow();
        let Object::Instance(target) = &*borrowed else {
            return Err(RuntimeError::NotAnInstance { type_name });
        };
        let Some(found) = target.class().method(method) else {
            return Err(RuntimeError::NoSuchMethod {
                method: method.to_string(),
            });
        };
        if found.formal_params.len() != actual_args.len() {
            return Err(RuntimeError::NoSuchMethod {
                method: method.to_string(),
            });
        }
        found.clone()
    };

    let mut closure = Closure::new();
    closure.insert("self".to_string(), Value::share(object));
    for (param, value) in declaration.formal_params.iter().zip(actual_args) {
        closure.insert(param.clone(), value);
    }
    execute_method_body(&declaration.body, &mut closure, context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Statement};
    use crate::runtime::context::SimpleContext;

    fn method(name: &str, params: &[&str], body: Statement) -> Method {
        Method::new(
            name,
            params.iter().map(|p| p.to_string()).collect(),
            Statement::MethodBody(Box::new(body)),
        )
    }

    fn return_number(value: i64) -> Statement {
        Statement::Return(Expression::Number(value))
    }

    #[test]
    fn method_lookup_walks_parent_chain() {
        let base = Rc::new(Class::new(
            "Base",
            vec![
                method("f", &["x"], return_number(1)),
                method("g", &[], return_number(2)),
            ],
            None,
        ));
        let derived = Class::new(
            "Derived",
            vec![method("f", &[], return_number(3))],
            Some(Rc::clone(&base)),
        );

        // The override in Derived wins over Base's f.
        assert_eq!(derived.method("f").map(|m| m.formal_params.len()), Some(0));
        assert!(derived.method("g").is_some());
        assert!(derived.method("missing").is_none());
    }

    #[test]
    fn has_method_requires_matching_arity() {
        let class = Rc::new(Class::new(
            "P",
            vec![method("f", &["a", "b"], return_number(0))],
            None,
        ));
        let instance = Instance::new(class);
        assert!(instance.has_method("f", 2));
        assert!(!instance.has_method("f", 1));
        assert!(!instance.has_method("missing", 0));
    }

    #[test]
    fn call_binds_self_and_parameters() {
        // def pick(self, a, b): return b
        let class = Rc::new(Class::new(
            "P",
            vec![method(
                "pick",
                &["a", "b"],
                Statement::Return(Expression::Variable(vec!["b".to_string()])),
            )],
            None,
        ));
        let instance = Value::instance(Instance::new(class));
        let mut context = SimpleContext::new();
        let result = call_method(
            &instance,
            "pick",
            vec![Value::number(1), Value::number(2)],
            &mut context,
        )
        .expect("call should succeed");
        assert_eq!(result.as_number(), Some(2));
    }

    #[test]
    fn call_rejects_missing_method_and_wrong_arity() {
        let class = Rc::new(Class::new("P", vec![method("f", &[], return_number(0))], None));
        let instance = Value::instance(Instance::new(class));
        let mut context = SimpleContext::new();

        let err = call_method(&instance, "missing", Vec::new(), &mut context)
            .expect_err("expected missing method failure");
        assert_eq!(
            err,
            RuntimeError::NoSuchMethod {
                method: "missing".to_string()
            }
        );

        let err = call_method(&instance, "f", vec![Value::number(1)], &mut context)
            .expect_err("expected arity failure");
        assert_eq!(
            err,
            RuntimeError::NoSuchMethod {
                method: "f".to_string()
            }
        );
    }

    #[test]
    fn call_rejects_non_instances() {
        let mut context = SimpleContext::new();
        let err = call_method(&Value::number(1), "f", Vec::new(), &mut context)
            .expect_err("expected non-instance failure");
        assert_eq!(err, RuntimeError::NotAnInstance { type_name: "Number" });
    }
}
