use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::runtime::class::{self, Class, Instance, STR_METHOD};
use crate::runtime::context::Context;
use crate::runtime::error::RuntimeError;

/// A call's local scope: name to value. Keys are unique; insertion order is
/// irrelevant.
pub type Closure = HashMap<String, Value>;

pub type ObjectRef = Rc<RefCell<Object>>;

/// Tagged runtime object.
#[derive(Debug)]
pub enum Object {
    Number(i64),
    String(String),
    Bool(bool),
    None,
    Class(Rc<Class>),
    Instance(Instance),
}

/// Possibly-empty shared handle to a runtime object.
///
/// The empty handle stands for "absent": it prints as `None` but is distinct
/// from the `None` object. Cloning a handle shares the referent; `self` is
/// passed into method calls as such a shared handle, so binding it never
/// transfers ownership of the instance.
#[derive(Debug, Clone, Default)]
pub struct Value {
    object: Option<ObjectRef>,
}

impl Value {
    /// Owning handle over a freshly allocated object.
    pub fn own(object: Object) -> Self {
        Self {
            object: Some(Rc::new(RefCell::new(object))),
        }
    }

    /// Handle sharing an already-allocated object.
    pub fn share(object: &ObjectRef) -> Self {
        Self {
            object: Some(Rc::clone(object)),
        }
    }

    /// The empty handle.
    pub fn none() -> Self {
        Self { object: None }
    }

    pub fn number(value: i64) -> Self {
        Self::own(Object::Number(value))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Self::own(Object::String(text.into()))
    }

    pub fn bool(value: bool) -> Self {
        Self::own(Object::Bool(value))
    }

    pub fn none_object() -> Self {
        Self::own(Object::None)
    }

    pub fn class(class: Rc<Class>) -> Self {
        Self::own(Object::Class(class))
    }

    pub fn instance(instance: Instance) -> Self {
        Self::own(Object::Instance(instance))
    }

    pub fn is_empty(&self) -> bool {
        self.object.is_none()
    }

    pub fn object_ref(&self) -> Option<&ObjectRef> {
        self.object.as_ref()
    }

    pub fn type_name(&self) -> &'static str {
        let Some(object) = &self.object else {
            return "absent";
        };
        match &*object.borrow() {
            Object::Number(_) => "Number",
            Object::String(_) => "String",
            Object::Bool(_) => "Bool",
            Object::None => "None",
            Object::Class(_) => "Class",
            Object::Instance(_) => "ClassInstance",
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match &*self.object.as_ref()?.borrow() {
            Object::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match &*self.object.as_ref()?.borrow() {
            Object::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match &*self.object.as_ref()?.borrow() {
            Object::String(text) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<Rc<Class>> {
        match &*self.object.as_ref()?.borrow() {
            Object::Class(class) => Some(Rc::clone(class)),
            _ => None,
        }
    }

    pub fn is_instance(&self) -> bool {
        match &self.object {
            Some(object) => matches!(&*object.borrow(), Object::Instance(_)),
            None => false,
        }
    }

    /// Coerces to a plain boolean. Total over every handle; never fails.
    pub fn is_true(&self) -> bool {
        let Some(object) = &self.object else {
            return false;
        };
        match &*object.borrow() {
            Object::Bool(value) => *value,
            Object::Number(value) => *value != 0,
            Object::String(text) => !text.is_empty(),
            Object::None | Object::Class(_) | Object::Instance(_) => false,
        }
    }
}

/// Renders `value` the way `print` shows it.
///
/// An instance whose class defines a zero-argument `__str__` is rendered
/// through that method, executed against `context`; without one, an object
/// identity token is used. The empty handle renders as `None`.
pub fn write_value(
    out: &mut String,
    value: &Value,
    context: &mut dyn Context,
) -> Result<(), RuntimeError> {
    let Some(object) = value.object_ref() else {
        out.push_str("None");
        return Ok(());
    };
    {
        let borrowed = object.borrow();
        match &*borrowed {
            Object::Number(number) => {
                out.push_str(&number.to_string());
                return Ok(());
            }
            Object::String(text) => {
                out.push_str(text);
                return Ok(());
            }
            Object::Bool(value) => {
                out.push_str(if *value { "True" } else { "False" });
                return Ok(());
            }
            Object::None => {
                out.push_str("None");
                return Ok(());
            }
            Object::Class(class) => {
                out.push_str("Class ");
                out.push_str(class.name());
                return Ok(());
            }
            Object::Instance(instance) => {
                if !instance.has_method(STR_METHOD, 0) {
                    out.push_str(&format!("<{} object>", instance.class().name()));
                    return Ok(());
                }
            }
        }
    }
    // The borrow is released before dispatch: `__str__` may touch the
    // instance again.
    let rendered = class::call_method(value, STR_METHOD, Vec::new(), context)?;
    write_value(out, &rendered, context)
}
