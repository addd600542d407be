use crate::runtime::class::{self, EQ_METHOD, LT_METHOD};
use crate::runtime::context::Context;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::{Object, Value};

/// The six comparison operators of the language.
///
/// `Equal` and `Less` are primitive; the rest derive from them, so a
/// user-defined `__lt__`/`__eq__` pair drives all six on instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

pub fn compare(
    comparator: Comparator,
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn Context,
) -> Result<bool, RuntimeError> {
    match comparator {
        Comparator::Equal => equal(lhs, rhs, context),
        Comparator::NotEqual => not_equal(lhs, rhs, context),
        Comparator::Less => less(lhs, rhs, context),
        Comparator::LessOrEqual => less_or_equal(lhs, rhs, context),
        Comparator::Greater => greater(lhs, rhs, context),
        Comparator::GreaterOrEqual => greater_or_equal(lhs, rhs, context),
    }
}

/// Equality. Bool/Number/String compare naturally; instances dispatch
/// `__eq__`; two empty handles are equal. Everything else fails.
pub fn equal(lhs: &Value, rhs: &Value, context: &mut dyn Context) -> Result<bool, RuntimeError> {
    let (Some(left), Some(right)) = (lhs.object_ref(), rhs.object_ref()) else {
        if lhs.is_empty() && rhs.is_empty() {
            return Ok(true);
        }
        return Err(RuntimeError::IncomparableTypes);
    };
    {
        let (left, right) = (left.borrow(), right.borrow());
        match (&*left, &*right) {
            (Object::Bool(a), Object::Bool(b)) => return Ok(a == b),
            (Object::Number(a), Object::Number(b)) => return Ok(a == b),
            (Object::String(a), Object::String(b)) => return Ok(a == b),
            (Object::Instance(_), Object::Instance(_)) => {}
            _ => return Err(RuntimeError::IncomparableTypes),
        }
    }
    let verdict = class::call_method(lhs, EQ_METHOD, vec![rhs.clone()], context)?;
    require_bool(EQ_METHOD, &verdict)
}

/// Strict ordering. Bool orders `False < True`; Number and String order
/// naturally; instances dispatch `__lt__`. Empty handles cannot be ordered.
pub fn less(lhs: &Value, rhs: &Value, context: &mut dyn Context) -> Result<bool, RuntimeError> {
    let (Some(left), Some(right)) = (lhs.object_ref(), rhs.object_ref()) else {
        return Err(RuntimeError::IncomparableTypes);
    };
    {
        let (left, right) = (left.borrow(), right.borrow());
        match (&*left, &*right) {
            (Object::Bool(a), Object::Bool(b)) => return Ok(a < b),
            (Object::Number(a), Object::Number(b)) => return Ok(a < b),
            (Object::String(a), Object::String(b)) => return Ok(a < b),
            (Object::Instance(_), Object::Instance(_)) => {}
            _ => return Err(RuntimeError::IncomparableTypes),
        }
    }
    let verdict = class::call_method(lhs, LT_METHOD, vec![rhs.clone()], context)?;
    require_bool(LT_METHOD, &verdict)
}

pub fn not_equal(lhs: &Value, rhs: &Value, context: &mut dyn Context) -> Result<bool, RuntimeError> {
    Ok(!equal(lhs, rhs, context)?)
}

pub fn greater(lhs: &Value, rhs: &Value, context: &mut dyn Context) -> Result<bool, RuntimeError> {
    Ok(!(less(lhs, rhs, context)? || equal(lhs, rhs, context)?))
}

pub fn less_or_equal(
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn Context,
) -> Result<bool, RuntimeError> {
    Ok(!greater(lhs, rhs, context)?)
}

pub fn greater_or_equal(
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn Context,
) -> Result<bool, RuntimeError> {
    Ok(!less(lhs, rhs, context)?)
}

fn require_bool(method: &str, verdict: &Value) -> Result<bool, RuntimeError> {
    verdict.as_bool().ok_or_else(|| RuntimeError::ComparisonNotBool {
        method: method.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::context::SimpleContext;

    fn check(comparator: Comparator, lhs: &Value, rhs: &Value) -> Result<bool, RuntimeError> {
        let mut context = SimpleContext::new();
        compare(comparator, lhs, rhs, &mut context)
    }

    #[test]
    fn numbers_compare_naturally() {
        let (one, two) = (Value::number(1), Value::number(2));
        assert_eq!(check(Comparator::Less, &one, &two), Ok(true));
        assert_eq!(check(Comparator::Equal, &one, &one), Ok(true));
        assert_eq!(check(Comparator::NotEqual, &one, &two), Ok(true));
        assert_eq!(check(Comparator::Greater, &two, &one), Ok(true));
        assert_eq!(check(Comparator::LessOrEqual, &one, &one), Ok(true));
        assert_eq!(check(Comparator::GreaterOrEqual, &one, &two), Ok(false));
    }

    #[test]
    fn strings_and_bools_compare_naturally() {
        assert_eq!(
            check(Comparator::Less, &Value::string("abc"), &Value::string("abd")),
            Ok(true)
        );
        assert_eq!(
            check(Comparator::Equal, &Value::string("a"), &Value::string("a")),
            Ok(true)
        );
        // False orders before True.
        assert_eq!(
            check(Comparator::Less, &Value::bool(false), &Value::bool(true)),
            Ok(true)
        );
    }

    #[test]
    fn empty_handles_are_equal_but_unordered() {
        assert_eq!(check(Comparator::Equal, &Value::none(), &Value::none()), Ok(true));
        assert_eq!(
            check(Comparator::Less, &Value::none(), &Value::none()),
            Err(RuntimeError::IncomparableTypes)
        );
    }

    #[test]
    fn mixed_types_fail_to_compare() {
        let err = check(Comparator::Equal, &Value::number(1), &Value::string("1"))
            .expect_err("expected comparison failure");
        assert_eq!(err, RuntimeError::IncomparableTypes);
        assert_eq!(err.to_string(), "different types compared");

        assert_eq!(
            check(Comparator::Equal, &Value::number(1), &Value::none()),
            Err(RuntimeError::IncomparableTypes)
        );
    }

    #[test]
    fn derived_operators_stay_consistent() {
        let samples = [
            (Value::number(-2), Value::number(5)),
            (Value::number(5), Value::number(5)),
            (Value::number(7), Value::number(5)),
        ];
        for (lhs, rhs) in &samples {
            let equal = check(Comparator::Equal, lhs, rhs).expect("equal");
            let less = check(Comparator::Less, lhs, rhs).expect("less");
            let greater = check(Comparator::Greater, lhs, rhs).expect("greater");
            assert_eq!(check(Comparator::NotEqual, lhs, rhs), Ok(!equal));
            assert_eq!(greater, !(less || equal));
            assert!(!(less && greater));
            assert_eq!(check(Comparator::LessOrEqual, lhs, rhs), Ok(!greater));
            assert_eq!(check(Comparator::GreaterOrEqual, lhs, rhs), Ok(!less));
        }
    }
}
