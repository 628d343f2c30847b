use std::{
    any::Any,
    fmt::{Debug, Display},
    sync::Arc,
};

use crate::{ConditionalSend, ConditionalSync, PredicatorError};

/// A host value embedded in a [`Value`] term.
///
/// Comparison may fail, in which case the resolution branch that attempted
/// it terminates with the error.
pub trait Payload: Debug + ConditionalSend + ConditionalSync + 'static {
    /// The payload as [`Any`], used for downcasting.
    fn as_any(&self) -> &dyn Any;

    fn equals(&self, other: &dyn Payload) -> Result<bool, PredicatorError>;
}

struct Raw<T>(T);

impl<T> Debug for Raw<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> Payload for Raw<T>
where
    T: PartialEq + Debug + ConditionalSend + ConditionalSync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn equals(&self, other: &dyn Payload) -> Result<bool, PredicatorError> {
        Ok(other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == &self.0))
    }
}

/// A resolved opaque value. Equality is delegated to the payload.
#[derive(Clone)]
pub struct Value(Arc<dyn Payload>);

impl Value {
    /// Wraps a plain Rust value, compared with its own `PartialEq`.
    pub fn new<T>(value: T) -> Self
    where
        T: PartialEq + Debug + ConditionalSend + ConditionalSync + 'static,
    {
        Value(Arc::new(Raw(value)))
    }

    /// Wraps a payload with its own (possibly failing) comparison.
    pub fn custom<P: Payload>(payload: P) -> Self {
        Value(Arc::new(payload))
    }

    pub fn payload(&self) -> &dyn Payload {
        &*self.0
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn matches(&self, other: &Value) -> Result<bool, PredicatorError> {
        if Arc::ptr_eq(&self.0, &other.0) {
            return Ok(true);
        }
        self.0.equals(&*other.0)
    }
}

/// Structural equality for hosts and tests.
///
/// A payload whose comparison fails is reported as unequal here. Matching
/// never goes through `==`; it calls [`Value::matches`], which surfaces the
/// failure as an error.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other).unwrap_or(false)
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Value").field(&self.0).finish()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}]", self.0)
    }
}
