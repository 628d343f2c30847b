//! The predicate algebra.
//!
//! A [`Predicate`] maps an environment to a lazy, possibly infinite stream
//! of environments, one per way the predicate can be satisfied. Each
//! combinator lives in its own module.

mod application;
mod call;
mod conjunction;
mod custom;
mod disjunction;
mod negation;

pub use custom::*;

use std::{fmt::Display, sync::Arc};

use crate::{Knowns, Phrase, RulePattern, RuleSelector, Solutions, no_solutions, one_solution};

/// A resolvable goal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Predicate {
    /// Succeeds once with the environment unchanged.
    #[default]
    True,
    /// Never succeeds.
    False,
    /// Every solution of the right side under every solution of the left.
    And(Arc<Predicate>, Arc<Predicate>),
    /// The solutions of both sides, interleaved.
    Or(Arc<Predicate>, Arc<Predicate>),
    /// Negation as failure.
    Not(Arc<Predicate>),
    /// Resolves every selected rule whose condition matches the pattern.
    Apply(RulePattern),
    /// Expands the phrase in the current environment and applies it.
    Call(Phrase),
    /// A goal implemented by the host.
    Custom(Custom),
}

impl Predicate {
    pub fn apply(pattern: RulePattern) -> Self {
        Predicate::Apply(pattern)
    }

    pub fn call(phrase: Phrase) -> Self {
        Predicate::Call(phrase)
    }

    pub fn custom(custom: Custom) -> Self {
        Predicate::Custom(custom)
    }

    pub fn and(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::True, other) => other,
            (this, Predicate::True) => this,
            (Predicate::False, _) => Predicate::False,
            (this, other) => Predicate::And(Arc::new(this), Arc::new(other)),
        }
    }

    pub fn or(self, other: Predicate) -> Self {
        match (self, other) {
            (Predicate::False, other) => other,
            (this, Predicate::False) => this,
            (this, other) => Predicate::Or(Arc::new(this), Arc::new(other)),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Predicate::True => Predicate::False,
            Predicate::False => Predicate::True,
            this => Predicate::Not(Arc::new(this)),
        }
    }

    /// Conjunction of all `predicates`, in order.
    pub fn all<I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        predicates
            .into_iter()
            .fold(Predicate::True, |all, predicate| all.and(predicate))
    }

    /// Disjunction of all `predicates`.
    pub fn any<I>(predicates: I) -> Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        predicates
            .into_iter()
            .fold(Predicate::False, |any, predicate| any.or(predicate))
    }

    /// Lazily enumerates the environments under which this predicate holds,
    /// selecting rules from `selector`.
    ///
    /// Nothing is computed until the returned stream is polled, and dropping
    /// it abandons the remaining search.
    pub fn resolve<S>(&self, knowns: &Knowns, selector: S) -> Solutions
    where
        S: RuleSelector + Clone + 'static,
    {
        match self {
            Predicate::True => one_solution(knowns.clone()),
            Predicate::False => no_solutions(),
            Predicate::And(left, right) => {
                conjunction::resolve(left.clone(), right.clone(), knowns, selector)
            }
            Predicate::Or(left, right) => {
                disjunction::resolve(left.clone(), right.clone(), knowns, selector)
            }
            Predicate::Not(inner) => negation::resolve(inner.clone(), knowns, selector),
            Predicate::Apply(pattern) => application::resolve(pattern.clone(), knowns, selector),
            Predicate::Call(phrase) => call::resolve(phrase, knowns, selector),
            Predicate::Custom(custom) => custom.evaluate(knowns.clone()),
        }
    }
}

impl From<RulePattern> for Predicate {
    fn from(value: RulePattern) -> Self {
        Predicate::Apply(value)
    }
}

impl From<Phrase> for Predicate {
    fn from(value: Phrase) -> Self {
        Predicate::Call(value)
    }
}

impl From<Custom> for Predicate {
    fn from(value: Custom) -> Self {
        Predicate::Custom(value)
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::True => write!(f, "."),
            Predicate::False => write!(f, "\\+."),
            Predicate::And(left, right) => write!(f, "{left}, {right}"),
            Predicate::Or(left, right) => write!(f, "{left}; {right}"),
            Predicate::Not(inner) => write!(f, "\\+ {inner}"),
            Predicate::Apply(pattern) => write!(f, "{pattern}"),
            Predicate::Call(phrase) => write!(f, "{phrase}"),
            Predicate::Custom(custom) => write!(f, "{}", custom.name()),
        }
    }
}
