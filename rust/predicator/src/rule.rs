use std::fmt::Display;

use crate::{Knowns, Predicate, PredicatorError, RulePattern};

/// A condition pattern guarding a body. A fact is a rule whose body is
/// [`Predicate::True`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub condition: RulePattern,
    pub body: Predicate,
}

/// A rule whose condition matched a goal, with the environment that match
/// produced. The body is meant to be resolved against `knowns`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    pub rule: Rule,
    pub knowns: Knowns,
}

impl Rule {
    pub fn new(condition: RulePattern, body: Predicate) -> Self {
        Rule { condition, body }
    }

    pub fn fact(condition: RulePattern) -> Self {
        Rule::new(condition, Predicate::True)
    }

    pub fn is_fact(&self) -> bool {
        self.body == Predicate::True
    }

    pub fn matches(
        &self,
        goal: &RulePattern,
        knowns: &Knowns,
    ) -> Result<Option<RuleMatch>, PredicatorError> {
        Ok(self
            .condition
            .match_pattern(goal, knowns)?
            .map(|knowns| RuleMatch {
                rule: self.clone(),
                knowns,
            }))
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_fact() {
            write!(f, "{}.", self.condition)
        } else {
            write!(f, "{} :- {}", self.condition, self.body)
        }
    }
}
