use std::{fmt::Display, sync::Arc};

use tracing::trace;

use crate::{Knowns, PlainTerm, Predicate, PredicatorError, Rule};

/// An ordered sequence of plain terms: the condition of a rule, or the
/// goal it is selected for.
#[derive(Debug, Clone, PartialEq)]
pub struct RulePattern(Arc<[PlainTerm]>);

impl RulePattern {
    pub fn new<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<PlainTerm>,
    {
        RulePattern(terms.into_iter().map(Into::into).collect())
    }

    pub fn terms(&self) -> &[PlainTerm] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Matches this pattern, as a rule condition, against `candidate`.
    ///
    /// Patterns of different length never match. Otherwise terms are matched
    /// pairwise from left to right in a fresh matching attempt, stopping at
    /// the first pair that does not unify.
    pub fn match_pattern(
        &self,
        candidate: &RulePattern,
        knowns: &Knowns,
    ) -> Result<Option<Knowns>, PredicatorError> {
        if self.len() != candidate.len() {
            return Ok(None);
        }

        let mut knowns = knowns.start_matching();
        for (term, other) in self.terms().iter().zip(candidate.terms()) {
            let Some(next) = term.match_term(other, &knowns)? else {
                trace!("{term} does not match {other}");
                return Ok(None);
            };
            knowns = next;
        }

        Ok(Some(knowns))
    }

    /// A rule guarded by this pattern.
    pub fn rule(&self, body: Predicate) -> Rule {
        Rule::new(self.clone(), body)
    }

    pub fn fact(&self) -> Rule {
        Rule::fact(self.clone())
    }
}

impl From<Vec<PlainTerm>> for RulePattern {
    fn from(value: Vec<PlainTerm>) -> Self {
        RulePattern(value.into())
    }
}

impl<T> FromIterator<T> for RulePattern
where
    T: Into<PlainTerm>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        RulePattern::new(iter)
    }
}

impl Display for RulePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, term) in self.terms().iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}
