use std::{fmt::Display, sync::Arc};

use crate::{Knowns, PlainTerm, Predicate, PredicatorError, RulePattern, Term, TermExpansion};

/// Prefix of the temporaries standing for nested phrases.
pub const PHRASE_PREFIX: &str = "phrase";

/// A compound term: an ordered sequence of terms, possibly nested.
///
/// Phrases never match anything themselves. Before a phrase takes part in
/// matching it is expanded into plain terms, with every nested phrase
/// replaced by a temporary whose value is computed by a definition sub-goal
/// `[temporary, :=, element...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase(Arc<[Term]>);

impl Phrase {
    pub fn new<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        Phrase(terms.into_iter().map(Into::into).collect())
    }

    pub fn terms(&self) -> &[Term] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expands every element of this phrase, left to right.
    pub fn expand(&self, knowns: &Knowns) -> Result<PhraseExpansion, PredicatorError> {
        let mut knowns = knowns.clone();
        let mut prelude = Predicate::True;
        let mut terms = Vec::with_capacity(self.len());

        for term in self.terms() {
            let TermExpansion {
                term,
                knowns: expanded,
                prelude: update,
            } = term.expand(&knowns)?;

            prelude = prelude.and(update);
            knowns = expanded;
            terms.push(term);
        }

        Ok(PhraseExpansion {
            terms,
            prelude,
            knowns,
        })
    }

    /// Expands this phrase where it occurs as an element of an enclosing
    /// term sequence: the phrase is replaced by a fresh temporary, defined by
    /// a sub-goal that runs after the sub-goals of the phrase's own elements.
    pub(crate) fn expand_nested(&self, knowns: &Knowns) -> Result<TermExpansion, PredicatorError> {
        let PhraseExpansion {
            terms,
            prelude,
            knowns,
        } = self.expand(knowns)?;
        let (temporary, knowns) = knowns.temp_variable(PHRASE_PREFIX);
        let definition = Predicate::Apply(temporary.definition_of(terms));

        Ok(TermExpansion {
            term: PlainTerm::Variable(temporary),
            knowns,
            prelude: prelude.and(definition),
        })
    }
}

impl Display for Phrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (index, term) in self.terms().iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
        }
        write!(f, ")")
    }
}

impl<T> FromIterator<T> for Phrase
where
    T: Into<Term>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Phrase::new(iter)
    }
}

/// The flat form of a [`Phrase`].
#[derive(Debug, Clone)]
pub struct PhraseExpansion {
    /// Plain terms, one per phrase element.
    pub terms: Vec<PlainTerm>,
    /// Definition sub-goals that must hold before `terms` are matched.
    pub prelude: Predicate,
    /// The environment with every declaration the expansion made.
    pub knowns: Knowns,
}

impl PhraseExpansion {
    pub fn pattern(&self) -> RulePattern {
        RulePattern::from(self.terms.clone())
    }

    /// The phrase as a goal: its definitions, then the rules matching it.
    pub fn goal(&self) -> Predicate {
        self.prelude.clone().and(Predicate::Apply(self.pattern()))
    }
}
