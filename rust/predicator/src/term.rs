mod atom;
pub use atom::*;

mod keyword;
pub use keyword::*;

mod phrase;
pub use phrase::*;

mod value;
pub use value::*;

mod variable;
pub use variable::*;

use std::fmt::Display;

use crate::{Knowns, Predicate, PredicatorError};

/// Any term, including compound [`Phrase`]s that must be expanded before
/// they can be matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Keyword(Keyword),
    Atom(Atom),
    Value(Value),
    Variable(Variable),
    Placeholder,
    Phrase(Phrase),
}

impl Term {
    pub fn keyword<N: Into<String>>(name: N) -> Self {
        Term::Keyword(Keyword::named(name))
    }

    pub fn atom<N: Into<String>>(name: N) -> Self {
        Term::Atom(Atom::named(name))
    }

    pub fn value(value: Value) -> Self {
        Term::Value(value)
    }

    pub fn variable<N: Into<String>>(name: N) -> Self {
        Term::Variable(Variable::named(name))
    }

    pub fn placeholder() -> Self {
        Term::Placeholder
    }

    pub fn phrase<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        Term::Phrase(Phrase::new(terms))
    }

    /// Flattens this term into a plain term that can take part in matching.
    ///
    /// Plain terms expand to themselves. A variable expands according to the
    /// scope of `knowns` (see [`Knowns::expand_variable`]). A phrase is
    /// replaced by a temporary, and the sub-goal defining that temporary is
    /// returned as the prelude.
    pub fn expand(&self, knowns: &Knowns) -> Result<TermExpansion, PredicatorError> {
        let term = match self {
            Term::Keyword(keyword) => PlainTerm::Keyword(keyword.clone()),
            Term::Atom(atom) => PlainTerm::Atom(atom.clone()),
            Term::Value(value) => PlainTerm::Value(value.clone()),
            Term::Placeholder => PlainTerm::Placeholder,
            Term::Variable(variable) => {
                let (term, knowns) = knowns.expand_variable(variable)?;
                return Ok(TermExpansion::plain(term, knowns));
            }
            Term::Phrase(phrase) => return phrase.expand_nested(knowns),
        };

        Ok(TermExpansion::plain(term, knowns.clone()))
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Keyword(keyword) => write!(f, "{keyword}"),
            Term::Atom(atom) => write!(f, "{atom}"),
            Term::Value(value) => write!(f, "{value}"),
            Term::Variable(variable) => write!(f, "{variable}"),
            Term::Placeholder => write!(f, "_"),
            Term::Phrase(phrase) => write!(f, "{phrase}"),
        }
    }
}

/// A term that may appear in a [`crate::RulePattern`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlainTerm {
    Keyword(Keyword),
    Atom(Atom),
    Value(Value),
    Variable(Variable),
    /// Matches any non-keyword term without binding anything.
    Placeholder,
}

impl PlainTerm {
    pub fn keyword<N: Into<String>>(name: N) -> Self {
        PlainTerm::Keyword(Keyword::named(name))
    }

    pub fn atom<N: Into<String>>(name: N) -> Self {
        PlainTerm::Atom(Atom::named(name))
    }

    pub fn value(value: Value) -> Self {
        PlainTerm::Value(value)
    }

    pub fn variable<N: Into<String>>(name: N) -> Self {
        PlainTerm::Variable(Variable::named(name))
    }

    pub fn placeholder() -> Self {
        PlainTerm::Placeholder
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            PlainTerm::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_resolved(&self) -> Option<ResolvedTerm> {
        match self {
            PlainTerm::Atom(atom) => Some(ResolvedTerm::Atom(atom.clone())),
            PlainTerm::Value(value) => Some(ResolvedTerm::Value(value.clone())),
            _ => None,
        }
    }

    /// Structural equality that surfaces payload comparison failures.
    pub fn try_eq(&self, other: &PlainTerm) -> Result<bool, PredicatorError> {
        Ok(match (self, other) {
            (PlainTerm::Keyword(left), PlainTerm::Keyword(right)) => left == right,
            (PlainTerm::Atom(left), PlainTerm::Atom(right)) => left == right,
            (PlainTerm::Value(left), PlainTerm::Value(right)) => left.matches(right)?,
            (PlainTerm::Variable(left), PlainTerm::Variable(right)) => left == right,
            (PlainTerm::Placeholder, PlainTerm::Placeholder) => true,
            _ => false,
        })
    }

    /// Matches this term, taken from a rule condition, against `other`,
    /// taken from the pattern being resolved.
    ///
    /// Variables on this side are rule-local and get mapped; variables on the
    /// other side are query variables and get resolved. `Ok(None)` means the
    /// terms do not unify.
    pub fn match_term(
        &self,
        other: &PlainTerm,
        knowns: &Knowns,
    ) -> Result<Option<Knowns>, PredicatorError> {
        Ok(match (self, other) {
            (PlainTerm::Placeholder, PlainTerm::Keyword(_))
            | (PlainTerm::Keyword(_), PlainTerm::Placeholder) => None,
            (PlainTerm::Placeholder, _) | (_, PlainTerm::Placeholder) => Some(knowns.clone()),

            (PlainTerm::Keyword(keyword), PlainTerm::Keyword(other)) => {
                (keyword == other).then(|| knowns.clone())
            }
            (PlainTerm::Keyword(_), _) => None,

            (PlainTerm::Atom(atom), PlainTerm::Atom(other)) => {
                (atom == other).then(|| knowns.clone())
            }
            (PlainTerm::Atom(atom), PlainTerm::Variable(variable)) => {
                knowns.resolve(variable, &ResolvedTerm::Atom(atom.clone()))?
            }
            (PlainTerm::Atom(_), _) => None,

            (PlainTerm::Value(value), PlainTerm::Value(other)) => {
                value.matches(other)?.then(|| knowns.clone())
            }
            (PlainTerm::Value(value), PlainTerm::Variable(variable)) => {
                knowns.resolve(variable, &ResolvedTerm::Value(value.clone()))?
            }
            (PlainTerm::Value(_), _) => None,

            (PlainTerm::Variable(local), other) => knowns.map(local, other)?,
        })
    }
}

impl Display for PlainTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlainTerm::Keyword(keyword) => write!(f, "{keyword}"),
            PlainTerm::Atom(atom) => write!(f, "{atom}"),
            PlainTerm::Value(value) => write!(f, "{value}"),
            PlainTerm::Variable(variable) => write!(f, "{variable}"),
            PlainTerm::Placeholder => write!(f, "_"),
        }
    }
}

/// A term a query variable can be resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedTerm {
    Atom(Atom),
    Value(Value),
}

impl ResolvedTerm {
    pub fn try_eq(&self, other: &ResolvedTerm) -> Result<bool, PredicatorError> {
        Ok(match (self, other) {
            (ResolvedTerm::Atom(left), ResolvedTerm::Atom(right)) => left == right,
            (ResolvedTerm::Value(left), ResolvedTerm::Value(right)) => left.matches(right)?,
            _ => false,
        })
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            ResolvedTerm::Atom(atom) => Some(atom),
            ResolvedTerm::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ResolvedTerm::Value(value) => Some(value),
            ResolvedTerm::Atom(_) => None,
        }
    }
}

impl Display for ResolvedTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedTerm::Atom(atom) => write!(f, "{atom}"),
            ResolvedTerm::Value(value) => write!(f, "{value}"),
        }
    }
}

/// The result of [`Term::expand`].
#[derive(Debug, Clone)]
pub struct TermExpansion {
    pub term: PlainTerm,
    pub knowns: Knowns,
    /// Sub-goals that compute the values of any temporaries in `term`.
    pub prelude: Predicate,
}

impl TermExpansion {
    fn plain(term: PlainTerm, knowns: Knowns) -> Self {
        TermExpansion {
            term,
            knowns,
            prelude: Predicate::True,
        }
    }

    /// Runs the prelude ahead of `predicate`.
    pub fn update(&self, predicate: Predicate) -> Predicate {
        self.prelude.clone().and(predicate)
    }
}

impl From<Keyword> for PlainTerm {
    fn from(value: Keyword) -> Self {
        PlainTerm::Keyword(value)
    }
}

impl From<Atom> for PlainTerm {
    fn from(value: Atom) -> Self {
        PlainTerm::Atom(value)
    }
}

impl From<Value> for PlainTerm {
    fn from(value: Value) -> Self {
        PlainTerm::Value(value)
    }
}

impl From<Variable> for PlainTerm {
    fn from(value: Variable) -> Self {
        PlainTerm::Variable(value)
    }
}

impl From<ResolvedTerm> for PlainTerm {
    fn from(value: ResolvedTerm) -> Self {
        match value {
            ResolvedTerm::Atom(atom) => PlainTerm::Atom(atom),
            ResolvedTerm::Value(value) => PlainTerm::Value(value),
        }
    }
}

impl From<Keyword> for Term {
    fn from(value: Keyword) -> Self {
        Term::Keyword(value)
    }
}

impl From<Atom> for Term {
    fn from(value: Atom) -> Self {
        Term::Atom(value)
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::Value(value)
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Term::Variable(value)
    }
}

impl From<Phrase> for Term {
    fn from(value: Phrase) -> Self {
        Term::Phrase(value)
    }
}

impl From<ResolvedTerm> for Term {
    fn from(value: ResolvedTerm) -> Self {
        PlainTerm::from(value).into()
    }
}

impl From<PlainTerm> for Term {
    fn from(value: PlainTerm) -> Self {
        match value {
            PlainTerm::Keyword(keyword) => Term::Keyword(keyword),
            PlainTerm::Atom(atom) => Term::Atom(atom),
            PlainTerm::Value(value) => Term::Value(value),
            PlainTerm::Variable(variable) => Term::Variable(variable),
            PlainTerm::Placeholder => Term::Placeholder,
        }
    }
}

impl TryFrom<Term> for PlainTerm {
    type Error = PredicatorError;

    fn try_from(value: Term) -> Result<Self, Self::Error> {
        Ok(match value {
            Term::Keyword(keyword) => PlainTerm::Keyword(keyword),
            Term::Atom(atom) => PlainTerm::Atom(atom),
            Term::Value(value) => PlainTerm::Value(value),
            Term::Variable(variable) => PlainTerm::Variable(variable),
            Term::Placeholder => PlainTerm::Placeholder,
            Term::Phrase(phrase) => {
                return Err(PredicatorError::InvalidTerm {
                    message: format!("Phrase {phrase} must be expanded before matching"),
                });
            }
        })
    }
}

impl TryFrom<PlainTerm> for ResolvedTerm {
    type Error = PlainTerm;

    fn try_from(value: PlainTerm) -> Result<Self, Self::Error> {
        match value {
            PlainTerm::Atom(atom) => Ok(ResolvedTerm::Atom(atom)),
            PlainTerm::Value(value) => Ok(ResolvedTerm::Value(value)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        Knowns, PlainTerm, Predicate, PredicatorError, Resolution, ResolvedTerm, Term, Value,
        Variable,
    };

    fn query(names: &[&str]) -> Knowns {
        Knowns::new(names.iter().copied().map(Variable::named)).start_matching()
    }

    #[test]
    fn it_matches_keywords_only_by_name() -> anyhow::Result<()> {
        let knowns = query(&["x"]);
        let likes = PlainTerm::keyword("likes");

        assert!(likes.match_term(&PlainTerm::keyword("likes"), &knowns)?.is_some());
        assert!(likes.match_term(&PlainTerm::keyword("hates"), &knowns)?.is_none());
        assert!(likes.match_term(&PlainTerm::atom("likes"), &knowns)?.is_none());
        assert!(likes.match_term(&PlainTerm::variable("x"), &knowns)?.is_none());

        Ok(())
    }

    #[test]
    fn it_leaves_the_environment_identical_when_nothing_is_learned() -> anyhow::Result<()> {
        let knowns = query(&["x"]);
        let bob = PlainTerm::atom("bob");

        let same_atom = bob
            .match_term(&PlainTerm::atom("bob"), &knowns)?
            .expect("Equal atoms match");
        assert!(same_atom.ptr_eq(&knowns));

        let resolved = bob
            .match_term(&PlainTerm::variable("x"), &knowns)?
            .expect("Atom resolves the variable");
        let again = bob
            .match_term(&PlainTerm::variable("x"), &resolved)?
            .expect("Same value matches again");
        assert!(again.ptr_eq(&resolved));

        Ok(())
    }

    #[test]
    fn it_never_binds_a_keyword_to_a_local() -> anyhow::Result<()> {
        let knowns = query(&[]);

        assert!(
            PlainTerm::variable("local")
                .match_term(&PlainTerm::keyword("likes"), &knowns)?
                .is_none()
        );

        Ok(())
    }

    #[test]
    fn it_resolves_query_variables_to_atoms_and_values() -> anyhow::Result<()> {
        let knowns = query(&["x", "y"]);
        let knowns = PlainTerm::atom("bob")
            .match_term(&PlainTerm::variable("x"), &knowns)?
            .expect("Atom resolves the variable");
        let knowns = PlainTerm::value(Value::new(7i64))
            .match_term(&PlainTerm::variable("y"), &knowns)?
            .expect("Value resolves the variable");

        assert_eq!(
            knowns.value_of(&Variable::named("x"))?,
            Some(ResolvedTerm::Atom("bob".into()))
        );
        assert_eq!(
            knowns.value_of(&Variable::named("y"))?,
            Some(ResolvedTerm::Value(Value::new(7i64)))
        );

        Ok(())
    }

    #[test]
    fn it_fails_across_term_kinds() -> anyhow::Result<()> {
        let knowns = query(&[]);

        assert!(
            PlainTerm::atom("1")
                .match_term(&PlainTerm::value(Value::new(1i64)), &knowns)?
                .is_none()
        );
        assert!(
            PlainTerm::value(Value::new(1i64))
                .match_term(&PlainTerm::atom("1"), &knowns)?
                .is_none()
        );
        assert!(
            PlainTerm::value(Value::new(1i64))
                .match_term(&PlainTerm::keyword("1"), &knowns)?
                .is_none()
        );

        Ok(())
    }

    #[test]
    fn it_treats_placeholders_as_wildcards_for_non_keywords() -> anyhow::Result<()> {
        let knowns = query(&["x"]);

        for term in [
            PlainTerm::atom("bob"),
            PlainTerm::value(Value::new(1i64)),
            PlainTerm::variable("x"),
            PlainTerm::placeholder(),
        ] {
            let matched = PlainTerm::placeholder()
                .match_term(&term, &knowns)?
                .expect("Placeholder matches");
            assert!(matched.ptr_eq(&knowns));
            assert!(term.match_term(&PlainTerm::placeholder(), &knowns)?.is_some());
        }

        assert!(
            PlainTerm::placeholder()
                .match_term(&PlainTerm::keyword("likes"), &knowns)?
                .is_none()
        );
        assert_eq!(
            knowns.resolution(&Variable::named("x"))?,
            &Resolution::Unresolved
        );

        Ok(())
    }

    #[test]
    fn it_makes_repeated_locals_a_linear_constraint() -> anyhow::Result<()> {
        let knowns = query(&[]);
        let local = PlainTerm::variable("a");
        let knowns = local
            .match_term(&PlainTerm::atom("bob"), &knowns)?
            .expect("First occurrence binds");

        assert!(local.match_term(&PlainTerm::atom("bob"), &knowns)?.is_some());
        assert!(local.match_term(&PlainTerm::atom("carol"), &knowns)?.is_none());

        Ok(())
    }

    #[test]
    fn it_surfaces_unknown_query_variables() {
        let result = PlainTerm::atom("bob").match_term(&PlainTerm::variable("nope"), &query(&[]));

        assert_eq!(
            result.map(|_| ()),
            Err(PredicatorError::unknown_variable(&Variable::named("nope")))
        );
    }

    #[test]
    fn it_rejects_phrases_as_plain_terms() {
        let phrase = Term::phrase([Term::atom("add")]);

        assert!(matches!(
            PlainTerm::try_from(phrase),
            Err(PredicatorError::InvalidTerm { .. })
        ));
        assert_eq!(
            PlainTerm::try_from(Term::atom("add")),
            Ok(PlainTerm::atom("add"))
        );
    }

    #[test]
    fn it_expands_plain_terms_to_themselves() -> anyhow::Result<()> {
        let knowns = Knowns::none();
        let expansion = Term::keyword("print").expand(&knowns)?;

        assert_eq!(expansion.term, PlainTerm::keyword("print"));
        assert_eq!(expansion.prelude, Predicate::True);
        assert!(expansion.knowns.ptr_eq(&knowns));
        assert_eq!(expansion.update(Predicate::False), Predicate::False);

        Ok(())
    }

    #[test]
    fn it_displays_terms() {
        let term = Term::phrase([
            Term::keyword("likes"),
            Term::atom("alice"),
            Term::variable("who"),
            Term::placeholder(),
        ]);

        assert_eq!(term.to_string(), "(likes 'alice ?who _)");
    }
}
