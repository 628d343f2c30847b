//! Sample rule databases shared by tests.
//!
//! Enabled for this crate's own tests and, through the `helpers` feature,
//! for downstream crates.

use std::any::Any;

use crate::{
    ConditionalSend, ConditionalSync, Custom, Keyword, Knowns, Payload, Phrase, PlainTerm,
    Predicate, PredicatorError, ResolvedTerm, Rule, RulePattern, RuleSet, Term, Value, Variable,
};

pub fn atom(name: &str) -> PlainTerm {
    PlainTerm::atom(name)
}

pub fn variable(name: &str) -> PlainTerm {
    PlainTerm::variable(name)
}

pub fn integer(value: i64) -> PlainTerm {
    PlainTerm::value(Value::new(value))
}

/// The integer a resolved term holds, if it holds one.
pub fn as_integer(term: Option<ResolvedTerm>) -> Option<i64> {
    term.and_then(|term| term.as_value()?.downcast_ref::<i64>().copied())
}

pub fn parent_pattern(parent: PlainTerm, child: PlainTerm) -> RulePattern {
    RulePattern::new([parent, PlainTerm::keyword("parent-of"), child])
}

pub fn parent_of(parent: PlainTerm, child: PlainTerm) -> Predicate {
    Predicate::apply(parent_pattern(parent, child))
}

pub fn grandparent_pattern(grandparent: PlainTerm, child: PlainTerm) -> RulePattern {
    RulePattern::new([grandparent, PlainTerm::keyword("grandparent-of"), child])
}

pub fn grandparent_of(grandparent: PlainTerm, child: PlainTerm) -> Predicate {
    Predicate::apply(grandparent_pattern(grandparent, child))
}

/// Parent facts for a small family plus a grandparent rule:
///
/// ```text
/// tom -> bob -> ann
///            -> pat
/// tom -> liz -> jim
/// ```
pub fn family() -> RuleSet {
    let mut rules = RuleSet::from_iter(
        [
            ("tom", "bob"),
            ("tom", "liz"),
            ("bob", "ann"),
            ("bob", "pat"),
            ("liz", "jim"),
        ]
        .map(|(parent, child)| parent_pattern(atom(parent), atom(child)).fact()),
    );

    rules.extend([grandparent_pattern(variable("g"), variable("c")).rule(Predicate::all([
        Predicate::call(Phrase::new([
            Term::variable("g"),
            Term::keyword("parent-of"),
            Term::variable("p"),
        ])),
        Predicate::call(Phrase::new([
            Term::variable("p"),
            Term::keyword("parent-of"),
            Term::variable("c"),
        ])),
    ]))]);

    rules
}

/// A rule `[?result, :=, 'name, ?a, ?b...]` computing `?result` from the
/// integer operands.
pub fn definition<F>(name: &'static str, operands: &'static [&'static str], compute: F) -> Rule
where
    F: Fn(&[i64]) -> i64 + ConditionalSend + ConditionalSync + 'static,
{
    let condition = [variable("result"), PlainTerm::Keyword(Keyword::definition()), atom(name)]
        .into_iter()
        .chain(operands.iter().map(|operand| variable(operand)))
        .collect::<RulePattern>();

    condition.rule(Predicate::custom(Custom::once(name, move |knowns: &Knowns| {
        let values = operands
            .iter()
            .map(|operand| {
                as_integer(knowns.lookup(&Variable::named(*operand))?).ok_or_else(|| {
                    PredicatorError::predicate(name, format!("?{operand} is not a bound integer"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        knowns.map(
            &Variable::named("result"),
            &PlainTerm::value(Value::new(compute(&values))),
        )
    })))
}

/// `add`, `neg` and `succ` definitions, and `[same, ?x, ?x]`.
pub fn arithmetic() -> RuleSet {
    RuleSet::from_iter([
        definition("add", &["a", "b"], |values| values[0] + values[1]),
        definition("neg", &["a"], |values| -values[0]),
        definition("succ", &["a"], |values| values[0] + 1),
        RulePattern::new([PlainTerm::keyword("same"), variable("x"), variable("x")]).fact(),
    ])
}

/// The natural numbers, enumerated without end:
///
/// ```text
/// nat 0.
/// nat ?n :- (nat ?m), (same ?n (succ ?m)).
/// ```
pub fn naturals() -> RuleSet {
    arithmetic()
        .with(RulePattern::new([PlainTerm::keyword("nat"), integer(0)]).fact())
        .with(
            RulePattern::new([PlainTerm::keyword("nat"), variable("n")]).rule(Predicate::all([
                Predicate::call(Phrase::new([Term::keyword("nat"), Term::variable("m")])),
                Predicate::call(Phrase::new([
                    Term::keyword("same"),
                    Term::variable("n"),
                    Term::phrase([Term::atom("succ"), Term::variable("m")]),
                ])),
            ])),
        )
}

/// A payload whose comparison always fails.
#[derive(Debug)]
pub struct Unstable;

impl Payload for Unstable {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, _other: &dyn Payload) -> Result<bool, PredicatorError> {
        Err(PredicatorError::Payload {
            message: "unstable payload".into(),
        })
    }
}

pub fn unstable() -> PlainTerm {
    PlainTerm::value(Value::custom(Unstable))
}
