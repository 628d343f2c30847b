use std::{fmt::Display, sync::Arc};

use im::Vector;
use tracing::trace;

use crate::{
    ConditionalSend, ConditionalSync, Knowns, Matches, Rule, RulePattern, matches, try_stream,
};

/// A source of rules for goals to be resolved against.
///
/// Implementations decide how rules are stored and indexed. The resolver
/// only relies on the returned stream producing, in some order, every rule
/// whose condition matches `goal`, each with the environment of its match.
pub trait RuleSelector: ConditionalSend + ConditionalSync {
    fn matching_rules(&self, goal: &RulePattern, knowns: &Knowns) -> Matches;
}

impl<S> RuleSelector for Arc<S>
where
    S: RuleSelector + ?Sized,
{
    fn matching_rules(&self, goal: &RulePattern, knowns: &Knowns) -> Matches {
        (**self).matching_rules(goal, knowns)
    }
}

/// An ordered, immutable collection of rules scanned first to last.
///
/// Cloning is cheap and adding a rule produces a new set, so a resolution
/// in flight keeps selecting from the rules it started with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vector<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(&self, rule: Rule) -> Self {
        let mut rules = self.rules.clone();
        rules.push_back(rule);
        RuleSet { rules }
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RuleSelector for RuleSet {
    fn matching_rules(&self, goal: &RulePattern, knowns: &Knowns) -> Matches {
        let rules = self.rules.clone();
        let goal = goal.clone();
        let knowns = knowns.clone();

        matches(try_stream! {
            for rule in rules {
                if let Some(matched) = rule.matches(&goal, &knowns)? {
                    trace!("Selected {rule} for {goal}");
                    yield matched;
                }
            }
        })
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleSet {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl Display for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rule in self.rules() {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
