use std::{fmt::Display, sync::Arc};

use crate::{Keyword, PlainTerm, RulePattern};

/// A logic variable.
///
/// Whether a variable acts as a query variable or as a rule-local one is
/// decided by where it appears: variables in a rule condition are local to
/// that rule, variables in the pattern being resolved belong to the query.
///
/// Named variables are equal by name. Temporaries and engine-declared locals
/// carry an id issued by [`crate::Knowns`], so two of them are never equal
/// unless they were issued together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Named(Arc<str>),
    Temp { prefix: Arc<str>, id: VariableId },
    Local { name: Arc<str>, id: VariableId },
}

/// Identity of an engine-issued variable. Only [`crate::Knowns`] hands
/// these out, so callers cannot forge a temporary or a local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u64);

impl VariableId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Variable {
    pub fn named<N: Into<String>>(name: N) -> Self {
        Variable::Named(Arc::from(name.into()))
    }

    pub(crate) fn temp(prefix: &str, id: u64) -> Self {
        Variable::Temp {
            prefix: Arc::from(prefix),
            id: VariableId(id),
        }
    }

    pub(crate) fn local(variable: &Variable, id: u64) -> Self {
        Variable::Local {
            name: match variable {
                Variable::Named(name) | Variable::Local { name, .. } => name.clone(),
                Variable::Temp { prefix, .. } => prefix.clone(),
            },
            id: VariableId(id),
        }
    }

    /// The name this variable was declared with (the prefix for temporaries).
    pub fn name(&self) -> &str {
        match self {
            Variable::Named(name) => name,
            Variable::Temp { prefix, .. } => prefix,
            Variable::Local { name, .. } => name,
        }
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            Variable::Named(_) => None,
            Variable::Temp { id, .. } | Variable::Local { id, .. } => Some(id.get()),
        }
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, Variable::Temp { .. })
    }

    /// Builds the definition pattern `[self, :=, terms...]`.
    pub fn definition_of<I, T>(&self, terms: I) -> RulePattern
    where
        I: IntoIterator<Item = T>,
        T: Into<PlainTerm>,
    {
        let mut pattern = vec![
            PlainTerm::Variable(self.clone()),
            PlainTerm::Keyword(Keyword::definition()),
        ];
        pattern.extend(terms.into_iter().map(Into::into));
        RulePattern::from(pattern)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variable::Named(name) => write!(f, "?{name}"),
            Variable::Temp { prefix, id } => write!(f, "?{prefix}#{id}"),
            Variable::Local { name, id } => write!(f, "?{name}#{id}"),
        }
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable::named(value)
    }
}

impl From<&String> for Variable {
    fn from(value: &String) -> Self {
        Variable::named(value.as_str())
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Variable::named(value)
    }
}
