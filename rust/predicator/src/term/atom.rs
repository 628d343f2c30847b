use std::{fmt::Display, sync::Arc};

/// A resolved symbolic value, equal to any atom of the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(Arc<str>);

impl Atom {
    pub fn named<N: Into<String>>(name: N) -> Self {
        Atom(Arc::from(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}", self.0)
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Atom::named(value)
    }
}

impl From<String> for Atom {
    fn from(value: String) -> Self {
        Atom::named(value)
    }
}
