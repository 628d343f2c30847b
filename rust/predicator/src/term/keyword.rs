use std::{fmt::Display, sync::Arc};

/// An inert marker term. Keywords match only an equal keyword and can never
/// be bound to a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
    Named(Arc<str>),
    /// The `:=` marker separating a temporary from the phrase it stands for
    /// in a definition pattern.
    Definition,
}

impl Keyword {
    pub fn named<N: Into<String>>(name: N) -> Self {
        Keyword::Named(Arc::from(name.into()))
    }

    pub fn definition() -> Self {
        Keyword::Definition
    }

    pub fn name(&self) -> &str {
        match self {
            Keyword::Named(name) => name,
            Keyword::Definition => ":=",
        }
    }

    pub fn is_definition(&self) -> bool {
        matches!(self, Keyword::Definition)
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Keyword {
    fn from(value: &str) -> Self {
        Keyword::named(value)
    }
}

#[cfg(test)]
mod tests {
    use super::Keyword;

    #[test]
    fn it_compares_keywords_by_name() {
        assert_eq!(Keyword::named("likes"), Keyword::from("likes"));
        assert_ne!(Keyword::named("likes"), Keyword::named("hates"));
    }

    #[test]
    fn it_keeps_the_definition_marker_apart_from_named_keywords() {
        assert_eq!(Keyword::definition().name(), ":=");
        assert_ne!(Keyword::definition(), Keyword::named(":="));
        assert!(Keyword::definition().is_definition());
    }
}
