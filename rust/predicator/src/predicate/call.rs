use crate::{Knowns, Phrase, RuleSelector, Solutions, failed};

/// Expands `phrase` against `knowns` and resolves it as a goal, after the
/// definitions of any nested phrases.
pub(super) fn resolve<S>(phrase: &Phrase, knowns: &Knowns, selector: S) -> Solutions
where
    S: RuleSelector + Clone + 'static,
{
    match phrase.expand(knowns) {
        Ok(expansion) => expansion.goal().resolve(&expansion.knowns, selector),
        Err(error) => failed(error),
    }
}
