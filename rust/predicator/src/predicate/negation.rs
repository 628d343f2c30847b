use std::sync::Arc;

use crate::{Knowns, Predicate, RuleSelector, Solutions, TryStreamExt, solutions, try_stream};

/// Succeeds once with `knowns` unchanged if `inner` has no solution. Only the
/// first solution of `inner` is ever computed.
pub(super) fn resolve<S>(inner: Arc<Predicate>, knowns: &Knowns, selector: S) -> Solutions
where
    S: RuleSelector + Clone + 'static,
{
    let knowns = knowns.clone();

    solutions(try_stream! {
        let mut inner_solutions = inner.resolve(&knowns, selector);

        if inner_solutions.try_next().await?.is_none() {
            yield knowns;
        }
    })
}
