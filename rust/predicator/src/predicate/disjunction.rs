use std::sync::Arc;

use tracing::debug;

use crate::{Knowns, Predicate, RuleSelector, Solutions, TryStreamExt, solutions, stream_select};

/// Interleaves the solutions of both branches, each resolved from the same
/// `knowns`.
///
/// An error ends only the branch that raised it: the error is passed on in
/// place and the other branch keeps producing solutions.
pub(super) fn resolve<S>(
    left: Arc<Predicate>,
    right: Arc<Predicate>,
    knowns: &Knowns,
    selector: S,
) -> Solutions
where
    S: RuleSelector + Clone + 'static,
{
    let left_solutions = branch(left, knowns, selector.clone());
    let right_solutions = branch(right, knowns, selector);

    solutions(stream_select!(left_solutions, right_solutions))
}

fn branch<S>(predicate: Arc<Predicate>, knowns: &Knowns, selector: S) -> Solutions
where
    S: RuleSelector + Clone + 'static,
{
    let branch_solutions = predicate.resolve(knowns, selector);

    solutions(branch_solutions.inspect_err(move |error| {
        debug!("Branch {predicate} failed: {error}");
    }))
}
