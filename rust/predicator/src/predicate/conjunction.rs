use std::sync::Arc;

use async_stream::stream;

use crate::{Knowns, Predicate, RuleSelector, Solutions, solutions};

/// Resolves `right` under every solution of `left`.
///
/// Errors from either side are passed on in place, and the remaining
/// solutions of `left` are still tried.
pub(super) fn resolve<S>(
    left: Arc<Predicate>,
    right: Arc<Predicate>,
    knowns: &Knowns,
    selector: S,
) -> Solutions
where
    S: RuleSelector + Clone + 'static,
{
    let knowns = knowns.clone();

    solutions(stream! {
        let left_solutions = left.resolve(&knowns, selector.clone());

        for await solution in left_solutions {
            let solution = match solution {
                Ok(solution) => solution,
                Err(error) => {
                    yield Err(error);
                    continue;
                }
            };
            let right_solutions = right.resolve(&solution, selector.clone());

            for await solution in right_solutions {
                yield solution;
            }
        }
    })
}
