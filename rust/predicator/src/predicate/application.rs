use async_stream::stream;
use tracing::debug;

use crate::{Knowns, RulePattern, RuleSelector, Solutions, solutions};

/// Resolves the body of every rule `selector` matches against `goal`.
///
/// Each solution is handed back in the caller's scope: whatever the rule
/// resolved is kept, its local mappings and declarations are dropped.
///
/// Errors are passed on in place. The stream that raised one has already
/// ended, so an erroring branch of a disjunction in a rule body does not
/// take the other branch down with it.
pub(super) fn resolve<S>(goal: RulePattern, knowns: &Knowns, selector: S) -> Solutions
where
    S: RuleSelector + Clone + 'static,
{
    let knowns = knowns.clone();

    solutions(stream! {
        let matches = selector.matching_rules(&goal, &knowns);

        for await matched in matches {
            let matched = match matched {
                Ok(matched) => matched,
                Err(error) => {
                    yield Err(error);
                    continue;
                }
            };
            debug!("Applying {} to {goal}", matched.rule);

            let body_solutions = matched.rule.body.resolve(&matched.knowns, selector.clone());

            for await solution in body_solutions {
                yield solution.and_then(|solution| solution.restore_scope(&knowns));
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use futures_util::{StreamExt, TryStreamExt};
    use pretty_assertions::assert_eq;

    use crate::{
        Knowns, Phrase, PlainTerm, Predicate, ResolvedTerm, RulePattern, RuleSet, Term, Value,
        Variable, helpers::*,
    };

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;
    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_dedicated_worker);

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_discharges_a_goal_against_facts() -> anyhow::Result<()> {
        let knowns = Knowns::none();

        let found: Vec<Knowns> = parent_of(atom("tom"), atom("bob"))
            .resolve(&knowns, family())
            .try_collect()
            .await?;
        let missing: Vec<Knowns> = parent_of(atom("tom"), atom("ann"))
            .resolve(&knowns, family())
            .try_collect()
            .await?;

        assert_eq!(found, vec![knowns]);
        assert!(missing.is_empty());

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_resolves_rule_bodies() -> anyhow::Result<()> {
        let grandchild = Variable::named("grandchild");
        let knowns = Knowns::new([grandchild.clone()]);

        let solutions: Vec<Knowns> = grandparent_of(atom("tom"), variable("grandchild"))
            .resolve(&knowns, family())
            .try_collect()
            .await?;

        let grandchildren = solutions
            .iter()
            .map(|solution| solution.value_of(&grandchild))
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(
            grandchildren,
            vec![
                Some(ResolvedTerm::Atom("ann".into())),
                Some(ResolvedTerm::Atom("pat".into())),
                Some(ResolvedTerm::Atom("jim".into())),
            ]
        );

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_keeps_rule_locals_out_of_the_callers_scope() -> anyhow::Result<()> {
        let x = Variable::named("x");
        let knowns = Knowns::new([x.clone()]);

        // The rule's own ?x must not capture the ?x of the caller's next goal.
        let rules = family().with(
            RulePattern::new([PlainTerm::keyword("anyone"), variable("x")]).rule(Predicate::call(
                Phrase::new([
                    Term::atom("tom"),
                    Term::keyword("parent-of"),
                    Term::variable("x"),
                ]),
            )),
        );
        let goal = Predicate::apply(RulePattern::new([
            PlainTerm::keyword("anyone"),
            PlainTerm::placeholder(),
        ]))
        .and(parent_of(atom("liz"), variable("x")));

        let solutions: Vec<Knowns> = goal.resolve(&knowns, rules).try_collect().await?;

        assert_eq!(solutions.len(), 2);
        for solution in &solutions {
            assert!(!solution.is_matching());
            assert_eq!(solution.value_of(&x)?, Some(ResolvedTerm::Atom("jim".into())));
        }

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_keeps_the_healthy_branch_of_a_disjunctive_body() -> anyhow::Result<()> {
        let x = Variable::named("x");
        let knowns = Knowns::new([x.clone()]);

        // choose ?y :- (flaky 1); ('tom parent-of ?y)
        let rules = family()
            .with(RulePattern::new([PlainTerm::keyword("flaky"), unstable()]).fact())
            .with(
                RulePattern::new([PlainTerm::keyword("choose"), variable("y")]).rule(
                    Predicate::call(Phrase::new([
                        Term::keyword("flaky"),
                        Term::value(Value::new(1i64)),
                    ]))
                    .or(Predicate::call(Phrase::new([
                        Term::atom("tom"),
                        Term::keyword("parent-of"),
                        Term::variable("y"),
                    ]))),
                ),
            );
        let goal = Predicate::apply(RulePattern::new([PlainTerm::keyword("choose"), variable("x")]));

        let results = goal.resolve(&knowns, rules).collect::<Vec<_>>().await;

        let errors = results.iter().filter(|result| result.is_err()).count();
        let chosen = results
            .into_iter()
            .filter_map(Result::ok)
            .map(|solution| solution.value_of(&x))
            .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(errors, 1);
        assert_eq!(chosen.len(), 2);
        assert!(chosen.contains(&Some(ResolvedTerm::Atom("bob".into()))));
        assert!(chosen.contains(&Some(ResolvedTerm::Atom("liz".into()))));

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_forgets_what_finished_rules_declared() -> anyhow::Result<()> {
        let n = Variable::named("n");
        let knowns = Knowns::new([n.clone()]);
        let goal = Predicate::apply(RulePattern::new([PlainTerm::keyword("nat"), variable("n")]));

        let solutions: Vec<Knowns> = goal.resolve(&knowns, naturals()).take(30).try_collect().await?;

        let last = solutions.last().expect("Thirty naturals");
        assert_eq!(as_integer(last.value_of(&n)?), Some(29));
        assert_eq!(last.variables().collect::<Vec<_>>(), vec![&n]);

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_yields_nothing_without_rules() -> anyhow::Result<()> {
        let solutions: Vec<Knowns> = parent_of(atom("tom"), atom("bob"))
            .resolve(&Knowns::none(), RuleSet::new())
            .try_collect()
            .await?;

        assert!(solutions.is_empty());

        Ok(())
    }
}
