use std::{fmt::Debug, sync::Arc};

use crate::{
    ConditionalSend, ConditionalSync, Knowns, PredicatorError, Solutions, failed, no_solutions,
    one_solution,
};

/// Host logic resolving a goal from an environment.
pub trait Evaluate: ConditionalSend + ConditionalSync {
    fn evaluate(&self, knowns: Knowns) -> Solutions;
}

impl<F> Evaluate for F
where
    F: Fn(Knowns) -> Solutions + ConditionalSend + ConditionalSync,
{
    fn evaluate(&self, knowns: Knowns) -> Solutions {
        self(knowns)
    }
}

/// A named goal implemented by the host, such as an arithmetic definition.
///
/// Two custom predicates are equal only if they share the same evaluator.
#[derive(Clone)]
pub struct Custom {
    name: Arc<str>,
    evaluator: Arc<dyn Evaluate>,
}

impl Custom {
    pub fn new<N, E>(name: N, evaluator: E) -> Self
    where
        N: Into<String>,
        E: Evaluate + 'static,
    {
        Custom {
            name: Arc::from(name.into()),
            evaluator: Arc::new(evaluator),
        }
    }

    /// A custom predicate with at most one solution. `Ok(None)` means the
    /// goal does not hold.
    pub fn once<N, F>(name: N, decide: F) -> Self
    where
        N: Into<String>,
        F: Fn(&Knowns) -> Result<Option<Knowns>, PredicatorError>
            + ConditionalSend
            + ConditionalSync
            + 'static,
    {
        Custom::new(name, move |knowns: Knowns| match decide(&knowns) {
            Ok(Some(knowns)) => one_solution(knowns),
            Ok(None) => no_solutions(),
            Err(error) => failed(error),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, knowns: Knowns) -> Solutions {
        self.evaluator.evaluate(knowns)
    }
}

impl PartialEq for Custom {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.evaluator, &other.evaluator)
    }
}

impl Debug for Custom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Custom")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use futures_util::TryStreamExt;
    use pretty_assertions::assert_eq;

    use crate::{Custom, Knowns, Predicate, PredicatorError, ResolvedTerm, RuleSet, Variable};

    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;
    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_dedicated_worker);

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_binds_through_a_host_decision() -> anyhow::Result<()> {
        let x = Variable::named("x");
        let knowns = Knowns::new([x.clone()]);
        let bind = Custom::once("bind", |knowns: &Knowns| {
            knowns.resolve(&Variable::named("x"), &ResolvedTerm::Atom("bob".into()))
        });

        let solutions: Vec<_> = Predicate::custom(bind)
            .resolve(&knowns, RuleSet::new())
            .try_collect()
            .await?;

        assert_eq!(solutions.len(), 1);
        assert_eq!(
            solutions[0].value_of(&x)?,
            Some(ResolvedTerm::Atom("bob".into()))
        );

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_fails_or_errors_as_decided() -> anyhow::Result<()> {
        let never = Custom::once("never", |_: &Knowns| Ok(None));
        let broken = Custom::once("broken", |_: &Knowns| {
            Err(PredicatorError::predicate("broken", "always"))
        });

        let none: Vec<_> = Predicate::custom(never)
            .resolve(&Knowns::none(), RuleSet::new())
            .try_collect()
            .await?;
        let error: Result<Vec<_>, _> = Predicate::custom(broken)
            .resolve(&Knowns::none(), RuleSet::new())
            .try_collect()
            .await;

        assert!(none.is_empty());
        assert_eq!(error, Err(PredicatorError::predicate("broken", "always")));

        Ok(())
    }

    #[test]
    fn it_compares_by_evaluator_identity() {
        let first = Custom::once("same", |_: &Knowns| Ok(None));
        let second = Custom::once("same", |_: &Knowns| Ok(None));

        assert_eq!(first, first.clone());
        assert_ne!(first, second);
        assert_eq!(Predicate::custom(first).to_string(), "same");
    }
}
