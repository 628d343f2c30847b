use im::HashMap;

use crate::{PlainTerm, PredicatorError, ResolvedTerm, Variable};

/// What is known about a query variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Unresolved,
    Resolved(ResolvedTerm),
    /// The variable denotes whatever the other variable denotes.
    Alias(Variable),
}

/// Whether variables met during expansion belong to the query or to the
/// rule currently being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Query,
    Rule,
}

/// The substitution environment threaded through resolution.
///
/// `Knowns` is immutable: every operation that adds information returns a
/// new environment sharing structure with the old one. Operations that add
/// nothing return a clone that is [`Knowns::ptr_eq`] to the original.
///
/// Query variables live in `resolutions`, whose domain is fixed by
/// [`Knowns::new`] and only grows through engine-issued declarations
/// ([`Knowns::declare_local`], [`Knowns::temp_variable`]). Those are dropped
/// again by [`Knowns::restore_scope`] once the rule that needed them is done.
/// Rule-local variables live in `mappings`, which is cleared for every
/// matching attempt.
#[derive(Debug, Clone, Default)]
pub struct Knowns {
    resolutions: HashMap<Variable, Resolution>,
    mappings: HashMap<Variable, PlainTerm>,
    scope: Scope,
    next_id: u64,
}

impl Knowns {
    /// An environment declaring `variables` as unresolved query variables.
    pub fn new<I, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Variable>,
    {
        Knowns {
            resolutions: variables
                .into_iter()
                .map(|variable| (variable.into(), Resolution::Unresolved))
                .collect(),
            ..Default::default()
        }
    }

    /// An environment without any query variables.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.resolutions.keys()
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_matching(&self) -> bool {
        self.scope == Scope::Rule
    }

    /// Identity comparison: true when both environments share their maps.
    pub fn ptr_eq(&self, other: &Knowns) -> bool {
        self.resolutions.ptr_eq(&other.resolutions) && self.mappings.ptr_eq(&other.mappings)
    }

    pub fn resolution(&self, variable: &Variable) -> Result<&Resolution, PredicatorError> {
        self.resolutions
            .get(variable)
            .ok_or_else(|| PredicatorError::unknown_variable(variable))
    }

    /// The value `variable` resolves to, following aliases.
    pub fn value_of(&self, variable: &Variable) -> Result<Option<ResolvedTerm>, PredicatorError> {
        Ok(self.chase(variable)?.1.cloned())
    }

    pub fn mapping(&self, local: &Variable) -> Option<&PlainTerm> {
        self.mappings.get(local)
    }

    /// The value a rule-local variable currently denotes, if any.
    pub fn lookup(&self, local: &Variable) -> Result<Option<ResolvedTerm>, PredicatorError> {
        match self.mapping(local) {
            None => Ok(None),
            Some(PlainTerm::Variable(variable)) => self.value_of(variable),
            Some(term) => Ok(term.as_resolved()),
        }
    }

    /// Resolves `variable` (or the end of its alias chain) to `value`.
    ///
    /// Resolving to the value already held is a no-op; resolving to a
    /// different one fails with `Ok(None)`.
    pub fn resolve(
        &self,
        variable: &Variable,
        value: &ResolvedTerm,
    ) -> Result<Option<Knowns>, PredicatorError> {
        let (end, current) = self.chase(variable)?;

        Ok(match current {
            None => Some(self.with_resolution(end.clone(), Resolution::Resolved(value.clone()))),
            Some(current) => current.try_eq(value)?.then(|| self.clone()),
        })
    }

    /// Binds the rule-local variable `local` to `term`.
    ///
    /// A local binds once. Meeting it again with another term unifies the
    /// two terms instead: two query variables are aliased, and a query
    /// variable meeting a resolved term is resolved to it.
    pub fn map(&self, local: &Variable, term: &PlainTerm) -> Result<Option<Knowns>, PredicatorError> {
        match term {
            PlainTerm::Placeholder => return Ok(Some(self.clone())),
            PlainTerm::Keyword(_) => return Ok(None),
            _ => {}
        }

        let Some(previous) = self.mappings.get(local) else {
            if let PlainTerm::Variable(variable) = term {
                self.resolution(variable)?;
            }
            return Ok(Some(self.with_mapping(local.clone(), term.clone())));
        };

        if previous.try_eq(term)? {
            return Ok(Some(self.clone()));
        }

        match (previous, term) {
            (PlainTerm::Variable(previous), PlainTerm::Variable(variable)) => {
                self.alias(previous, variable)
            }
            (PlainTerm::Variable(variable), resolved) | (resolved, PlainTerm::Variable(variable)) => {
                match resolved.as_resolved() {
                    Some(value) => self.resolve(variable, &value),
                    None => Ok(None),
                }
            }
            _ => Ok(None),
        }
    }

    /// Makes `from` denote whatever `to` denotes.
    ///
    /// Both variables are chased to the end of their chains first, so no
    /// alias ever points back into its own chain.
    pub fn alias(&self, from: &Variable, to: &Variable) -> Result<Option<Knowns>, PredicatorError> {
        let (from_end, from_value) = self.chase(from)?;
        let (to_end, to_value) = self.chase(to)?;

        if from_end == to_end {
            return Ok(Some(self.clone()));
        }

        Ok(match (from_value, to_value) {
            (Some(from_value), Some(to_value)) => from_value.try_eq(to_value)?.then(|| self.clone()),
            (Some(from_value), None) => Some(self.with_resolution(
                to_end.clone(),
                Resolution::Resolved(from_value.clone()),
            )),
            (None, _) => Some(self.with_resolution(
                from_end.clone(),
                Resolution::Alias(to_end.clone()),
            )),
        })
    }

    /// Starts a matching attempt against a rule: local mappings are cleared,
    /// resolutions are kept.
    pub fn start_matching(&self) -> Knowns {
        Knowns {
            resolutions: self.resolutions.clone(),
            mappings: HashMap::new(),
            scope: Scope::Rule,
            next_id: self.next_id,
        }
    }

    /// Re-instates the mappings and scope of `outer` on this environment,
    /// keeping everything resolved since.
    ///
    /// Variables declared after `outer` are dropped. An alias chain of an
    /// outer variable that runs through them is collapsed to its end, and an
    /// unresolved end is kept so variables aliased together stay together.
    pub fn restore_scope(&self, outer: &Knowns) -> Result<Knowns, PredicatorError> {
        Ok(Knowns {
            resolutions: self.retained_resolutions(outer)?,
            mappings: outer.mappings.clone(),
            scope: outer.scope,
            next_id: self.next_id.max(outer.next_id),
        })
    }

    /// Returns the term `local` is mapped to, declaring a fresh unresolved
    /// variable for it first if it is not mapped yet.
    pub fn declare_local(&self, local: &Variable) -> (PlainTerm, Knowns) {
        if let Some(term) = self.mappings.get(local) {
            return (term.clone(), self.clone());
        }

        let declared = Variable::local(local, self.next_id);
        let term = PlainTerm::Variable(declared.clone());
        let mut knowns = self.with_resolution(declared, Resolution::Unresolved);
        knowns.mappings.insert(local.clone(), term.clone());
        knowns.next_id += 1;

        (term, knowns)
    }

    /// Declares a fresh unresolved temporary.
    pub fn temp_variable(&self, prefix: &str) -> (Variable, Knowns) {
        let temporary = Variable::temp(prefix, self.next_id);
        let mut knowns = self.with_resolution(temporary.clone(), Resolution::Unresolved);
        knowns.next_id += 1;

        (temporary, knowns)
    }

    /// The plain term a variable written in a goal stands for.
    ///
    /// In query scope a variable is a query variable and must be declared.
    /// In rule scope it is local to the rule being applied and expands to its
    /// mapping, declared on first use. Variables issued by the engine are
    /// already declared and expand to themselves.
    pub fn expand_variable(&self, variable: &Variable) -> Result<(PlainTerm, Knowns), PredicatorError> {
        match self.scope {
            Scope::Query => {
                self.resolution(variable)?;
                Ok((PlainTerm::Variable(variable.clone()), self.clone()))
            }
            Scope::Rule => {
                if self.mappings.get(variable).is_none()
                    && variable.id().is_some()
                    && self.resolutions.contains_key(variable)
                {
                    return Ok((PlainTerm::Variable(variable.clone()), self.clone()));
                }
                Ok(self.declare_local(variable))
            }
        }
    }

    fn chase<'a>(
        &'a self,
        variable: &'a Variable,
    ) -> Result<(&'a Variable, Option<&'a ResolvedTerm>), PredicatorError> {
        let mut current = variable;
        loop {
            match self.resolution(current)? {
                Resolution::Unresolved => return Ok((current, None)),
                Resolution::Resolved(value) => return Ok((current, Some(value))),
                Resolution::Alias(next) => current = next,
            }
        }
    }

    fn retained_resolutions(
        &self,
        outer: &Knowns,
    ) -> Result<HashMap<Variable, Resolution>, PredicatorError> {
        if self.resolutions.len() == outer.resolutions.len() {
            return Ok(self.resolutions.clone());
        }

        let mut retained = HashMap::new();
        for variable in outer.resolutions.keys() {
            let resolution = match self.resolution(variable)? {
                Resolution::Alias(next) if !outer.resolutions.contains_key(next) => {
                    match self.chase(next)? {
                        (_, Some(value)) => Resolution::Resolved(value.clone()),
                        (end, None) => {
                            if !outer.resolutions.contains_key(end) {
                                retained.insert(end.clone(), Resolution::Unresolved);
                            }
                            Resolution::Alias(end.clone())
                        }
                    }
                }
                resolution => resolution.clone(),
            };
            retained.insert(variable.clone(), resolution);
        }

        Ok(retained)
    }

    fn with_resolution(&self, variable: Variable, resolution: Resolution) -> Knowns {
        Knowns {
            resolutions: self.resolutions.update(variable, resolution),
            ..self.clone()
        }
    }

    fn with_mapping(&self, local: Variable, term: PlainTerm) -> Knowns {
        Knowns {
            mappings: self.mappings.update(local, term),
            ..self.clone()
        }
    }
}

impl PartialEq for Knowns {
    fn eq(&self, other: &Self) -> bool {
        self.resolutions == other.resolutions && self.mappings == other.mappings
    }
}
