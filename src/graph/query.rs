//! Declarative pattern queries over a [`Graph`]
//!
//! A query is a basic graph pattern joined with zero or more OPTIONAL groups,
//! filtered, optionally grouped with string aggregation, then ordered and
//! limited. Evaluation never fails on missing data: no match yields no rows.
//! Only a query that references variables it never binds, or otherwise cannot
//! be evaluated as written, is rejected with [`QueryError::Malformed`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use super::error::QueryError;
use super::store::Graph;
use super::term::{Datatype, Iri, Literal, Term};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTerm {
    Var(String),
    Const(Term),
}

/// Shorthand for a pattern variable.
pub fn var(name: &str) -> PatternTerm {
    PatternTerm::Var(name.to_string())
}

impl From<Iri> for PatternTerm {
    fn from(iri: Iri) -> Self {
        PatternTerm::Const(Term::Iri(iri))
    }
}

impl From<Literal> for PatternTerm {
    fn from(lit: Literal) -> Self {
        PatternTerm::Const(Term::Literal(lit))
    }
}

impl From<Term> for PatternTerm {
    fn from(term: Term) -> Self {
        PatternTerm::Const(term)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: PatternTerm,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    fn vars(&self) -> impl Iterator<Item = &str> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(|t| match t {
                PatternTerm::Var(name) => Some(name.as_str()),
                PatternTerm::Const(_) => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Equals(String, Term),
    In(String, Vec<Term>),
}

impl Filter {
    fn var(&self) -> &str {
        match self {
            Filter::Equals(name, _) | Filter::In(name, _) => name,
        }
    }

    /// Unbound variables never pass a filter.
    fn accepts(&self, binding: &Binding) -> bool {
        match self {
            Filter::Equals(name, expected) => binding.get(name) == Some(expected),
            Filter::In(name, allowed) => binding
                .get(name)
                .is_some_and(|value| allowed.contains(value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Var(String),
    GroupConcat {
        var: String,
        alias: String,
        separator: String,
        distinct: bool,
    },
}

impl Projection {
    pub fn group_concat(var: &str, alias: &str, separator: &str) -> Self {
        Projection::GroupConcat {
            var: var.to_string(),
            alias: alias.to_string(),
            separator: separator.to_string(),
            distinct: false,
        }
    }

    pub fn distinct(self) -> Self {
        match self {
            Projection::GroupConcat {
                var,
                alias,
                separator,
                ..
            } => Projection::GroupConcat {
                var,
                alias,
                separator,
                distinct: true,
            },
            other => other,
        }
    }

    fn output_name(&self) -> &str {
        match self {
            Projection::Var(name) => name,
            Projection::GroupConcat { alias, .. } => alias,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OrderKey {
    name: String,
    descending: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select: Vec<Projection>,
    required: Vec<TriplePattern>,
    optionals: Vec<Vec<TriplePattern>>,
    filters: Vec<Filter>,
    group_by: Vec<String>,
    order_by: Vec<OrderKey>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, names: &[&str]) -> Self {
        self.select
            .extend(names.iter().map(|n| Projection::Var(n.to_string())));
        self
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.select.push(projection);
        self
    }

    pub fn pattern(
        mut self,
        subject: impl Into<PatternTerm>,
        predicate: impl Into<PatternTerm>,
        object: impl Into<PatternTerm>,
    ) -> Self {
        self.required
            .push(TriplePattern::new(subject, predicate, object));
        self
    }

    /// Left-outer-joins a group of patterns: solutions without a match survive unchanged.
    pub fn optional(mut self, group: Vec<TriplePattern>) -> Self {
        self.optionals.push(group);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn group_by(mut self, name: &str) -> Self {
        self.group_by.push(name.to_string());
        self
    }

    pub fn order_by(mut self, name: &str) -> Self {
        self.order_by.push(OrderKey {
            name: name.to_string(),
            descending: false,
        });
        self
    }

    pub fn order_by_desc(mut self, name: &str) -> Self {
        self.order_by.push(OrderKey {
            name: name.to_string(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn is_aggregate(&self) -> bool {
        !self.group_by.is_empty()
            || self
                .select
                .iter()
                .any(|p| matches!(p, Projection::GroupConcat { .. }))
    }

    fn validate(&self) -> Result<(), QueryError> {
        let malformed = |msg: String| -> Result<(), QueryError> { Err(QueryError::Malformed(msg)) };

        if self.select.is_empty() {
            return malformed("query selects nothing".to_string());
        }
        if self.required.is_empty() {
            return malformed("query has no required pattern".to_string());
        }

        let mut bound: BTreeSet<&str> = BTreeSet::new();
        for pattern in self.required.iter().chain(self.optionals.iter().flatten()) {
            for (position, term) in [
                ("subject", &pattern.subject),
                ("predicate", &pattern.predicate),
            ] {
                if let PatternTerm::Const(Term::Literal(_)) = term {
                    return malformed(format!("literal in {position} position"));
                }
            }
            bound.extend(pattern.vars());
        }
        if self.optionals.iter().any(Vec::is_empty) {
            return malformed("empty optional group".to_string());
        }

        let mut outputs: BTreeSet<&str> = BTreeSet::new();
        for projection in &self.select {
            let source = match projection {
                Projection::Var(name) => name,
                Projection::GroupConcat { var, .. } => var,
            };
            if !bound.contains(source.as_str()) {
                return malformed(format!("?{source} is never bound by the pattern"));
            }
            if !outputs.insert(projection.output_name()) {
                return malformed(format!("duplicate output ?{}", projection.output_name()));
            }
        }

        for name in &self.group_by {
            if !bound.contains(name.as_str()) {
                return malformed(format!("cannot group by unbound ?{name}"));
            }
        }
        if self.is_aggregate() {
            for projection in &self.select {
                if let Projection::Var(name) = projection {
                    if !self.group_by.contains(name) {
                        return malformed(format!(
                            "?{name} is projected but neither grouped nor aggregated"
                        ));
                    }
                }
            }
        }

        for filter in &self.filters {
            if !bound.contains(filter.var()) {
                return malformed(format!("filter on unbound ?{}", filter.var()));
            }
        }
        for key in &self.order_by {
            if !outputs.contains(key.name.as_str()) {
                return malformed(format!("cannot order by ?{} which is not selected", key.name));
            }
        }
        Ok(())
    }

    /// Evaluates the query against `graph`.
    pub fn evaluate(&self, graph: &Graph) -> Result<Vec<Solution>, QueryError> {
        self.validate()?;

        let mut solutions = match_group(graph, &self.required, vec![Binding::new()]);

        for group in &self.optionals {
            solutions = solutions
                .into_iter()
                .flat_map(|binding| {
                    let extended = match_group(graph, group, vec![binding.clone()]);
                    if extended.is_empty() {
                        vec![binding]
                    } else {
                        extended
                    }
                })
                .collect();
        }

        solutions.retain(|binding| self.filters.iter().all(|f| f.accepts(binding)));

        let mut rows = if self.is_aggregate() {
            self.aggregate(solutions)
        } else {
            solutions
                .into_iter()
                .map(|binding| self.project_row(&binding))
                .collect()
        };

        if !self.order_by.is_empty() {
            rows.sort_by(|a, b| {
                self.order_by
                    .iter()
                    .map(|key| {
                        let ord = compare_terms(a.get(&key.name), b.get(&key.name));
                        if key.descending {
                            ord.reverse()
                        } else {
                            ord
                        }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn project_row(&self, binding: &Binding) -> Solution {
        let mut values = BTreeMap::new();
        for projection in &self.select {
            if let Projection::Var(name) = projection {
                if let Some(term) = binding.get(name) {
                    values.insert(name.clone(), term.clone());
                }
            }
        }
        Solution { values }
    }

    fn aggregate(&self, solutions: Vec<Binding>) -> Vec<Solution> {
        let mut order: Vec<Vec<Option<Term>>> = Vec::new();
        let mut groups: HashMap<Vec<Option<Term>>, Vec<Binding>> = HashMap::new();

        for binding in solutions {
            let key: Vec<Option<Term>> = self
                .group_by
                .iter()
                .map(|name| binding.get(name).cloned())
                .collect();
            groups
                .entry(key.clone())
                .or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                })
                .push(binding);
        }

        order
            .into_iter()
            .filter_map(|key| {
                let members = groups.remove(&key)?;
                let mut values = BTreeMap::new();
                for projection in &self.select {
                    match projection {
                        Projection::Var(name) => {
                            let idx = self.group_by.iter().position(|g| g == name)?;
                            if let Some(term) = &key[idx] {
                                values.insert(name.clone(), term.clone());
                            }
                        }
                        Projection::GroupConcat {
                            var,
                            alias,
                            separator,
                            distinct,
                        } => {
                            let mut seen = BTreeSet::new();
                            let parts: Vec<&str> = members
                                .iter()
                                .filter_map(|b| b.get(var))
                                .filter(|term| !*distinct || seen.insert(*term))
                                .map(Term::lexical)
                                .collect();
                            values.insert(
                                alias.clone(),
                                Term::Literal(Literal::string(parts.join(separator.as_str()))),
                            );
                        }
                    }
                }
                Some(Solution { values })
            })
            .collect()
    }
}

type Binding = BTreeMap<String, Term>;

fn match_group(graph: &Graph, patterns: &[TriplePattern], seed: Vec<Binding>) -> Vec<Binding> {
    patterns.iter().fold(seed, |solutions, pattern| {
        solutions
            .iter()
            .flat_map(|binding| match_pattern(graph, pattern, binding))
            .collect()
    })
}

fn match_pattern(graph: &Graph, pattern: &TriplePattern, binding: &Binding) -> Vec<Binding> {
    let resolve = |term: &PatternTerm| -> Option<Term> {
        match term {
            PatternTerm::Const(t) => Some(t.clone()),
            PatternTerm::Var(name) => binding.get(name).cloned(),
        }
    };

    let subject = resolve(&pattern.subject);
    let predicate = resolve(&pattern.predicate);
    let object = resolve(&pattern.object);

    // A literal bound into subject or predicate position can never match.
    let subject_iri = match &subject {
        Some(Term::Iri(iri)) => Some(iri),
        Some(Term::Literal(_)) => return Vec::new(),
        None => None,
    };
    let predicate_iri = match &predicate {
        Some(Term::Iri(iri)) => Some(iri),
        Some(Term::Literal(_)) => return Vec::new(),
        None => None,
    };

    graph
        .matching(subject_iri, predicate_iri, object.as_ref())
        .into_iter()
        .filter_map(|(s, p, o)| {
            let mut next = binding.clone();
            let candidates = [
                (&pattern.subject, Term::Iri(s.clone())),
                (&pattern.predicate, Term::Iri(p.clone())),
                (&pattern.object, o.clone()),
            ];
            for (slot, value) in candidates {
                if let PatternTerm::Var(name) = slot {
                    match next.get(name) {
                        Some(existing) if *existing != value => return None,
                        Some(_) => {}
                        None => {
                            next.insert(name.clone(), value);
                        }
                    }
                }
            }
            Some(next)
        })
        .collect()
}

/// Unbound first, then IRIs, then literals. Numeric and dateTime literals
/// compare by value, everything else by lexical form.
fn compare_terms(a: Option<&Term>, b: Option<&Term>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Term::Iri(x)), Some(Term::Iri(y))) => x.cmp(y),
        (Some(Term::Iri(_)), Some(Term::Literal(_))) => Ordering::Less,
        (Some(Term::Literal(_)), Some(Term::Iri(_))) => Ordering::Greater,
        (Some(Term::Literal(x)), Some(Term::Literal(y))) => compare_literals(x, y),
    }
}

fn compare_literals(a: &Literal, b: &Literal) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if a.datatype == Datatype::DateTime && b.datatype == Datatype::DateTime {
        if let (Some(x), Some(y)) = (a.as_date_time(), b.as_date_time()) {
            return x.cmp(&y);
        }
    }
    a.lexical.cmp(&b.lexical)
}

/// One result row: output name to bound term. Unbound outputs are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    values: BTreeMap<String, Term>,
}

impl Solution {
    pub fn get(&self, name: &str) -> Option<&Term> {
        self.values.get(name)
    }

    pub fn iri(&self, name: &str) -> Option<&Iri> {
        self.get(name).and_then(Term::as_iri)
    }

    pub fn literal(&self, name: &str) -> Option<&Literal> {
        self.get(name).and_then(Term::as_literal)
    }

    /// Lexical form of a literal binding.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.literal(name).map(|lit| lit.lexical.as_str())
    }

    pub fn f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Term::as_f64)
    }

    pub fn date_time(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(Term::as_date_time)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}
