//! Indexed triple set

use std::collections::{BTreeMap, BTreeSet};

use super::term::{Fact, Iri, Term};

/// Set of facts indexed by subject/predicate and by object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    spo: BTreeMap<Iri, BTreeMap<Iri, BTreeSet<Term>>>,
    ops: BTreeMap<Term, BTreeSet<(Iri, Iri)>>,
    len: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts one fact. Returns `false` when it was already present.
    pub fn insert(&mut self, fact: Fact) -> bool {
        let Fact {
            subject,
            predicate,
            object,
        } = fact;
        let inserted = self
            .spo
            .entry(subject.clone())
            .or_default()
            .entry(predicate.clone())
            .or_default()
            .insert(object.clone());
        if inserted {
            self.ops.entry(object).or_default().insert((subject, predicate));
            self.len += 1;
        }
        inserted
    }

    pub fn add(&mut self, subject: Iri, predicate: Iri, object: impl Into<Term>) -> bool {
        self.insert(Fact::new(subject, predicate, object))
    }

    pub fn extend(&mut self, facts: impl IntoIterator<Item = Fact>) -> usize {
        facts.into_iter().filter(|f| self.insert(f.clone())).count()
    }

    pub fn contains(&self, subject: &Iri, predicate: &Iri, object: &Term) -> bool {
        self.spo
            .get(subject)
            .and_then(|by_pred| by_pred.get(predicate))
            .is_some_and(|objects| objects.contains(object))
    }

    pub fn remove(&mut self, fact: &Fact) -> bool {
        let Some(by_pred) = self.spo.get_mut(&fact.subject) else {
            return false;
        };
        let Some(objects) = by_pred.get_mut(&fact.predicate) else {
            return false;
        };
        if !objects.remove(&fact.object) {
            return false;
        }
        if objects.is_empty() {
            by_pred.remove(&fact.predicate);
        }
        if by_pred.is_empty() {
            self.spo.remove(&fact.subject);
        }
        self.unindex_object(&fact.object, &fact.subject, &fact.predicate);
        self.len -= 1;
        true
    }

    /// Retracts every `(subject, predicate, *)` fact.
    pub fn remove_values(&mut self, subject: &Iri, predicate: &Iri) -> usize {
        let Some(by_pred) = self.spo.get_mut(subject) else {
            return 0;
        };
        let Some(objects) = by_pred.remove(predicate) else {
            return 0;
        };
        if by_pred.is_empty() {
            self.spo.remove(subject);
        }
        for object in &objects {
            self.unindex_object(object, subject, predicate);
        }
        self.len -= objects.len();
        objects.len()
    }

    /// Retracts every fact whose subject is `subject`.
    pub fn remove_subject(&mut self, subject: &Iri) -> usize {
        let Some(by_pred) = self.spo.remove(subject) else {
            return 0;
        };
        let mut removed = 0;
        for (predicate, objects) in by_pred {
            for object in &objects {
                self.unindex_object(object, subject, &predicate);
            }
            removed += objects.len();
        }
        self.len -= removed;
        removed
    }

    fn unindex_object(&mut self, object: &Term, subject: &Iri, predicate: &Iri) {
        if let Some(pairs) = self.ops.get_mut(object) {
            pairs.remove(&(subject.clone(), predicate.clone()));
            if pairs.is_empty() {
                self.ops.remove(object);
            }
        }
    }

    pub fn objects<'a>(
        &'a self,
        subject: &Iri,
        predicate: &Iri,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.spo
            .get(subject)
            .and_then(|by_pred| by_pred.get(predicate))
            .into_iter()
            .flatten()
    }

    pub fn object(&self, subject: &Iri, predicate: &Iri) -> Option<&Term> {
        self.objects(subject, predicate).next()
    }

    pub fn has_subject(&self, subject: &Iri) -> bool {
        self.spo.contains_key(subject)
    }

    /// Facts matching the given positions; `None` matches anything.
    pub fn matching<'a>(
        &'a self,
        subject: Option<&Iri>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<(&'a Iri, &'a Iri, &'a Term)> {
        match (subject, predicate, object) {
            (Some(s), _, _) => {
                let Some((s, by_pred)) = self.spo.get_key_value(s) else {
                    return Vec::new();
                };
                by_pred
                    .iter()
                    .filter(|(p, _)| predicate.map_or(true, |want| *p == want))
                    .flat_map(|(p, objects)| objects.iter().map(move |o| (s, p, o)))
                    .filter(|(_, _, o)| object.map_or(true, |want| *o == want))
                    .collect()
            }
            (None, _, Some(o)) => {
                let Some((o, pairs)) = self.ops.get_key_value(o) else {
                    return Vec::new();
                };
                pairs
                    .iter()
                    .filter(|(_, p)| predicate.map_or(true, |want| p == want))
                    .map(|(s, p)| (s, p, o))
                    .collect()
            }
            (None, _, None) => self
                .iter()
                .filter(|(_, p, _)| predicate.map_or(true, |want| *p == want))
                .collect(),
        }
    }

    /// All facts in subject, predicate, object order.
    pub fn iter(&self) -> impl Iterator<Item = (&Iri, &Iri, &Term)> + '_ {
        self.spo.iter().flat_map(|(s, by_pred)| {
            by_pred
                .iter()
                .flat_map(move |(p, objects)| objects.iter().map(move |o| (s, p, o)))
        })
    }

    pub fn facts(&self) -> Vec<Fact> {
        self.iter()
            .map(|(s, p, o)| Fact::new(s.clone(), p.clone(), o.clone()))
            .collect()
    }
}
