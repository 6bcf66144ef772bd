//! Shared knowledge base handle
//!
//! Every component receives an `Arc<KnowledgeBase>` rather than reaching for a
//! global. Reads take the shared lock for the duration of one query (or one
//! [`KnowledgeBase::with_snapshot`] closure); retract-then-insert sequences run
//! under a single write guard, so no reader ever sees only the retraction.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use super::error::{PersistenceError, QueryError};
use super::query::{Query, Solution};
use super::store::Graph;
use super::term::{Fact, Iri, Term};
use super::turtle;

#[derive(Debug, Default)]
pub struct KnowledgeBase {
    graph: RwLock<Graph>,
    persist_lock: Mutex<()>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_graph(graph: Graph) -> Self {
        Self {
            graph: RwLock::new(graph),
            persist_lock: Mutex::new(()),
        }
    }

    pub fn len(&self) -> usize {
        self.graph.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.read().is_empty()
    }

    /// Inserts one fact; duplicates are ignored.
    pub fn add_fact(&self, subject: Iri, predicate: Iri, object: impl Into<Term>) -> bool {
        self.graph.write().add(subject, predicate, object)
    }

    /// Inserts a batch under one write guard. Returns how many were new.
    pub fn add_facts(&self, facts: impl IntoIterator<Item = Fact>) -> usize {
        self.graph.write().extend(facts)
    }

    pub fn remove_facts_for_subject(&self, subject: &Iri) -> usize {
        self.graph.write().remove_subject(subject)
    }

    /// Retracts everything about `subject` and asserts `facts` as one unit.
    pub fn replace_subject(&self, subject: &Iri, facts: Vec<Fact>) -> usize {
        let mut graph = self.graph.write();
        let removed = graph.remove_subject(subject);
        graph.extend(facts);
        removed
    }

    /// Sets each `(predicate, value)` on `subject`, dropping prior values of
    /// those predicates in the same write.
    pub fn set_single_valued(&self, subject: &Iri, values: Vec<(Iri, Term)>) {
        let mut graph = self.graph.write();
        for (predicate, value) in values {
            graph.remove_values(subject, &predicate);
            graph.add(subject.clone(), predicate, value);
        }
    }

    /// Runs `f` with exclusive access; nothing it does is visible until it returns.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut Graph) -> R) -> R {
        f(&mut self.graph.write())
    }

    /// Runs `f` against one consistent view of the graph.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&Graph) -> R) -> R {
        f(&self.graph.read())
    }

    pub fn query(&self, query: &Query) -> Result<Vec<Solution>, QueryError> {
        query.evaluate(&self.graph.read())
    }

    pub fn contains(&self, subject: &Iri, predicate: &Iri, object: &Term) -> bool {
        self.graph.read().contains(subject, predicate, object)
    }

    pub fn snapshot(&self) -> Graph {
        self.graph.read().clone()
    }

    /// Writes the full fact set as Turtle. The document is rendered under the
    /// read lock, then written to a sibling temp file and renamed into place.
    /// Saves are serialised, so the file on disk always holds the newest
    /// rendered snapshot.
    pub fn persist(&self, path: &Path) -> Result<usize, PersistenceError> {
        let _saving = self.persist_lock.lock();
        let (document, count) = {
            let graph = self.graph.read();
            (turtle::serialize(&graph), graph.len())
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }

        let tmp = temp_path(path);
        fs::write(&tmp, document).map_err(|source| io_error(&tmp, source))?;
        fs::rename(&tmp, path).map_err(|source| io_error(path, source))?;

        info!(path = %path.display(), facts = count, "Knowledge base persisted");
        Ok(count)
    }

    /// Builds a fresh knowledge base from a Turtle file.
    pub fn load(path: &Path) -> Result<Self, PersistenceError> {
        let kb = Self::new();
        kb.load_into(path)?;
        Ok(kb)
    }

    /// Merges the facts of a Turtle file into this knowledge base. The file is
    /// parsed completely before anything is inserted.
    pub fn load_into(&self, path: &Path) -> Result<usize, PersistenceError> {
        let text = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
        let facts = turtle::parse(&text)?;
        let parsed = facts.len();
        let added = self.add_facts(facts);
        debug!(path = %path.display(), parsed, added, "Turtle document loaded");
        Ok(added)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "knowledge_base".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}
