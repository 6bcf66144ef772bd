//! In-memory fact graph with pattern queries and Turtle persistence

pub mod error;
pub mod kb;
pub mod query;
pub mod store;
pub mod term;
pub mod turtle;
pub mod vocab;

pub use error::{PersistenceError, QueryError};
pub use kb::KnowledgeBase;
pub use query::{Filter, PatternTerm, Projection, Query, Solution, TriplePattern};
pub use store::Graph;
pub use term::{Datatype, Fact, Iri, Literal, Term};
