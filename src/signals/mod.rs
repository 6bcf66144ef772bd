//! Signal interpretation and recommendation synthesis.

pub mod categories;
pub mod interpreter;
pub mod recommendation;

pub use categories::SignalCategories;
pub use interpreter::interpret_signals;
pub use recommendation::synthesize_recommendation;
