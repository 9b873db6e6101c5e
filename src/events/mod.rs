//! Detection events and the loaders that read them from disk.

pub mod loader;
pub mod types;

// Re-export commonly used types
pub use loader::{load_events, parse_json, parse_text, EventFormat, LoadError, LoadOptions};
pub use types::{Event, EventStream};
