//! API request handlers.

/// Research roster handlers.
pub mod agents;
/// Research execution handlers.
pub mod research;
