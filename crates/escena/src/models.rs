//! These models represent the objects passed around by the chat engine
//!
//! The records mirror what the surrounding application persists: agents carry
//! the identity facts the post-processing pipeline must protect or inject
//! (proper names, appearance hints), and chat messages carry the content the
//! pipeline rewrites. Wire-facing structs use camelCase field names to match
//! the stored format.
pub mod agent;
pub mod message;
