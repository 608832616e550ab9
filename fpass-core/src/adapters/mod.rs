//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the F-Pass REST backend
//! - JSON file on disk for the SessionStore port
//! - In-memory map for the SessionStore port (tests, throwaway sessions)

pub mod file_store;
pub mod http;
pub mod memory_store;

pub use file_store::FileSessionStore;
pub use http::{Ack, ApiClient, Payload};
pub use memory_store::MemorySessionStore;

#[cfg(test)]
pub mod mock_backend;
