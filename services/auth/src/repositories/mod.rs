//! Credential persistence

pub mod memory;
pub mod user;

pub use memory::MemoryCredentialStore;
pub use user::{CredentialStore, UserRepository};
