//! Repositories for task persistence

pub mod memory;
pub mod task;

pub use memory::MemoryTaskStore;
pub use task::{TaskRepository, TaskStore};
