//! API models for request and response payloads

pub mod task;

pub use task::{
    CreateTaskRequest, InvalidStatus, Task, TaskChanges, TaskQuery, TaskStatus,
    UpdateStatusRequest, UpdateTaskRequest,
};
