//! Tasks with assignment, priority and the sales-owns-own-tasks rule.

mod task;

pub use task::{can_mutate, NewTask, Task, TaskPriority, TaskStatus, TaskUpdate};
