//! Deterministic, pure logic shared by the wizard.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests (the random
//! project-id suffix is drawn only by `defaults::generate_project_id`).

pub mod answers;
pub mod defaults;
pub mod keys;
pub mod step;
pub mod types;
pub mod validate;
