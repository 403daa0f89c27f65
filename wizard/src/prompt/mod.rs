//! Interactive prompting: primitives and one prompter per parameter.
//!
//! Prompters are pure over their inputs apart from the [`Console`] and the
//! services they hold; each takes an answer snapshot and returns a new one
//! with its key added.
//!
//! [`Console`]: crate::io::console::Console

pub mod billing;
pub mod credentials;
pub mod django;
pub mod filesystem;
pub mod password;
pub mod poll;
pub mod primitives;
pub mod project;
pub mod prompter;
