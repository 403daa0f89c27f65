//! Stable exit codes for `django-deploy` commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid flag value, invalid configuration, or any other failure.
pub const INVALID: i32 = 1;
/// `django-deploy update` found required tools missing from `PATH`.
pub const MISSING_TOOLS: i32 = 2;
