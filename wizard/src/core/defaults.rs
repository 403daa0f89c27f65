//! Default values offered when the user presses Enter.

use std::path::{Path, PathBuf};

use rand::Rng;

pub const DEFAULT_PROJECT_NAME: &str = "Django Project";
const PROJECT_ID_FALLBACK: &str = "django";
const PROJECT_ID_MAX_LEN: usize = 30;
const SUFFIX_LEN: usize = 6;
const DIRECTORY_FALLBACK: &str = "django-project";

/// Build a project id from a display name and a numeric suffix.
///
/// The base is lowercased, spaces become hyphens, a `django-` prefix is added
/// when it does not start with a lowercase letter, everything outside
/// `[a-z0-9-]` is stripped, and the result is cut so that `-NNNNNN` still fits
/// in 30 characters.
pub fn project_id_from_name(project_name: Option<&str>, suffix: u32) -> String {
    let name = project_name
        .filter(|name| !name.is_empty())
        .unwrap_or(PROJECT_ID_FALLBACK);
    let mut base = name.to_lowercase().replace(' ', "-");
    if !base.starts_with(|c: char| c.is_ascii_lowercase()) {
        base = format!("django-{base}");
    }
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .take(PROJECT_ID_MAX_LEN - SUFFIX_LEN - 1)
        .collect();
    format!("{cleaned}-{suffix:06}")
}

/// [`project_id_from_name`] with a random six-digit suffix.
pub fn generate_project_id(project_name: Option<&str>) -> String {
    let suffix = rand::thread_rng().gen_range(100_000..=999_999);
    project_id_from_name(project_name, suffix)
}

/// Directory-friendly form of a project name: lowercase, spaces to hyphens.
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// `<home>/<slug of project name>`, falling back to `django-project`.
pub fn default_project_directory(home: &Path, project_name: Option<&str>) -> PathBuf {
    let slug = project_name
        .map(slugify)
        .unwrap_or_else(|| DIRECTORY_FALLBACK.to_string());
    home.join(slug)
}
