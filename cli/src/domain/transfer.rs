//! Object-key helpers for the storage commands.

use std::path::Path;

/// Join `prefix` and a path relative to an uploaded directory into an object
/// key, always with `/` separators.
#[must_use]
pub fn object_key(prefix: &str, relative: &Path) -> String {
    let rel: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let rel = rel.join("/");
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        rel
    } else {
        format!("{prefix}/{rel}")
    }
}

/// Keep keys ending with `suffix`; an empty suffix keeps everything.
#[must_use]
pub fn filter_suffix(keys: Vec<String>, suffix: &str) -> Vec<String> {
    keys.into_iter().filter(|k| k.ends_with(suffix)).collect()
}
