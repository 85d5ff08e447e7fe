use std::borrow::Cow;
use std::path::{Component, Path};

/// True if any component of `path` is a parent reference (`..`).
pub fn has_parent_component(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, Component::ParentDir))
}

/// Final file name as text, if the path has one. Non-UTF-8 names are
/// replaced lossily; the security checks only look at leading dots and
/// ASCII suffixes, which survive the replacement.
pub fn file_name(path: &Path) -> Option<Cow<'_, str>> {
    path.file_name().map(|name| name.to_string_lossy())
}

/// True if the final file name starts with `.`. Paths ending in `.` or `..`
/// have no file name and are not dotfiles.
pub fn is_dotfile(path: &Path) -> bool {
    matches!(file_name(path), Some(name) if name.starts_with('.'))
}

/// True if the final file name ends with `suffix`, compared
/// case-insensitively.
pub fn name_ends_with(path: &Path, suffix: &str) -> bool {
    match file_name(path) {
        Some(name) => name.to_lowercase().ends_with(&suffix.to_lowercase()),
        None => false,
    }
}

/// Parent directory for delegation from file predicates to directory
/// predicates. Falls back to the path itself at a filesystem root, where
/// `Path::parent` has nothing left to strip.
pub fn lexical_parent(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}

/// Structural containment: `path` equals `root` or sits beneath it,
/// comparing components without touching the filesystem.
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}
