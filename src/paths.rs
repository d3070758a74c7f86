//! Path normalization for human-friendly directory names.
//!
//! The model frequently refers to directories the way a person would
//! ("desktop", "my downloads folder"); tools that take paths route their
//! input through [`normalize_path`] so those names resolve to real
//! locations.

use std::path::{Path, PathBuf};

/// Fixed alias table mapping common directory names to home-relative paths.
const COMMON_DIRS: &[(&str, &str)] = &[
    ("documents", "~/Documents"),
    ("desktop", "~/Desktop"),
    ("downloads", "~/Downloads"),
    ("pictures", "~/Pictures"),
    ("videos", "~/Videos"),
    ("music", "~/Music"),
    ("home", "~"),
    ("application documents", "~/Documents/APPLICATION DOCUMENTS"),
    ("application documents folder", "~/Documents/APPLICATION DOCUMENTS"),
];

/// Normalize a path the way a user describes it.
///
/// Alias lookup is case-insensitive and ignores surrounding whitespace.
/// After alias resolution the path gets `~` expansion and is made absolute
/// against the current directory. Already-absolute paths pass through
/// unchanged, so normalization is idempotent.
pub fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();

    let aliased = COMMON_DIRS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, target)| *target)
        .unwrap_or(trimmed);

    absolutize(&expand_home(aliased))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_unchanged() {
        let p = normalize_path("/etc/hosts");
        assert_eq!(p, PathBuf::from("/etc/hosts"));
        // Idempotent
        assert_eq!(normalize_path(p.to_str().unwrap()), p);
    }

    #[test]
    fn desktop_alias_matches_tilde_form() {
        assert_eq!(normalize_path("desktop"), normalize_path("~/Desktop"));
        assert_eq!(normalize_path("  DESKTOP  "), normalize_path("~/Desktop"));
        assert_eq!(normalize_path("DeskTop"), normalize_path("~/Desktop"));
    }

    #[test]
    fn application_documents_alias() {
        let expected = normalize_path("~/Documents/APPLICATION DOCUMENTS");
        assert_eq!(normalize_path("application documents"), expected);
        assert_eq!(normalize_path("Application Documents Folder"), expected);
    }

    #[test]
    fn home_alias_is_home_dir() {
        assert_eq!(normalize_path("home"), normalize_path("~"));
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(normalize_path("src"), cwd.join("src"));
    }
}
