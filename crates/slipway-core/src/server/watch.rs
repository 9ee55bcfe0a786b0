//! Watch-exclusion predicate.
//!
//! No watcher is installed here; a host watcher consults [`WatchExclusions`]
//! to suppress change events for excluded paths.

use crate::error::Error;
use glob::{MatchOptions, Pattern};
use std::path::Path;

/// Compiled watch-exclusion patterns.
#[derive(Debug, Clone)]
pub struct WatchExclusions {
    patterns: Vec<Pattern>,
    raw: Vec<String>,
}

/// `*` and `?` must not cross path separators; `**` still matches any number
/// of components.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

impl WatchExclusions {
    /// Compile a set of glob patterns. An invalid pattern is an error, not a
    /// silent skip.
    pub fn compile(patterns: &[String]) -> Result<Self, Error> {
        let compiled = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| Error::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns: compiled,
            raw: patterns.to_vec(),
        })
    }

    /// Whether `path` is excluded from change observation.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_path_with(path, MATCH_OPTIONS))
    }

    /// The source patterns, in order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.raw
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tauri_exclusions() -> WatchExclusions {
        WatchExclusions::compile(&["**/src-tauri/**".to_string()]).unwrap()
    }

    #[test]
    fn test_excludes_native_shell_tree() {
        let ex = tauri_exclusions();
        assert!(ex.is_ignored(Path::new("src-tauri/tauri.conf.json")));
        assert!(ex.is_ignored(Path::new("src-tauri/src/main.rs")));
        assert!(ex.is_ignored(Path::new("app/src-tauri/Cargo.toml")));
    }

    #[test]
    fn test_does_not_exclude_frontend_sources() {
        let ex = tauri_exclusions();
        assert!(!ex.is_ignored(Path::new("src/main.ts")));
        assert!(!ex.is_ignored(Path::new("src/tauri.rs")));
        assert!(!ex.is_ignored(Path::new("index.html")));
    }

    #[test]
    fn test_empty_set_ignores_nothing() {
        let ex = WatchExclusions::compile(&[]).unwrap();
        assert!(ex.is_empty());
        assert!(!ex.is_ignored(Path::new("src-tauri/src/main.rs")));
    }

    #[test]
    fn test_multiple_patterns() {
        let ex = WatchExclusions::compile(&[
            "**/src-tauri/**".to_string(),
            "**/dist/**".to_string(),
        ])
        .unwrap();
        assert_eq!(ex.len(), 2);
        assert!(ex.is_ignored(Path::new("dist/bundle.js")));
        assert!(ex.is_ignored(Path::new("src-tauri/build.rs")));
        assert!(!ex.is_ignored(Path::new("src/app.tsx")));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = WatchExclusions::compile(&["src-**tauri".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_star_does_not_cross_separators() {
        let ex = WatchExclusions::compile(&["*.log".to_string()]).unwrap();
        assert!(ex.is_ignored(Path::new("dev.log")));
        assert!(!ex.is_ignored(Path::new("logs/dev.log")));
    }
}
