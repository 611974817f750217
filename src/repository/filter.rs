// file: src/repository/filter.rs
// description: file-name suffix allow-list

use crate::config::Config;
use std::path::Path;

/// Accepts paths whose file name ends with one of the configured suffixes.
///
/// Suffixes are literal and case-sensitive: `.md` matches `notes.md` but not
/// `NOTES.MD`, and `*` has no special meaning.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    pub fn new(extensions: Vec<String>) -> Self {
        Self { extensions }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sync.allowed_extensions.clone())
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();

        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(exts: &[&str]) -> ExtensionFilter {
        ExtensionFilter::new(exts.iter().map(|e| e.to_string()).collect())
    }

    #[test]
    fn test_accepts_listed_suffixes() {
        let f = filter(&[".md", ".txt"]);

        assert!(f.accepts(Path::new("/repo/a.md")));
        assert!(f.accepts(Path::new("/repo/docs/b.txt")));
        assert!(!f.accepts(Path::new("/repo/b.py")));
        assert!(!f.accepts(Path::new("/repo/md")));
    }

    #[test]
    fn test_ordering_does_not_matter() {
        let paths = ["x.md", "y.txt", "z.rs", "w.markdown", "v.tar.gz", "noext"];
        let orders = [
            vec![".md", ".txt", ".gz"],
            vec![".gz", ".md", ".txt"],
            vec![".txt", ".gz", ".md"],
        ];

        for path in paths {
            let results: Vec<bool> = orders
                .iter()
                .map(|order| filter(order).accepts(Path::new(path)))
                .collect();
            assert!(
                results.windows(2).all(|w| w[0] == w[1]),
                "order-dependent result for {path}"
            );
        }
    }

    #[test]
    fn test_case_sensitive_literal_suffix() {
        let f = filter(&[".md", "*.txt"]);

        assert!(!f.accepts(Path::new("README.MD")));
        assert!(!f.accepts(Path::new("notes.txt")));
        assert!(f.accepts(Path::new("odd*.txt")));
    }

    #[test]
    fn test_suffix_need_not_start_with_dot() {
        let f = filter(&["file"]);
        assert!(f.accepts(Path::new("Makefile")));
        assert!(!f.accepts(Path::new("file/inner.rs")));
    }

    #[test]
    fn test_empty_allow_list_accepts_nothing() {
        let f = filter(&[]);
        assert!(!f.accepts(Path::new("a.md")));
    }

    #[test]
    fn test_from_config_defaults() {
        let f = ExtensionFilter::from_config(&Config::default_config());
        assert_eq!(f.extensions(), [".md".to_string(), ".txt".to_string()]);
    }
}
