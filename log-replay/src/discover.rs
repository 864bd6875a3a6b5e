use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::ReplayError;

/// Expands glob patterns into a deduplicated, lexicographically sorted list
/// of log files. An invalid pattern or an unreadable match is an error;
/// zero matches overall is left to the caller to report.
pub fn discover(patterns: &[String]) -> Result<Vec<PathBuf>, ReplayError> {
    let mut paths = BTreeSet::new();
    for pattern in patterns {
        let matches = glob::glob(pattern).map_err(|source| ReplayError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        for path in matches {
            let path = path.map_err(|e| ReplayError::Io {
                path: e.path().to_path_buf(),
                source: e.into_error(),
            })?;
            paths.insert(path);
        }
    }
    Ok(paths.into_iter().collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    #[test]
    fn matches_come_back_sorted_and_deduplicated() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "b.log");
        touch(&dir, "a.log");
        touch(&dir, "notes.txt");

        let patterns = vec![
            format!("{}/*.log", dir.path().display()),
            format!("{}/a.*", dir.path().display()),
        ];
        let found = discover(&patterns).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("a.log"), dir.path().join("b.log")]
        );
    }

    #[test]
    fn zero_matches_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let patterns = vec![format!("{}/*.log", dir.path().display())];
        assert_eq!(discover(&patterns).unwrap(), Vec::<PathBuf>::new());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let patterns = vec!["logs/[".to_string()];
        assert!(matches!(
            discover(&patterns),
            Err(ReplayError::Pattern { .. })
        ));
    }
}
