//! Whitelist file loader.
//!
//! Format:
//! - One domain per line
//! - Lines starting with # are comments
//! - Empty lines are ignored
//!
//! Entries are normalized (lowercased, trailing dot stripped) before
//! insertion, so the file may use whatever spelling the operator's zone
//! data uses.

use std::path::Path;

use thiserror::Error;

use sinkhound_fs::{Filesystem, FsError};
use sinkhound_stats::{Whitelist, WhitelistError};

/// Errors from whitelist loading.
#[derive(Debug, Error)]
pub enum WhitelistLoadError {
    #[error("failed to read whitelist file: {0}")]
    Read(#[from] FsError),

    #[error("invalid entry on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: WhitelistError,
    },
}

/// Load a whitelist from a file.
pub fn load_whitelist<F: Filesystem>(
    fs: &F,
    path: &Path,
) -> Result<Whitelist, WhitelistLoadError> {
    let content = fs.read_file(path)?;
    parse_whitelist(&content)
}

/// Parse whitelist content from a string.
///
/// This is the core parsing logic, separated for testability.
pub fn parse_whitelist(content: &str) -> Result<Whitelist, WhitelistLoadError> {
    let mut whitelist = Whitelist::empty();

    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        whitelist
            .add(trimmed)
            .map_err(|e| WhitelistLoadError::Parse {
                line: line_num + 1,
                source: e,
            })?;
    }

    Ok(whitelist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinkhound_fs::MockFilesystem;
    use std::path::PathBuf;

    #[test]
    fn test_parse_empty() {
        let wl = parse_whitelist("").expect("parse");
        assert!(wl.is_empty());
    }

    #[test]
    fn test_parse_comments_and_blanks() {
        let wl = parse_whitelist("# header\n\n   \n# another\n").expect("parse");
        assert!(wl.is_empty());
    }

    #[test]
    fn test_parse_domains() {
        let wl = parse_whitelist("google.com\nupdates.example.net\n").expect("parse");
        assert_eq!(wl.len(), 2);
        assert!(wl.contains("google.com"));
        assert!(wl.contains("updates.example.net"));
    }

    #[test]
    fn test_parse_normalizes_entries() {
        let wl = parse_whitelist("CDN.Example.NET.\n").expect("parse");
        assert!(wl.contains("cdn.example.net"));
    }

    #[test]
    fn test_parse_invalid_entry_reports_line() {
        let content = "google.com\n# fine\nnot a domain!\n";
        let err = parse_whitelist(content).unwrap_err();
        assert!(matches!(err, WhitelistLoadError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_parse_realistic_file() {
        let content = "# sinkhound whitelist\n\
                       # CDN and telemetry endpoints that query constantly\n\
                       google.com\n\
                       facebook.com\n\
                       \n\
                       # internal\n\
                       updates.corp.example\n";
        let wl = parse_whitelist(content).expect("parse");
        assert_eq!(wl.len(), 3);
    }

    #[test]
    fn test_load_from_file() {
        let fs = MockFilesystem::new();
        let path = PathBuf::from("/etc/sinkhound/whitelist.txt");
        fs.add_file(path.clone(), b"google.com\nmicrosoft.com\n".to_vec());

        let wl = load_whitelist(&fs, &path).expect("load");
        assert_eq!(wl.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let fs = MockFilesystem::new();
        let result = load_whitelist(&fs, Path::new("/nonexistent"));
        assert!(matches!(result, Err(WhitelistLoadError::Read(_))));
    }
}
