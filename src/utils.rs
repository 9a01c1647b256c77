use std::fs;
use std::path::Path;

use log::{info, warn};

/// Makes sure the directory that will hold `path` exists, creating intermediate directories.
/// Returns false if the directory could not be created; the caller decides whether that matters.
pub fn ensure_parent_dir(path: &Path) -> bool {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return true,
    };
    if parent.is_dir() {
        return true;
    }

    match fs::create_dir_all(parent) {
        Ok(()) => {
            info!("Created directory: {}", parent.display());
            true
        }
        Err(e) => {
            warn!("Failed to create directory {}: {}", parent.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_nested_dirs() {
        let root = Path::new("test_results/utils_creates_nested_dirs");
        let _ = fs::remove_dir_all(root);

        let file = root.join("a/b/c/diff.png");
        assert!(ensure_parent_dir(&file));
        assert!(root.join("a/b/c").is_dir());

        // second call is a no-op
        assert!(ensure_parent_dir(&file));
    }

    #[test]
    fn test_bare_file_name() {
        assert!(ensure_parent_dir(Path::new("diff.png")));
    }

    #[test]
    fn test_parent_is_a_file() {
        let root = Path::new("test_results/utils_parent_is_a_file");
        let _ = fs::remove_dir_all(root);
        fs::create_dir_all(root).expect("failed to create test dir");

        let blocker = root.join("blocker");
        fs::write(&blocker, b"not a directory").expect("failed to write blocker");
        assert!(!ensure_parent_dir(&blocker.join("nested/diff.png")));
    }
}
