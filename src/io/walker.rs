use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Discovers problem files under a set of roots.
///
/// Roots may be directories or single files. Missing roots are skipped.
/// The result is sorted and free of duplicates so runs are reproducible.
pub struct PgFileWalker {
    roots: Vec<PathBuf>,
    extension: String,
    exclude_dirs: Vec<String>,
}

impl PgFileWalker {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            extension: "pg".to_string(),
            exclude_dirs: vec![".git".to_string()],
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    pub fn walk(&self) -> Vec<PathBuf> {
        let mut found = BTreeSet::new();

        for root in &self.roots {
            if !root.exists() {
                log::warn!("Skipping missing root {}", root.display());
                continue;
            }
            if root.is_file() {
                if self.should_process(root) {
                    found.insert(root.clone());
                }
                continue;
            }

            let mut skipped = 0usize;
            let entries = WalkDir::new(root)
                .into_iter()
                .filter_entry(|entry| !self.is_excluded_dir(entry))
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        skipped += 1;
                        log::warn!("Skipping directory entry: {}", err);
                        None
                    }
                });

            for entry in entries {
                if entry.file_type().is_file() && self.should_process(entry.path()) {
                    found.insert(entry.into_path());
                }
            }

            if skipped > 0 {
                log::info!("Skipped {} unreadable entries under {}", skipped, root.display());
            }
        }

        found.into_iter().collect()
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| self.exclude_dirs.iter().any(|d| d == name))
                .unwrap_or(false)
    }

    fn should_process(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == self.extension)
            .unwrap_or(false)
    }
}

/// Sorted problem files under `roots` with the default extension and exclusions.
pub fn find_pg_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    PgFileWalker::new(roots.to_vec()).walk()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_walk_filters_extension_and_git() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("b/second.pg"));
        touch(&root.join("a/first.pg"));
        touch(&root.join("a/notes.txt"));
        touch(&root.join(".git/objects/hidden.pg"));

        let files = find_pg_files(&[root.to_path_buf()]);
        assert_eq!(
            files,
            vec![root.join("a/first.pg"), root.join("b/second.pg")]
        );
    }

    #[test]
    fn test_file_roots_and_duplicates() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let file = root.join("one.pg");
        touch(&file);
        touch(&root.join("two.pl"));

        let files = PgFileWalker::new(vec![
            file.clone(),
            root.to_path_buf(),
            root.join("two.pl"),
            root.join("missing"),
        ])
        .walk();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_custom_extension_and_excludes() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("keep/x.pgml"));
        touch(&root.join("skip/y.pgml"));

        let files = PgFileWalker::new(vec![root.to_path_buf()])
            .with_extension(".pgml")
            .with_exclude_dirs(vec!["skip".to_string()])
            .walk();
        assert_eq!(files, vec![root.join("keep/x.pgml")]);
    }
}
