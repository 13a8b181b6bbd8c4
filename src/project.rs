//! On-disk layout of backup projects.
//!
//! ```text
//! <root>/<project>/<database>/<collection>.json
//! ```
//!
//! Names are used verbatim as path components; no escaping is performed, so
//! callers must avoid OS-reserved characters in project, database, and
//! collection names.

use crate::error::{self, Error, Result};
use std::path::{Path, PathBuf};

/// Directory of one named backup project.
#[must_use]
pub fn project_dir(root: &Path, project: &str) -> PathBuf {
    root.join(project)
}

/// Directory of one database inside a project.
#[must_use]
pub fn database_dir(root: &Path, project: &str, database: &str) -> PathBuf {
    root.join(project).join(database)
}

/// Snapshot file of one collection.
#[must_use]
pub fn collection_file(database_dir: &Path, collection: &str) -> PathBuf {
    database_dir.join(format!("{collection}.json"))
}

/// List existing backup projects (sub-directories of the root).
///
/// A missing root is an empty listing, not an error - no backup has been
/// taken yet.
pub fn list_projects(root: &Path) -> Result<Vec<String>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    list_subdirectories(root)
}

/// List the database sub-directories of a chosen project.
pub fn list_databases(root: &Path, project: &str) -> Result<Vec<String>> {
    let dir = project_dir(root, project);
    if !dir.is_dir() {
        return Err(Error::ProjectNotFound(project.to_string()));
    }
    list_subdirectories(&dir)
}

/// List the collection names stored for one database of a project
/// (`*.json` basenames).
pub fn list_collections(root: &Path, project: &str, database: &str) -> Result<Vec<String>> {
    let dir = database_dir(root, project, database);
    let mut names = Vec::new();
    for entry in error::read_dir(&dir)? {
        let entry = entry.map_err(|e| Error::DirectoryRead {
            path: dir.clone(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    // Sorted for stable prompt numbering
    names.sort();
    Ok(names)
}

fn list_subdirectories(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in error::read_dir(dir)? {
        let entry = entry.map_err(|e| Error::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_root_is_empty() {
        let temp = tempdir().unwrap();
        let projects = list_projects(&temp.path().join("never-created")).unwrap();
        assert!(projects.is_empty());
    }

    #[test]
    fn test_projects_are_directories_only_and_sorted() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("nightly")).unwrap();
        fs::create_dir(temp.path().join("adhoc")).unwrap();
        fs::write(temp.path().join("stray.txt"), "x").unwrap();

        assert_eq!(list_projects(temp.path()).unwrap(), vec!["adhoc", "nightly"]);
    }

    #[test]
    fn test_unknown_project_errors() {
        let temp = tempdir().unwrap();
        let err = list_databases(temp.path(), "ghost").unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_collections_strip_json_extension() {
        let temp = tempdir().unwrap();
        let db = temp.path().join("proj").join("app");
        fs::create_dir_all(&db).unwrap();
        fs::write(db.join("users.json"), "[]").unwrap();
        fs::write(db.join("logs.json"), "[]").unwrap();
        fs::write(db.join("notes.txt"), "ignored").unwrap();

        assert_eq!(
            list_collections(temp.path(), "proj", "app").unwrap(),
            vec!["logs", "users"]
        );
        assert_eq!(
            list_databases(temp.path(), "proj").unwrap(),
            vec!["app"]
        );
    }
}
