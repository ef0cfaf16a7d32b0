//! Project store keeping one pretty-printed JSON file per project.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use quadcaster_world::{Project, ProjectRepository};
use thiserror::Error;

const PROJECT_EXTENSION: &str = "json";

/// Failures raised by [`FileProjectStore`].
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    /// The named project has no file in the store.
    #[error("project '{0}' does not exist")]
    NotFound(String),
    /// The name cannot be used as a file stem.
    #[error("'{0}' is not a valid project name")]
    InvalidName(String),
    /// Reading or writing the store failed.
    #[error("failed to access {path}")]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// A project file did not hold a valid project.
    #[error("project file {path} is malformed")]
    Json {
        /// File being decoded.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Directory-backed [`ProjectRepository`].
#[derive(Clone, Debug)]
pub(crate) struct FileProjectStore {
    root: PathBuf,
}

impl FileProjectStore {
    /// Opens the store rooted at `root`. The directory is created on first save.
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loads the named project, failing when it does not exist.
    pub(crate) fn require(&self, name: &str) -> Result<Project, StoreError> {
        self.load(name)?
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.{PROJECT_EXTENSION}")))
    }
}

/// Accepts ASCII letters, digits, `-` and `_` so names map to portable file stems.
fn validate_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_owned()))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_owned(),
        source,
    }
}

impl ProjectRepository for FileProjectStore {
    type Error = StoreError;

    fn load(&self, name: &str) -> Result<Option<Project>, Self::Error> {
        let path = self.path_for(name)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(io_error(&path)(error)),
        };
        let project = serde_json::from_str(&text).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        debug!("loaded project '{name}' from {}", path.display());
        Ok(Some(project))
    }

    fn save(&mut self, name: &str, project: &Project) -> Result<(), Self::Error> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root).map_err(io_error(&self.root))?;
        let json = serde_json::to_string_pretty(project).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(io_error(&path))?;
        info!("saved project '{name}' to {}", path.display());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(io_error(&self.root)(error)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_error(&self.root))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PROJECT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if validate_name(stem).is_ok() {
                    names.push(stem.to_owned());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&mut self, name: &str) -> Result<bool, Self::Error> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("deleted project '{name}'");
                Ok(true)
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(io_error(&path)(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadcaster_core::{CellCoord, MapKind, ScaleDirection};
    use quadcaster_world::{load_or_init, scale};

    fn store() -> (tempfile::TempDir, FileProjectStore) {
        let dir = tempfile::tempdir().expect("temporary directory");
        let store = FileProjectStore::new(dir.path().join("projects"));
        (dir, store)
    }

    #[test]
    fn missing_store_lists_nothing() {
        let (_dir, store) = store();
        assert!(store.list().expect("list").is_empty());
        assert!(store.load("absent").expect("load").is_none());
    }

    #[test]
    fn saved_projects_load_back_exactly() {
        let (_dir, mut store) = store();
        let mut project = Project::default();
        let _ = project.grid_map.paint_wall(CellCoord::new(1, 6));
        project.grid_map.set_player(2.0 / 3.0, 0.1 + 0.2);
        let _ = project.quadtree_map.subdivide_at(5.0, 5.0);
        let _ = project.quadtree_map.place_player(7.9, 7.9);
        assert!(scale(&mut project.quadtree_map, ScaleDirection::Down));
        project.active_map_kind = MapKind::Quadtree;

        store.save("level-1", &project).expect("save");
        let loaded = store.require("level-1").expect("load");

        assert_eq!(loaded, project);
    }

    #[test]
    fn list_is_sorted_and_skips_foreign_files() {
        let (dir, mut store) = store();
        store.save("beta", &Project::default()).expect("save beta");
        store.save("alpha", &Project::default()).expect("save alpha");
        fs::write(dir.path().join("projects").join("notes.txt"), "hi").expect("write");

        assert_eq!(store.list().expect("list"), vec!["alpha", "beta"]);
    }

    #[test]
    fn delete_reports_whether_a_project_existed() {
        let (_dir, mut store) = store();
        store.save("gone", &Project::default()).expect("save");

        assert!(store.delete("gone").expect("first delete"));
        assert!(!store.delete("gone").expect("second delete"));
        assert!(matches!(store.require("gone"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn names_that_escape_the_store_are_rejected() {
        let (_dir, mut store) = store();
        for name in ["", "../outside", "a/b", "dots.json"] {
            assert!(
                matches!(
                    store.save(name, &Project::default()),
                    Err(StoreError::InvalidName(_))
                ),
                "'{name}' must be rejected"
            );
        }
    }

    #[test]
    fn malformed_files_surface_json_errors() {
        let (dir, store) = store();
        let root = dir.path().join("projects");
        fs::create_dir_all(&root).expect("create store");
        fs::write(root.join("broken.json"), "{ not json").expect("write");

        assert!(matches!(store.load("broken"), Err(StoreError::Json { .. })));
    }

    #[test]
    fn load_or_init_persists_the_default_project() {
        let (_dir, mut store) = store();
        let project = load_or_init(&mut store, "fresh").expect("init");

        assert_eq!(project, Project::default());
        assert_eq!(store.list().expect("list"), vec!["fresh"]);
    }
}
