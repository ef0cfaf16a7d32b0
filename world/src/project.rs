//! Persisted project root and the storage boundary around it.

use std::{collections::BTreeMap, convert::Infallible};

use quadcaster_core::MapKind;
use serde::{Deserialize, Serialize};

use crate::{GridMap, Level, QuadtreeMap};

/// Everything a user authors under one project name.
///
/// Both representations are always present; `active_map_kind` selects which
/// one is edited and played.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Uniform grid representation.
    pub grid_map: GridMap,
    /// Quadtree representation.
    pub quadtree_map: QuadtreeMap,
    /// Representation the user last worked on.
    #[serde(default)]
    pub active_map_kind: MapKind,
}

impl Project {
    /// Owned copy of the active representation, ready to be played.
    #[must_use]
    pub fn level(&self) -> Level {
        match self.active_map_kind {
            MapKind::Grid => Level::Grid(self.grid_map.clone()),
            MapKind::Quadtree => Level::Quadtree(self.quadtree_map.clone()),
        }
    }
}

/// Storage boundary for projects.
///
/// Implementations hand out owned copies; nothing they return aliases the
/// stored data.
pub trait ProjectRepository {
    /// Failure raised by the backing store.
    type Error;

    /// Loads the named project, or `None` when it does not exist.
    fn load(&self, name: &str) -> Result<Option<Project>, Self::Error>;

    /// Stores the project under `name`, replacing any previous content.
    fn save(&mut self, name: &str, project: &Project) -> Result<(), Self::Error>;

    /// Names of every stored project.
    fn list(&self) -> Result<Vec<String>, Self::Error>;

    /// Removes the named project and reports whether it existed.
    fn delete(&mut self, name: &str) -> Result<bool, Self::Error>;
}

/// Loads the named project, creating and saving the default one when absent.
pub fn load_or_init<R>(repository: &mut R, name: &str) -> Result<Project, R::Error>
where
    R: ProjectRepository + ?Sized,
{
    if let Some(project) = repository.load(name)? {
        return Ok(project);
    }
    let project = Project::default();
    repository.save(name, &project)?;
    Ok(project)
}

/// Volatile repository used by tests and throwaway sessions.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProjects {
    projects: BTreeMap<String, Project>,
}

impl InMemoryProjects {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectRepository for InMemoryProjects {
    type Error = Infallible;

    fn load(&self, name: &str) -> Result<Option<Project>, Self::Error> {
        Ok(self.projects.get(name).cloned())
    }

    fn save(&mut self, name: &str, project: &Project) -> Result<(), Self::Error> {
        let _ = self.projects.insert(name.to_owned(), project.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.projects.keys().cloned().collect())
    }

    fn delete(&mut self, name: &str) -> Result<bool, Self::Error> {
        Ok(self.projects.remove(name).is_some())
    }
}
