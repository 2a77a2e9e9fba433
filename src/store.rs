//! # File-backed Project Store
//!
//! Each project is one pretty-printed JSON file in the data directory:
//!
//! ```text
//! data/projects/
//! ├── lx3k9v2a.json              created without a usable name
//! └── lx3k9w10-winter_hat.json   <uniq>-<slug>
//! ```
//!
//! The file stem is the project id. `uniq` is the creation time in base-36
//! milliseconds. Renaming a project through [`ProjectStore::update`]
//! regenerates the stem (keeping `uniq`), so callers must adopt the id it
//! returns. Creates never replace an existing file; other writes overwrite,
//! with no locking or versioning.

use std::collections::HashSet;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::KnitError;
use crate::grid::CellStore;
use crate::project::{ProjectDocument, ProjectSummary};

const EXTENSION: &str = "json";
const MAX_SLUG_LEN: usize = 80;

/// CRUD over project documents in one directory.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    dir: PathBuf,
}

impl ProjectStore {
    /// Use `dir` as the data directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, KnitError> {
        let store = Self { dir: dir.into() };
        store.ensure_dir()?;
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All stored projects, sorted by id. A file that cannot be read or
    /// parsed is still listed, named after its id.
    pub fn list(&self) -> Result<Vec<ProjectSummary>, KnitError> {
        self.ensure_dir()?;
        let mut ids = self.ids()?;
        ids.sort();

        Ok(ids
            .into_iter()
            .map(|id| match self.get(&id) {
                Ok(doc) => ProjectSummary { id, name: doc.name },
                Err(e) => {
                    warn!(%id, error = %e, "listing unreadable project");
                    ProjectSummary { name: id.clone(), id }
                }
            })
            .collect())
    }

    /// Store a new project and return its id.
    #[tracing::instrument(skip(self, doc), fields(name = %doc.name))]
    pub fn create(&self, doc: &ProjectDocument) -> Result<String, KnitError> {
        self.ensure_dir()?;
        let slug = slugify(&doc.name);
        let taken = self.taken_uniqs()?;
        let mut millis = Utc::now().timestamp_millis().max(0) as u64;
        loop {
            let uniq = base36(millis);
            millis += 1;
            if taken.contains(&uniq) {
                continue;
            }
            let id = match &slug {
                Some(slug) => format!("{}-{}", uniq, slug),
                None => uniq,
            };
            match self.write_new(&id, doc) {
                Ok(()) => {
                    info!(%id, cells = doc.grid.len(), "project created");
                    return Ok(id);
                }
                Err(KnitError::Io(e)) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(%id, "id claimed concurrently, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Load a project. Legacy grids are upgraded in the returned document.
    pub fn get(&self, id: &str) -> Result<ProjectDocument, KnitError> {
        let path = self.path_for(id)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(KnitError::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    /// Overwrite a project, returning its (possibly new) id.
    ///
    /// A non-empty name moves the file to `<uniq>-<slug>`, with `untitled`
    /// standing in for a name that slugs to nothing. An id that does not
    /// exist yet is created.
    #[tracing::instrument(skip(self, doc), fields(name = %doc.name))]
    pub fn update(&self, id: &str, doc: &ProjectDocument) -> Result<String, KnitError> {
        self.ensure_dir()?;
        let old_path = self.path_for(id)?;
        let new_id = if doc.name.is_empty() {
            id.to_string()
        } else {
            let uniq = id.split('-').next().unwrap_or(id);
            let slug = slugify(&doc.name).unwrap_or_else(|| "untitled".to_string());
            format!("{}-{}", uniq, slug)
        };

        self.write(&new_id, doc)?;
        if new_id != id && old_path.exists() {
            if let Err(e) = fs::remove_file(&old_path) {
                warn!(%id, error = %e, "failed to remove renamed project file");
            }
        }
        info!(%id, %new_id, "project updated");
        Ok(new_id)
    }

    /// Remove a project. Removing a missing project succeeds.
    pub fn delete(&self, id: &str) -> Result<(), KnitError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(%id, "project deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(%id, "delete of missing project");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn ensure_dir(&self) -> Result<(), KnitError> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    fn write(&self, id: &str, doc: &ProjectDocument) -> Result<(), KnitError> {
        let path = self.path_for(id)?;
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Write a file that must not exist yet.
    fn write_new(&self, id: &str, doc: &ProjectDocument) -> Result<(), KnitError> {
        let path = self.path_for(id)?;
        let json = serde_json::to_string_pretty(doc)?;
        let mut file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Path of the file for `id`. Ids outside `[A-Za-z0-9_-]` cannot name a
    /// stored project.
    fn path_for(&self, id: &str) -> Result<PathBuf, KnitError> {
        if !is_valid_id(id) {
            return Err(KnitError::NotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", id, EXTENSION)))
    }

    fn ids(&self) -> Result<Vec<String>, KnitError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        Ok(ids)
    }

    /// `uniq` prefixes of every stored project.
    fn taken_uniqs(&self) -> Result<HashSet<String>, KnitError> {
        Ok(self
            .ids()?
            .into_iter()
            .map(|id| id.split('-').next().unwrap_or_default().to_string())
            .collect())
    }
}

pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Lowercase, keep `[a-z0-9-_ ]`, trim, whitespace runs to `_`, at most 80
/// characters. `None` when nothing is left.
pub fn slugify(name: &str) -> Option<String> {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | ' '))
        .collect();
    let slug: String = kept
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();
    (!slug.is_empty()).then_some(slug)
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
