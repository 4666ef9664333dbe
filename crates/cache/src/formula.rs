//! Generation-based cache of rendered formulas
//!
//! The cache file holds one generation counter plus one entry per formula
//! hash. Every load of a valid file starts a new generation; every fetch
//! stamps the entry it touches with that generation; on save, entries that
//! were not touched during the current generation are dropped. A formula that
//! is no longer used by the documentation therefore disappears after one
//! build.

use crate::hash::ContentHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::io::Write;
use std::path::Path;
use texsvg_core::{Error, RenderConfig, Renderer, Rendering, Result};
use tracing::{debug, info, warn};

/// Schema version of the cache file. Files with a different version are
/// treated as absent.
pub const CACHE_VERSION: u32 = 0;

/// A cached rendering together with the generation that last used it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Last build generation that fetched or rendered this formula
    pub generation: u64,
    /// Depth reported by the renderer
    pub depth: Option<f64>,
    /// Raw renderer output
    pub svg: String,
}

/// On-disk layout, encoded positionally as `(version, generation, entries)`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    generation: u64,
    entries: BTreeMap<ContentHash, CacheEntry>,
}

/// Borrowed form of [`CacheFile`] with the pruned entry set
#[derive(Serialize)]
struct PrunedCacheFile<'a> {
    version: u32,
    generation: u64,
    entries: BTreeMap<&'a ContentHash, &'a CacheEntry>,
}

/// Cache of rendered formulas for one build.
///
/// A disabled cache renders every formula directly and never persists
/// anything.
#[derive(Debug, Default)]
pub struct FormulaCache {
    state: Option<CacheFile>,
}

impl FormulaCache {
    /// A cache that passes every fetch straight to the renderer
    #[must_use]
    pub fn disabled() -> Self {
        Self { state: None }
    }

    /// An enabled cache with no entries, at generation zero
    #[must_use]
    pub fn empty() -> Self {
        Self {
            state: Some(CacheFile {
                version: CACHE_VERSION,
                ..CacheFile::default()
            }),
        }
    }

    /// Load the cache for a new build.
    ///
    /// Without a path caching is disabled. A missing, unreadable, corrupt or
    /// version-mismatched file yields an empty cache at generation zero; a
    /// valid file is loaded and its generation bumped by one.
    #[must_use]
    pub fn initialize(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            debug!("No formula cache path given, caching disabled");
            return Self::disabled();
        };

        match load(path) {
            Some(file) => {
                info!(
                    path = %path.display(),
                    entries = file.entries.len(),
                    generation = file.generation,
                    "Loaded formula cache"
                );
                Self { state: Some(file) }
            }
            None => Self::empty(),
        }
    }

    /// Whether fetches are cached at all
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    /// Generation of the current build, `None` when disabled
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        self.state.as_ref().map(|file| file.generation)
    }

    /// Number of entries held in memory, touched or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.as_ref().map_or(0, |file| file.entries.len())
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up an entry by hash without touching its generation
    #[must_use]
    pub fn get(&self, hash: &ContentHash) -> Option<&CacheEntry> {
        self.state.as_ref()?.entries.get(hash)
    }

    /// Whether a rendering of `formula` is cached
    #[must_use]
    pub fn contains(&self, formula: &str) -> bool {
        self.get(&ContentHash::of(formula)).is_some()
    }

    /// Return the cached rendering of `formula`, rendering and storing it on a
    /// miss.
    ///
    /// A hit stamps the entry with the current generation and returns the
    /// stored depth and markup unchanged. `formula` must already be wrapped in
    /// its math-mode delimiters.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error on a miss; nothing is stored for the
    /// failed formula.
    pub fn fetch_or_render<R: Renderer + ?Sized>(
        &mut self,
        formula: &str,
        renderer: &R,
        config: &RenderConfig,
    ) -> Result<Rendering> {
        let Some(file) = self.state.as_mut() else {
            return renderer.render(formula, config);
        };

        let hash = ContentHash::of(formula);
        let generation = file.generation;
        match file.entries.entry(hash) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.generation = generation;
                debug!(hash = %hash, "Formula cache hit");
                Ok(Rendering::new(entry.depth, entry.svg.clone()))
            }
            Entry::Vacant(vacant) => {
                debug!(hash = %hash, "Formula cache miss, rendering");
                let rendering = renderer.render(formula, config)?;
                vacant.insert(CacheEntry {
                    generation,
                    depth: rendering.depth,
                    svg: rendering.svg.clone(),
                });
                Ok(rendering)
            }
        }
    }

    /// Save the entries used during this build.
    ///
    /// Does nothing when the cache is disabled, no path is given or the cache
    /// holds no entries at all; no file is created in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be encoded or written.
    pub fn persist(&self, path: Option<&Path>) -> Result<()> {
        let Some(file) = self.state.as_ref() else {
            debug!("Formula cache disabled, nothing to persist");
            return Ok(());
        };
        let Some(path) = path else {
            debug!(
                entries = file.entries.len(),
                "No formula cache path given, not saving"
            );
            return Ok(());
        };
        if file.entries.is_empty() {
            debug!(path = %path.display(), "Formula cache is empty, not saving");
            return Ok(());
        }

        let pruned = PrunedCacheFile {
            version: CACHE_VERSION,
            generation: file.generation,
            entries: file
                .entries
                .iter()
                .filter(|(_, entry)| entry.generation == file.generation)
                .collect(),
        };
        let bytes = rmp_serde::to_vec(&pruned)
            .map_err(|e| Error::serialization(format!("Failed to encode formula cache: {e}")))?;
        write_atomically(path, &bytes)?;

        info!(
            path = %path.display(),
            kept = pruned.entries.len(),
            dropped = file.entries.len() - pruned.entries.len(),
            generation = file.generation,
            "Saved formula cache"
        );
        Ok(())
    }
}

fn load(path: &Path) -> Option<CacheFile> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No formula cache found, starting empty");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), "Ignoring unreadable formula cache: {e}");
            return None;
        }
    };

    let file: CacheFile = match rmp_serde::from_slice(&bytes) {
        Ok(file) => file,
        Err(e) => {
            warn!(path = %path.display(), "Ignoring corrupt formula cache: {e}");
            return None;
        }
    };

    if file.version != CACHE_VERSION {
        info!(
            path = %path.display(),
            found = file.version,
            expected = CACHE_VERSION,
            "Ignoring formula cache with a different schema version"
        );
        return None;
    }

    // Each load starts a new generation
    let Some(generation) = file.generation.checked_add(1) else {
        warn!(
            path = %path.display(),
            generation = file.generation,
            "Ignoring formula cache with exhausted generation counter"
        );
        return None;
    };
    Some(CacheFile { generation, ..file })
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(e, parent, "create_dir_all"))?;
    }

    // Write to a temporary file first, then rename atomically
    let tmp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&tmp_path).map_err(|e| Error::io(e, &tmp_path, "create"))?;
    file.write_all(bytes)
        .map_err(|e| Error::io(e, &tmp_path, "write"))?;
    file.sync_all()
        .map_err(|e| Error::io(e, &tmp_path, "sync"))?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::io(e, path, "rename")
    })
}
