//! Content-addressed formula caching for texsvg
//!
//! Rendering a formula through LaTeX and dvisvgm is by far the slowest step
//! of a documentation build. This crate keeps the renderer output between
//! builds:
//! - Entries are keyed by the SHA-1 of the formula text, delimiters included
//! - Each load of the cache file starts a new generation
//! - Entries not used during a generation are dropped when the cache is saved
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use texsvg_cache::FormulaCache;
//! use texsvg_core::{RenderConfig, Rendering, Result};
//!
//! let path = Path::new("formulas.cache");
//! let config = RenderConfig::default();
//! let renderer = |formula: &str, _: &RenderConfig| -> Result<Rendering> {
//!     Ok(Rendering::new(None, format!("<svg><!-- {formula} --></svg>")))
//! };
//!
//! let mut cache = FormulaCache::initialize(Some(path));
//! let _rendering = cache.fetch_or_render("$e^{i\\pi} = -1$", &renderer, &config)?;
//! cache.persist(Some(path))?;
//! # Ok::<(), texsvg_core::Error>(())
//! ```

mod formula;
mod hash;

pub use formula::{CACHE_VERSION, CacheEntry, FormulaCache};
pub use hash::ContentHash;
