//! Build-scoped rendering context

use std::path::{Path, PathBuf};
use texsvg_cache::FormulaCache;
use texsvg_core::{RenderConfig, Renderer, Rendering, Result};
use texsvg_patch::MarkupPatcher;
use tracing::debug;

/// How a formula is laid out in the surrounding document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    /// Inline with text, wrapped in `$...$` and aligned to the text baseline
    Inline,
    /// A block of its own, wrapped in `$$...$$`
    Display,
}

impl MathMode {
    /// Wrap `source` in the math-mode delimiters of this mode
    #[must_use]
    pub fn wrap(self, source: &str) -> String {
        match self {
            Self::Inline => format!("${source}$"),
            Self::Display => format!("$${source}$$"),
        }
    }
}

/// Everything one documentation build needs to render math: the backend, its
/// configuration, the formula cache and the id counter of the current page.
///
/// Create one per build, call [`start_page`](Self::start_page) whenever a new
/// output page begins and [`finish`](Self::finish) once at the end to save
/// the cache.
#[derive(Debug)]
pub struct MathContext<R> {
    renderer: R,
    config: RenderConfig,
    cache: FormulaCache,
    cache_path: Option<PathBuf>,
    patcher: MarkupPatcher,
}

impl<R: Renderer> MathContext<R> {
    /// Start a build, loading the formula cache from `cache_path` if given
    #[must_use]
    pub fn new(renderer: R, config: RenderConfig, cache_path: Option<PathBuf>) -> Self {
        let cache = FormulaCache::initialize(cache_path.as_deref());
        let patcher = MarkupPatcher::new(&config);
        Self {
            renderer,
            config,
            cache,
            cache_path,
            patcher,
        }
    }

    /// Render configuration shared by the backend and the patcher
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The formula cache of this build
    #[must_use]
    pub fn cache(&self) -> &FormulaCache {
        &self.cache
    }

    /// Where the cache is saved by [`finish`](Self::finish)
    #[must_use]
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// Fetch `formula` from the cache or render it. The formula must already
    /// be wrapped in its math-mode delimiters.
    ///
    /// # Errors
    ///
    /// Propagates renderer failures.
    pub fn fetch_or_render(&mut self, formula: &str) -> Result<Rendering> {
        self.cache
            .fetch_or_render(formula, &self.renderer, &self.config)
    }

    /// Patch a rendering into an embeddable fragment
    pub fn patch(&mut self, formula: &str, rendering: &Rendering, attribs: &str) -> String {
        self.patcher
            .patch(formula, &rendering.svg, rendering.depth, attribs)
    }

    /// Render `source` in the given mode and return the patched fragment.
    ///
    /// `source` is the bare formula; it is wrapped in the delimiters of `mode`
    /// for rendering and used as is for the fragment's title. Display math is
    /// block-level and is not baseline-aligned.
    ///
    /// # Errors
    ///
    /// Propagates renderer failures.
    pub fn render(&mut self, source: &str, mode: MathMode, attribs: &str) -> Result<String> {
        let rendering = self.fetch_or_render(&mode.wrap(source))?;
        let depth = match mode {
            MathMode::Inline => rendering.depth,
            MathMode::Display => None,
        };
        Ok(self
            .patcher
            .patch(source, &rendering.svg, depth, attribs))
    }

    /// Mark the start of a new output page
    pub fn start_page(&mut self) {
        self.patcher.start_page();
    }

    /// End the build, saving the formulas used during it.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache file cannot be written.
    pub fn finish(self) -> Result<()> {
        debug!(
            entries = self.cache.len(),
            generation = ?self.cache.generation(),
            "Finishing math rendering"
        );
        self.cache.persist(self.cache_path.as_deref())
    }
}
