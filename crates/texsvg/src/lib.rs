//! Cached LaTeX-to-SVG math rendering for documentation generators.
//!
//! Ties together the formula cache ([`texsvg_cache`]) and the markup patcher
//! ([`texsvg_patch`]) behind a [`MathContext`] owned by one build. The
//! LaTeX-to-SVG backend itself is supplied by the caller as a [`Renderer`].
//!
//! # Example
//!
//! ```no_run
//! use texsvg::{MathContext, MathMode, RenderConfig, Rendering, Result};
//!
//! fn dvisvgm(formula: &str, config: &RenderConfig) -> Result<Rendering> {
//!     // Run latex + dvisvgm with `config.preamble` and `config.dvisvgm_args()`
//!     # let _ = (formula, config);
//!     # unimplemented!()
//! }
//!
//! let mut math = MathContext::new(dvisvgm, RenderConfig::default(), Some("formulas.cache".into()));
//! for page in ["intro", "api"] {
//!     math.start_page();
//!     let html = math.render("a^2 + b^2 = c^2", MathMode::Inline, " class=\"m-math\"")?;
//!     # let _ = (page, html);
//! }
//! math.finish()?;
//! # Ok::<(), texsvg::Error>(())
//! ```

mod context;

pub use context::{MathContext, MathMode};
pub use texsvg_cache::{CACHE_VERSION, CacheEntry, ContentHash, FormulaCache};
pub use texsvg_core::{Error, RenderConfig, Renderer, Rendering, Result};
pub use texsvg_patch::MarkupPatcher;
