//! The seam between texsvg and the LaTeX-to-SVG backend

use crate::{RenderConfig, Result};
use serde::{Deserialize, Serialize};

/// Output of a single render: vertical depth plus the raw SVG markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendering {
    /// Distance from the baseline to the bottom of the formula, in points.
    /// `None` when the backend could not determine it.
    pub depth: Option<f64>,
    /// Raw SVG as emitted by the backend, not yet patched
    pub svg: String,
}

impl Rendering {
    /// Create a rendering from its parts
    #[must_use]
    pub fn new(depth: Option<f64>, svg: impl Into<String>) -> Self {
        Self {
            depth,
            svg: svg.into(),
        }
    }
}

/// A LaTeX-to-SVG backend.
///
/// The formula passed in is already wrapped in its math-mode delimiters
/// (`$...$`, `$$...$$`). Failures, such as a LaTeX compilation error, are
/// reported as [`crate::Error::Render`] and are fatal for that formula.
pub trait Renderer {
    /// Render `formula` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to produce SVG for the formula.
    fn render(&self, formula: &str, config: &RenderConfig) -> Result<Rendering>;
}

impl<F> Renderer for F
where
    F: Fn(&str, &RenderConfig) -> Result<Rendering>,
{
    fn render(&self, formula: &str, config: &RenderConfig) -> Result<Rendering> {
        self(formula, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn closures_are_renderers() {
        let renderer = |formula: &str, config: &RenderConfig| -> Result<Rendering> {
            Ok(Rendering::new(
                Some(config.zoom),
                format!("<svg>{formula}</svg>"),
            ))
        };

        let out = renderer.render("$x$", &RenderConfig::default()).unwrap();
        assert_eq!(out.svg, "<svg>$x$</svg>");
        assert_eq!(out.depth, Some(1.25));
    }

    #[test]
    fn renderer_errors_pass_through() {
        let renderer = |formula: &str, _: &RenderConfig| -> Result<Rendering> {
            Err(Error::render(formula, "boom"))
        };

        let err = renderer
            .render("$\\oops$", &RenderConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Render { ref formula, .. } if formula == "$\\oops$"));
    }
}
