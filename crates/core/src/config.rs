//! Render configuration shared by the renderer backend and the markup patcher
//!
//! The zoom factor appears twice in the pipeline: dvisvgm scales the glyphs by
//! it, and the patcher scales the reported depth by it when computing the
//! `vertical-align` style. Both read it from the same [`RenderConfig`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default LaTeX preamble. Libertine fonts are left out as they mess up the
/// glyph metrics.
pub const DEFAULT_PREAMBLE: &str = r"
\usepackage[utf8x]{inputenc}
\usepackage{amsmath}
\usepackage{amsfonts}
\usepackage{amssymb}
\usepackage{gensymb}
\usepackage{newtxtext}
";

/// Default dvisvgm zoom, matching the page font size.
pub const DEFAULT_ZOOM: f64 = 1.25;

/// 1 pt is 1.333333 px and the base font size is 16 px.
pub const DEFAULT_PT_TO_EM: f64 = 1.333_333 / 16.0;

/// Configuration bundle handed to the renderer and the patcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// LaTeX preamble (package imports, macros) used for every formula
    pub preamble: String,
    /// Glyph zoom applied by dvisvgm, also used to scale the depth
    pub zoom: f64,
    /// Conversion factor from SVG points to CSS `em`
    pub pt_to_em: f64,
    /// Emit glyphs as paths instead of embedding fonts
    pub no_fonts: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
            zoom: DEFAULT_ZOOM,
            pt_to_em: DEFAULT_PT_TO_EM,
            no_fonts: true,
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from TOML. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the TOML is malformed or a scale
    /// factor is not a positive finite number.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| Error::configuration(format!("Failed to parse render config: {e}")))?;
        config.validate()?;
        tracing::debug!(
            zoom = config.zoom,
            pt_to_em = config.pt_to_em,
            "Loaded render configuration"
        );
        Ok(config)
    }

    /// Check that both scale factors are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("zoom", self.zoom), ("ptToEm", self.pt_to_em)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::configuration(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Arguments a dvisvgm-based backend should pass so that its glyph
    /// scaling agrees with the depth scaling done by the patcher.
    #[must_use]
    pub fn dvisvgm_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(3);
        if self.no_fonts {
            args.push("--no-fonts".to_string());
        }
        args.push("-Z".to_string());
        args.push(self.zoom.to_string());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_font_size() {
        let config = RenderConfig::default();
        assert!((config.zoom - 1.25).abs() < f64::EPSILON);
        assert!((config.pt_to_em - 0.083_333_312_5).abs() < 1e-12);
        assert!(config.preamble.contains(r"\usepackage{amsmath}"));
        assert!(config.no_fonts);
    }

    #[test]
    fn toml_overrides_keep_other_defaults() {
        let config = RenderConfig::from_toml_str("zoom = 1.5\n").unwrap();
        assert!((config.zoom - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.preamble, DEFAULT_PREAMBLE);
        assert!((config.pt_to_em - DEFAULT_PT_TO_EM).abs() < f64::EPSILON);
    }

    #[test]
    fn toml_uses_camel_case_keys() {
        let config =
            RenderConfig::from_toml_str("ptToEm = 0.1\nnoFonts = false\npreamble = ''\n").unwrap();
        assert!((config.pt_to_em - 0.1).abs() < f64::EPSILON);
        assert!(!config.no_fonts);
        assert!(config.preamble.is_empty());
    }

    #[test]
    fn rejects_non_positive_zoom() {
        let err = RenderConfig::from_toml_str("zoom = 0.0\n").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("zoom"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = RenderConfig::from_toml_str("zoom = [").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn dvisvgm_args_follow_zoom() {
        assert_eq!(
            RenderConfig::default().dvisvgm_args(),
            vec!["--no-fonts", "-Z", "1.25"]
        );

        let config = RenderConfig {
            zoom: 2.0,
            no_fonts: false,
            ..RenderConfig::default()
        };
        assert_eq!(config.dvisvgm_args(), vec!["-Z", "2"]);
    }
}
