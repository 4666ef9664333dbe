//! Markup patching for dvisvgm output.
//!
//! dvisvgm produces standalone SVG documents. To embed several of them in
//! one HTML page they need to lose the XML preamble, get CSS sizing in `em`
//! so they scale with the surrounding text, and have their glyph and page
//! ids made unique so that `<use xlink:href='#g0-120'/>` in one formula does
//! not pick up a glyph defined by another.
//!
//! # Example
//!
//! ```
//! use texsvg_core::RenderConfig;
//! use texsvg_patch::MarkupPatcher;
//!
//! let svg = "<?xml version='1.0' encoding='UTF-8'?>
//! <!-- This file was generated by dvisvgm 2.6.3 -->
//! <svg height='9.6pt' version='1.1' viewBox='0 -7.2 9.6 9.6' width='9.6pt' xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>
//! <g id='page1'>
//! </g>
//! </svg>";
//!
//! let mut patcher = MarkupPatcher::new(&RenderConfig::default());
//! let html = patcher.patch("x", svg, None, " class=\"m-math\"");
//! assert!(html.starts_with("<svg class=\"m-math\" style=\"width: 0.800em; height: 0.800em;\""));
//! assert!(html.contains("<g id='eq1-page1'>"));
//! ```

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;
use texsvg_core::RenderConfig;
use tracing::{debug, warn};

/// Preamble, generator comment and root element as written by dvisvgm.
#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"<\?xml version='1\.0' encoding='UTF-8'\?>\n",
        r"<!-- This file was generated by dvisvgm \d+\.\d+\.\d+ -->\n",
        r"<svg height='(?P<height>[^']+)pt' version='1\.1' viewBox='(?P<viewbox>[^']+)' width='(?P<width>[^']+)pt'",
        r" xmlns='http://www\.w3\.org/2000/svg' xmlns:xlink='http://www\.w3\.org/1999/xlink'>\n",
    ))
    .expect("header pattern is valid")
});

/// Glyph (`g0-120`) and page (`page1`) ids and references to them.
#[expect(clippy::expect_used, reason = "the pattern is a literal")]
static ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<attr> id|xlink:href)='(?P<hash>#?)(?P<id>g\d+-\d+|page\d+)'")
        .expect("id pattern is valid")
});

/// Patches renderer output for embedding in a page.
///
/// Holds the per-page counter used to prefix ids. The counter is bumped once
/// per [`patch`](Self::patch) call and reset by
/// [`start_page`](Self::start_page), so ids stay short and the output of a
/// page does not depend on what was rendered before it.
#[derive(Debug, Clone)]
pub struct MarkupPatcher {
    counter: u32,
    zoom: f64,
    pt_to_em: f64,
}

impl Default for MarkupPatcher {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl MarkupPatcher {
    /// Create a patcher using the zoom and unit conversion of `config`
    #[must_use]
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            counter: 0,
            zoom: config.zoom,
            pt_to_em: config.pt_to_em,
        }
    }

    /// Value used as prefix by the most recent [`patch`](Self::patch) call,
    /// zero at the start of a page
    #[must_use]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Reset the counter at a page boundary
    pub fn start_page(&mut self) {
        debug!(previous = self.counter, "Resetting SVG id counter");
        self.counter = 0;
    }

    /// Turn raw dvisvgm output into an embeddable fragment.
    ///
    /// - the XML preamble, generator comment and namespace declarations are
    ///   dropped and the root element gets `width`/`height` in `em` plus, if
    ///   `depth` is known, a `vertical-align` matching the baseline
    /// - a `<title>` with `formula` is inserted for accessibility
    /// - `attribs` is copied verbatim into the root element, so it should
    ///   start with a space (e.g. `" class=\"m-math\""`)
    /// - glyph and page ids are prefixed with `eq{counter}-`
    ///
    /// Output with an unexpected header is passed through unmodified except
    /// for the id rewriting.
    pub fn patch(&mut self, formula: &str, svg: &str, depth: Option<f64>, attribs: &str) -> String {
        self.counter += 1;
        let counter = self.counter;

        let valign = depth.map_or_else(String::new, |depth| {
            format!(" vertical-align: {:.3}em;", -(depth * self.zoom))
        });

        let body = if HEADER_RE.is_match(svg) {
            HEADER_RE.replacen(svg, 1, |caps: &Captures<'_>| {
                self.root_element(caps, formula, &valign, attribs)
            })
        } else {
            warn!(
                counter,
                "Unexpected SVG header from renderer, leaving it unpatched"
            );
            Cow::Borrowed(svg)
        };

        ID_RE
            .replace_all(&body, |caps: &Captures<'_>| {
                format!(
                    "{}='{}eq{counter}-{}'",
                    &caps["attr"], &caps["hash"], &caps["id"]
                )
            })
            .into_owned()
    }

    fn root_element(
        &self,
        caps: &Captures<'_>,
        formula: &str,
        valign: &str,
        attribs: &str,
    ) -> String {
        let (Ok(width), Ok(height)) = (caps["width"].parse::<f64>(), caps["height"].parse::<f64>())
        else {
            warn!(
                width = &caps["width"],
                height = &caps["height"],
                "Unparsable SVG size, leaving header unpatched"
            );
            return caps[0].to_string();
        };

        format!(
            "<svg{attribs} style=\"width: {:.3}em; height: {:.3}em;{valign}\" viewBox=\"{}\">\n<title>\n{}\n</title>\n",
            width * self.pt_to_em,
            height * self.pt_to_em,
            &caps["viewbox"],
            escape_text(formula),
        )
    }
}

/// Escape text for use as element content
fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
