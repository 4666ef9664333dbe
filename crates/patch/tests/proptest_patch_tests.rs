//! Property-based tests for markup patching.
//!
//! These tests verify the behavioral contracts of the patcher:
//! - Output is a pure function of the inputs and the starting counter
//! - Fragments patched on the same page never share an id
//! - The counter advances exactly once per fragment

use proptest::prelude::*;
use std::collections::HashSet;
use texsvg_core::RenderConfig;
use texsvg_patch::MarkupPatcher;

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// A dvisvgm-shaped document using `glyphs` glyph definitions.
fn dvisvgm_output(glyphs: &[(u8, u16)], width: f64, height: f64) -> String {
    let mut svg = format!(
        "<?xml version='1.0' encoding='UTF-8'?>\n\
         <!-- This file was generated by dvisvgm 2.13.1 -->\n\
         <svg height='{height}pt' version='1.1' viewBox='0 -7 {width} {height}' width='{width}pt' \
         xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink'>\n<defs>\n"
    );
    for (font, glyph) in glyphs {
        svg.push_str(&format!("<path d='M0 0Z' id='g{font}-{glyph}'/>\n"));
    }
    svg.push_str("</defs>\n<g id='page1'>\n");
    for (font, glyph) in glyphs {
        svg.push_str(&format!("<use x='0' xlink:href='#g{font}-{glyph}' y='0'/>\n"));
    }
    svg.push_str("</g>\n</svg>");
    svg
}

fn document_strategy() -> impl Strategy<Value = String> {
    (
        proptest::collection::vec((0u8..4, 0u16..200), 0..8),
        0.5f64..40.0,
        0.5f64..20.0,
    )
        .prop_map(|(glyphs, width, height)| dvisvgm_output(&glyphs, width, height))
}

fn ids(fragment: &str) -> HashSet<String> {
    fragment
        .split(" id='")
        .skip(1)
        .filter_map(|rest| rest.split('\'').next())
        .map(String::from)
        .collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn patch_is_deterministic(
        doc in document_strategy(),
        depth in proptest::option::of(0.0f64..5.0),
        warmup in 0usize..5,
    ) {
        let mut a = MarkupPatcher::new(&RenderConfig::default());
        let mut b = MarkupPatcher::new(&RenderConfig::default());
        for _ in 0..warmup {
            a.patch("w", &doc, None, "");
            b.patch("w", &doc, None, "");
        }

        let left = a.patch("\\sum_i x_i", &doc, depth, " class=\"m-math\"");
        let right = b.patch("\\sum_i x_i", &doc, depth, " class=\"m-math\"");
        prop_assert_eq!(left, right);
    }

    #[test]
    fn fragments_on_one_page_never_share_ids(docs in proptest::collection::vec(document_strategy(), 2..6)) {
        let mut patcher = MarkupPatcher::default();
        let mut seen: HashSet<String> = HashSet::new();
        for doc in &docs {
            let fragment = patcher.patch("x", doc, None, "");
            let fragment_ids = ids(&fragment);
            let page_id = format!("eq{}-page1", patcher.counter());
            prop_assert!(fragment_ids.contains(&page_id));
            prop_assert!(seen.is_disjoint(&fragment_ids));
            seen.extend(fragment_ids);
        }
    }

    #[test]
    fn counter_advances_once_per_fragment(docs in proptest::collection::vec(document_strategy(), 0..10)) {
        let mut patcher = MarkupPatcher::default();
        for doc in &docs {
            patcher.patch("x", doc, Some(0.1), "");
        }
        prop_assert_eq!(patcher.counter() as usize, docs.len());
    }

    #[test]
    fn header_is_always_replaced(doc in document_strategy()) {
        let fragment = MarkupPatcher::default().patch("x", &doc, None, "");
        prop_assert!(fragment.starts_with("<svg style=\"width: "));
        prop_assert!(!fragment.contains("xmlns"));
    }
}
