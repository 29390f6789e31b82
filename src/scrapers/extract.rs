//! Headline extraction from listing page markup.
//!
//! Extraction is deliberately permissive: headline elements are matched by
//! tag plus a subset of class tokens, and the link is searched for inside the
//! headline element and then inside its parent, because outlets wrap
//! headlines and anchors in different orders. When a site's markup drifts
//! away from its selectors the result is simply empty.

use crate::models::{ExtractedHeadline, LinkScope, Selectors};
use itertools::Itertools;
use scraper::{ElementRef, Html};
use tracing::{debug, instrument};
use url::Url;

/// Extract `(text, link)` pairs from `html`, deduplicated by text in
/// document order.
///
/// An element counts as a headline when its tag equals `selectors.tag` and
/// its class attribute carries every token of `selectors.class_name`. Its
/// link comes from the first matching link element inside it, or, when the
/// site allows it, inside its parent element.
///
/// # Arguments
///
/// * `html` - Raw page body; invalid UTF-8 is replaced, not rejected
/// * `selectors` - Per-site headline and link selectors
/// * `base_url` - Prefix for relative links, see [`resolve_link`]
///
/// # Returns
///
/// Headlines with trimmed, non-empty text and a link that is absolute or
/// empty. Markup that matches nothing yields an empty vector.
#[instrument(level = "debug", skip(html), fields(bytes = html.len()))]
pub fn extract_headlines(html: &[u8], selectors: &Selectors<'_>, base_url: &str) -> Vec<ExtractedHeadline> {
    let markup = String::from_utf8_lossy(html);
    let document = Html::parse_document(&markup);

    let headline_classes = class_tokens(selectors.class_name);
    let link_classes = class_tokens(selectors.link_class);

    let headlines = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches_selector(el, selectors.tag, &headline_classes))
        .filter_map(|el| {
            let text = element_text(&el);
            if text.is_empty() {
                return None;
            }
            let link = find_link(el, selectors, &link_classes)
                .map(|href| resolve_link(href, base_url))
                .unwrap_or_default();
            Some(ExtractedHeadline { text, link })
        })
        .unique_by(|h| h.text.clone())
        .collect::<Vec<_>>();

    debug!(count = headlines.len(), "Extracted headlines");
    headlines
}

/// Resolve `link` against `base_url`.
///
/// Absolute URLs pass through unchanged. Relative paths are joined to the
/// base with exactly one slash. A relative link with no base is dropped.
pub fn resolve_link(link: &str, base_url: &str) -> String {
    let link = link.trim();
    if link.is_empty() || Url::parse(link).is_ok() {
        return link.to_string();
    }
    if base_url.is_empty() {
        return String::new();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        link.trim_start_matches('/')
    )
}

fn class_tokens(set: &str) -> Vec<&str> {
    set.split_whitespace().collect()
}

/// Tag matches and the element carries every required class token.
fn matches_selector(el: &ElementRef<'_>, tag: &str, classes: &[&str]) -> bool {
    let value = el.value();
    value.name().eq_ignore_ascii_case(tag)
        && classes.iter().all(|token| value.classes().any(|c| c == *token))
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// First matching descendant of `scope`, excluding `scope` itself.
fn first_descendant<'a>(scope: ElementRef<'a>, tag: &str, classes: &[&str]) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| matches_selector(el, tag, classes))
}

fn find_link<'a>(headline: ElementRef<'a>, selectors: &Selectors<'_>, classes: &[&str]) -> Option<&'a str> {
    let candidate = first_descendant(headline, selectors.link_tag, classes).or_else(|| {
        match selectors.link_scope {
            LinkScope::SelfOnly => None,
            LinkScope::SelfThenParent => headline
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(|parent| first_descendant(parent, selectors.link_tag, classes)),
        }
    })?;
    candidate
        .value()
        .attr("href")
        .filter(|href| !href.trim().is_empty())
}
