//! Best-effort page metadata from raw HTML.
//!
//! Each field is looked up through an ordered chain of sources. The first
//! source that yields a usable value wins; a field with no usable source is
//! the empty string. Nothing in here returns an error or panics on bad input.

mod text;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::Metadata;

pub use text::{collapse_whitespace, fold_typographic, normalize};

/// Where a candidate value can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Text of the document's `<title>` element.
    TitleElement,
    /// `content` of a `<meta>` whose `property` or `name` equals the key.
    Meta(&'static str),
    /// `href` of a `<link>` whose `rel` equals the value.
    Link(&'static str),
}

pub const TITLE_SOURCES: &[Source] = &[
    Source::TitleElement,
    Source::Meta("og:title"),
    Source::Meta("twitter:title"),
];

pub const DESCRIPTION_SOURCES: &[Source] = &[
    Source::Meta("description"),
    Source::Meta("og:description"),
    Source::Meta("twitter:description"),
];

pub const IMAGE_SOURCES: &[Source] = &[
    Source::Meta("og:image"),
    Source::Meta("twitter:image"),
    Source::Link("icon"),
    Source::Link("shortcut icon"),
];

/// Extract title, description and image from `html`.
///
/// `source_url` is the address the page was fetched from and serves as the
/// base for resolving relative image URLs.
pub fn extract(html: &str, source_url: &str) -> Metadata {
    let document = Html::parse_document(html);
    let base = Url::parse(source_url.trim()).ok();

    Metadata {
        title: first_text(&document, TITLE_SOURCES),
        description: first_text(&document, DESCRIPTION_SOURCES),
        image: first_image(&document, IMAGE_SOURCES, base.as_ref()),
    }
}

fn first_text(doc: &Html, sources: &[Source]) -> String {
    sources
        .iter()
        .find_map(|&source| {
            candidates(doc, source)
                .into_iter()
                .map(|raw| normalize(&raw))
                .find(|text| !text.is_empty())
        })
        .unwrap_or_default()
}

fn first_image(doc: &Html, sources: &[Source], base: Option<&Url>) -> String {
    sources
        .iter()
        .find_map(|&source| {
            candidates(doc, source)
                .into_iter()
                .find_map(|raw| resolve_url(base, &raw))
        })
        .unwrap_or_default()
}

/// Raw values for `source`, in document order.
fn candidates(doc: &Html, source: Source) -> Vec<String> {
    match source {
        Source::TitleElement => select(doc, "title")
            .into_iter()
            .filter(|el| !inside_svg(el))
            .map(|el| el.text().collect::<String>())
            .collect(),
        Source::Meta(key) => select(doc, "meta")
            .into_iter()
            .filter(|el| meta_key_matches(el, key))
            .filter_map(|el| el.value().attr("content").map(str::to_string))
            .collect(),
        Source::Link(rel) => select(doc, "link")
            .into_iter()
            .filter(|el| link_rel_matches(el, rel))
            .filter_map(|el| el.value().attr("href").map(str::to_string))
            .collect(),
    }
}

fn select<'a>(doc: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => doc.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

// Inline SVG icons carry their own <title> elements.
fn inside_svg(el: &ElementRef<'_>) -> bool {
    el.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| e.name().eq_ignore_ascii_case("svg"))
    })
}

fn meta_key_matches(el: &ElementRef<'_>, key: &str) -> bool {
    let meta = el.value();
    ["property", "name"].iter().any(|attr| {
        meta.attr(attr)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case(key))
    })
}

fn link_rel_matches(el: &ElementRef<'_>, rel: &str) -> bool {
    el.value()
        .attr("rel")
        .is_some_and(|value| collapse_whitespace(value).eq_ignore_ascii_case(rel))
}

/// Resolve `candidate` against `base` into an absolute URL. Without a usable
/// base only absolute candidates survive.
pub fn resolve_url(base: Option<&Url>, candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    let resolved = match base {
        Some(base) => base.join(candidate),
        None => Url::parse(candidate),
    };

    resolved.ok().map(String::from)
}
