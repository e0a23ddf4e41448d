// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! HTML cleaning and extraction (§4.2).
//!
//! Parse failures never panic: a malformed document degrades to an empty
//! body, empty weighted-tag map, and empty link list so P1's per-record error
//! containment can still classify the record as skippable rather than fatal.

use crate::types::TAG_WEIGHTS;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use url::Url;

/// Result of extracting one crawled HTML document.
pub struct Extracted {
    pub body_text: String,
    /// text -> accumulated tag weight, summed across repeated occurrences.
    pub weighted_text: HashMap<String, f64>,
    pub links: Vec<String>,
}

/// Extract body text, weighted-tag text, and outbound links from `content`.
///
/// `encoding` and `base_url` come straight from the input record; `base_url`
/// anchors relative `<a href>` resolution.
pub fn extract(content: &str, encoding: &str, base_url: &str) -> Extracted {
    let doc = Html::parse_document(content);

    let body_text = clean_text(&body_text_raw(&doc, encoding));
    let weighted_text = weighted_tag_text(&doc);
    let links = extract_links(&doc, base_url);

    Extracted {
        body_text,
        weighted_text,
        links,
    }
}

/// Per §4.2: if `utf-8` encoding and at least one `<p>` exists, join stripped
/// `<p>` text with single spaces; otherwise fall back to the whole document's
/// text.
fn body_text_raw(doc: &Html, encoding: &str) -> String {
    let p_selector = Selector::parse("p").unwrap();
    let paragraphs: Vec<ElementRef> = doc.select(&p_selector).collect();

    if encoding.eq_ignore_ascii_case("utf-8") && !paragraphs.is_empty() {
        paragraphs
            .iter()
            .map(|p| p.text().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        full_document_text(doc.root_element())
    }
}

/// Recursive fallback: concatenate all text nodes, skipping `<script>`/`<style>`.
fn full_document_text(element: ElementRef) -> String {
    const IGNORED_ELEMENTS: &[&str] = &["script", "style"];
    let mut text = String::new();
    for child in element.children() {
        match child.value() {
            Node::Element(e) => {
                if !IGNORED_ELEMENTS.contains(&e.name()) {
                    if let Some(el_ref) = ElementRef::wrap(child) {
                        text.push_str(&full_document_text(el_ref));
                    }
                }
            }
            Node::Text(t) => {
                let t = t.trim();
                if !t.is_empty() {
                    text.push_str(t);
                    text.push(' ');
                }
            }
            _ => {}
        }
    }
    text
}

/// Strip non-ASCII bytes, replace `-` with space, collapse whitespace.
fn clean_text(s: &str) -> String {
    let ascii_only: String = s.chars().filter(|c| c.is_ascii()).collect();
    let dehyphenated = ascii_only.replace('-', " ");
    dehyphenated.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collect stripped text of every occurrence of each weighted tag, summing
/// weights for repeated identical texts.
fn weighted_tag_text(doc: &Html) -> HashMap<String, f64> {
    let mut out: HashMap<String, f64> = HashMap::new();
    for (tag, weight) in TAG_WEIGHTS {
        let selector = match Selector::parse(tag) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for el in doc.select(&selector) {
            let text = clean_text(&el.text().collect::<Vec<_>>().join(" "));
            if text.is_empty() {
                continue;
            }
            *out.entry(text).or_insert(0.0) += weight;
        }
    }
    out
}

fn extract_links(doc: &Html, base_url: &str) -> Vec<String> {
    let selector = match Selector::parse("a") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let base = Url::parse(base_url).ok();

    doc.select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| resolve(base.as_ref(), href))
        .collect()
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(|u| u.to_string()),
        None => Url::parse(href).ok().map(|u| u.to_string()),
    }
}
