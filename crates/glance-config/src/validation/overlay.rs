//! Validation for selection limits, popup placement, lookup and languages.

use std::collections::HashSet;

use crate::schema::{GlanceConfig, DEFAULT_LANGUAGE};

use super::helpers::{validate_range, validate_range_f64};

pub(crate) fn validate_selection(errors: &mut Vec<String>, config: &GlanceConfig) {
    let s = &config.selection;
    validate_range(errors, "selection.max_chars", s.max_chars as u64, 1, 10_000);
    validate_range(
        errors,
        "selection.double_click_max_words",
        s.double_click_max_words as u64,
        1,
        10,
    );
    validate_range(
        errors,
        "selection.extended_max_words",
        s.extended_max_words as u64,
        1,
        20,
    );
    validate_range(errors, "selection.debounce_ms", s.debounce_ms, 0, 1_000);
    validate_range(
        errors,
        "selection.context_cache_capacity",
        s.context_cache_capacity as u64,
        0,
        100_000,
    );
}

pub(crate) fn validate_popup(errors: &mut Vec<String>, config: &GlanceConfig) {
    let p = &config.popup;
    validate_range_f64(errors, "popup.edge_margin", p.edge_margin, 0.0, 200.0);
    validate_range_f64(errors, "popup.anchor_offset", p.anchor_offset, 0.0, 200.0);
    validate_range_f64(
        errors,
        "popup.estimated_width",
        p.estimated_width,
        50.0,
        4_000.0,
    );
    validate_range_f64(
        errors,
        "popup.estimated_height",
        p.estimated_height,
        50.0,
        4_000.0,
    );
    validate_range(
        errors,
        "popup.close_suppression_ms",
        p.close_suppression_ms,
        0,
        5_000,
    );
    validate_range(errors, "popup.banner_ttl_ms", p.banner_ttl_ms, 500, 60_000);
}

pub(crate) fn validate_lookup(errors: &mut Vec<String>, config: &GlanceConfig) {
    let base = &config.lookup.url_base;
    if !(base.starts_with("https://") || base.starts_with("http://")) {
        errors.push(format!("lookup.url_base = {base:?} must be an http(s) URL"));
    }
}

pub(crate) fn validate_languages(errors: &mut Vec<String>, config: &GlanceConfig) {
    let catalog = &config.languages;
    if catalog.is_empty() {
        errors.push("languages must not be empty".into());
        return;
    }
    let mut seen = HashSet::new();
    for entry in catalog.iter() {
        if entry.code.trim().is_empty() || entry.name.trim().is_empty() {
            errors.push("languages entries need a code and a name".into());
        } else if !seen.insert(entry.code.as_str()) {
            errors.push(format!("languages: duplicate code {:?}", entry.code));
        }
    }
    if !catalog.contains(DEFAULT_LANGUAGE) {
        errors.push(format!("languages must include {DEFAULT_LANGUAGE:?}"));
    }
}
