//! Lightweight markdown inspection used by the coordinator.
//!
//! Findings and reports are opaque text; these helpers only look for the
//! three things the team contract cares about: links, tables and headings.

/// Extract every `http(s)://` URL in order of first appearance, deduplicated.
pub fn extract_links(text: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    let mut rest = text;

    while let Some(start) = find_scheme(rest) {
        let candidate = &rest[start..];
        let end = candidate
            .find(|c: char| c.is_whitespace() || matches!(c, ')' | ']' | '>' | '<' | '"' | '|' | '`'))
            .unwrap_or(candidate.len());
        let url = candidate[..end].trim_end_matches(['.', ',', ';', ':', '!', '?', '\'']);

        let has_host = url.split_once("://").is_some_and(|(_, host)| !host.is_empty());
        if has_host && !links.iter().any(|l| l == url) {
            links.push(url.to_string());
        }
        rest = &candidate[end.max(1)..];
    }

    links
}

fn find_scheme(text: &str) -> Option<usize> {
    match (text.find("http://"), text.find("https://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn is_table_row(line: &str) -> bool {
    let line = line.trim();
    line.starts_with('|') && line.len() > 1
}

fn is_separator_row(line: &str) -> bool {
    let line = line.trim();
    is_table_row(line)
        && line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

/// Count markdown tables: a header row immediately followed by a separator row.
pub fn count_tables(text: &str) -> usize {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .windows(2)
        .filter(|pair| is_table_row(pair[0]) && !is_separator_row(pair[0]) && is_separator_row(pair[1]))
        .count()
}

/// Normalised heading text if the line is a heading.
///
/// Recognises `#`-style headings and whole-line bold headings such as
/// `**1. Executive Summary**`. Numbering and a trailing colon are dropped.
pub fn heading_title(line: &str) -> Option<String> {
    let line = line.trim();
    let inner = if line.starts_with('#') {
        line.trim_start_matches('#')
    } else if line.len() > 4 && line.starts_with("**") && line.trim_end_matches(':').ends_with("**") {
        line
    } else {
        return None;
    };

    let title = inner
        .trim()
        .trim_end_matches(':')
        .trim_matches('*')
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
        .trim()
        .trim_matches('*')
        .trim_end_matches(':')
        .trim_matches('*')
        .trim()
        .to_lowercase();

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Character-bounded truncation that never splits a UTF-8 code point.
///
/// The result, including the trailing ellipsis, is at most `budget` chars.
pub fn clamp_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(budget - 1).collect();
    out.push('…');
    out
}
