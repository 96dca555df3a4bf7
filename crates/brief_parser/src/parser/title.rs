//! Title-line extraction.

use brief_core::NO_URL;
use tracing::debug;
use url::Url;

const BOLD: &str = "**";
const BOLD_ALT: &str = "__";

/// Returns `(title, url)` for the first line of a story block. The url is
/// [`NO_URL`] whenever the line has no well-formed link.
pub fn extract_title(line: &str) -> (String, String) {
    let cleaned = clean_title_line(line);

    let (title, url) = match extract_link(&cleaned) {
        Some((text, target)) => {
            let url = link_target(target).unwrap_or_else(|| NO_URL.to_string());
            (strip_bold(text), url)
        }
        None => (strip_bold(&cleaned), NO_URL.to_string()),
    };

    if !title.is_empty() {
        return (title, url);
    }
    // Link text made only of markup: keep whatever the line itself says.
    let fallback = strip_bold(&cleaned);
    if !fallback.is_empty() {
        (fallback, NO_URL.to_string())
    } else {
        (line.trim().to_string(), NO_URL.to_string())
    }
}

/// Strips a heading marker, a list marker and bold markers wrapping the line.
pub fn clean_title_line(line: &str) -> String {
    let line = strip_heading(line.trim());
    let line = strip_list_marker(line);
    let line = [BOLD, BOLD_ALT]
        .iter()
        .find_map(|&mark| line.strip_prefix(mark)?.strip_suffix(mark))
        .unwrap_or(line);
    line.trim().to_string()
}

fn strip_heading(line: &str) -> &str {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if hashes == 0 || hashes > 6 {
        return line;
    }
    let rest = &line[hashes..];
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        rest.trim_start()
    } else {
        line
    }
}

fn strip_list_marker(line: &str) -> &str {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 && digits <= 3 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim_start();
        }
    }
    line
}

fn strip_bold(text: &str) -> String {
    text.replace(BOLD, "").replace(BOLD_ALT, "").trim().to_string()
}

/// Matches `[text](target)` spanning the whole line, with balanced brackets in
/// the text and balanced parentheses in the target.
pub fn extract_link(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let text_end = closing_index(rest, '[', ']')?;
    let text = &rest[..text_end];

    let after = rest[text_end + 1..].strip_prefix('(')?;
    let target_end = closing_index(after, '(', ')')?;
    let target = &after[..target_end];

    if !after[target_end + 1..].trim().is_empty() {
        return None;
    }
    Some((text.trim(), target.trim()))
}

fn closing_index(s: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Keeps the target only if it is an absolute http(s) url. A markdown link
/// title (`(url "title")`) is ignored.
fn link_target(target: &str) -> Option<String> {
    let candidate = target
        .split_whitespace()
        .next()?
        .trim_start_matches('<')
        .trim_end_matches('>');
    match Url::parse(candidate) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(candidate.to_string()),
        _ => {
            debug!("Ignoring link target `{}`", candidate);
            None
        }
    }
}
