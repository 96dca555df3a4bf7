//! Body-line handling: label stripping and paragraph/list detection.

use brief_core::Body;

const BULLETS: [&str; 3] = ["- ", "* ", "• "];

/// Builds the body from the lines after the title. Label-only lines are
/// dropped. If every remaining line is a bullet the result is a list.
pub fn build_body(lines: &[&str], labels: &[String]) -> Body {
    let lines: Vec<&str> = lines
        .iter()
        .map(|line| strip_label(line, labels))
        .filter(|line| !line.is_empty())
        .collect();

    if !lines.is_empty() && lines.iter().all(|line| bullet_item(line).is_some()) {
        let items = lines
            .iter()
            .filter_map(|line| bullet_item(line))
            .map(|item| strip_label(item, labels))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return Body::Items(items);
    }

    Body::Paragraph(lines.join(" "))
}

/// Removes a known label at the very start of `line`, e.g. `Summary:` or
/// `**Summary:**`. Text elsewhere in the line is never touched.
pub fn strip_label<'a>(line: &'a str, labels: &[String]) -> &'a str {
    let line = line.trim();
    for label in labels {
        for prefix in label_forms(label) {
            if let Some(head) = line.get(..prefix.len()) {
                if head.eq_ignore_ascii_case(&prefix) {
                    return line[prefix.len()..].trim_start();
                }
            }
        }
    }
    line
}

fn label_forms(label: &str) -> [String; 5] {
    [
        format!("**{label}:**"),
        format!("**{label}**:"),
        format!("*{label}:*"),
        format!("*{label}*:"),
        format!("{label}:"),
    ]
}

/// The item text of a bulleted line, without its marker.
pub fn bullet_item(line: &str) -> Option<&str> {
    BULLETS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
        .filter(|item| !item.is_empty())
}
