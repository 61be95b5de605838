//! Locating and replacing the generated region of the target file. Two
//! delimiter contracts are supported: a begin/end marker comment pair
//! (regex, markers replaced along with the region and re-emitted around
//! the fresh content) and a structural prefix/suffix anchor pair
//! (substring search, both anchors retained). A missing delimiter aborts
//! the splice with a diagnostic naming it; the caller must not write the
//! file in that case.

use moltsync_core::CoreError;
use regex::{NoExpand, Regex};
use tracing::debug;

/// Replace everything between (and including) `begin` and `end`, then put
/// the markers back around `replacement`.
pub fn splice_markers(
    text: &str,
    begin: &str,
    end: &str,
    replacement: &str,
    path: &str,
) -> Result<String, CoreError> {
    if !text.contains(begin) {
        return Err(CoreError::AnchorMissing {
            path: path.to_string(),
            anchor: begin.to_string(),
        });
    }

    let pattern = format!("(?s){}.*?{}", regex::escape(begin), regex::escape(end));
    let region = Regex::new(&pattern).map_err(|e| CoreError::Internal {
        message: format!("invalid marker pattern: {}", e),
    })?;

    if !region.is_match(text) {
        return Err(CoreError::AnchorMissing {
            path: path.to_string(),
            anchor: end.to_string(),
        });
    }

    let rebuilt = format!("{}{}{}", begin, replacement, end);
    Ok(region.replace(text, NoExpand(&rebuilt)).into_owned())
}

/// Replace the range between a literal `prefix` and `suffix`, retaining
/// both anchors. The suffix is searched only after the prefix.
pub fn splice_anchors(
    text: &str,
    prefix: &str,
    suffix: &str,
    replacement: &str,
    path: &str,
) -> Result<String, CoreError> {
    let start = text.find(prefix).ok_or_else(|| CoreError::AnchorMissing {
        path: path.to_string(),
        anchor: prefix.to_string(),
    })?;
    let body_start = start + prefix.len();

    let suffix_start = text[body_start..]
        .find(suffix)
        .map(|i| body_start + i)
        .ok_or_else(|| CoreError::AnchorMissing {
            path: path.to_string(),
            anchor: suffix.to_string(),
        })?;

    let mut spliced = String::with_capacity(text.len() + replacement.len());
    spliced.push_str(&text[..body_start]);
    spliced.push_str(replacement);
    spliced.push_str(&text[suffix_start..]);
    Ok(spliced)
}

/// Independent rewrite of the human-readable `Updated: <timestamp>`
/// marker. A missing marker is not an error; the text comes back
/// unchanged.
pub fn refresh_updated_marker(text: &str, stamp: &str) -> String {
    let marker = Regex::new(r#"Updated: [^"'<\n]*"#).expect("marker pattern is valid");
    if !marker.is_match(text) {
        debug!("No \"Updated:\" marker found; leaving as-is");
        return text.to_string();
    }
    marker
        .replace(text, NoExpand(&format!("Updated: {}", stamp)))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKED: &str = "header\n// TOPICS:BEGIN\nold stuff\n// TOPICS:END\nfooter\n";

    #[test]
    fn test_marker_splice_replaces_region() {
        let out = splice_markers(MARKED, "// TOPICS:BEGIN", "// TOPICS:END", "\nnew\n", "f")
            .unwrap();
        assert_eq!(out, "header\n// TOPICS:BEGIN\nnew\n// TOPICS:END\nfooter\n");
    }

    #[test]
    fn test_marker_splice_reports_missing_begin() {
        let err = splice_markers("plain text", "// TOPICS:BEGIN", "// TOPICS:END", "x", "f")
            .unwrap_err();
        assert!(err.to_string().contains("// TOPICS:BEGIN"));
    }

    #[test]
    fn test_marker_splice_reports_missing_end() {
        let text = "header\n// TOPICS:BEGIN\nold stuff\n";
        let err = splice_markers(text, "// TOPICS:BEGIN", "// TOPICS:END", "x", "f").unwrap_err();
        assert!(err.to_string().contains("// TOPICS:END"));
    }

    #[test]
    fn test_marker_replacement_with_dollar_signs() {
        let out = splice_markers(MARKED, "// TOPICS:BEGIN", "// TOPICS:END", "$1 $money", "f")
            .unwrap();
        assert!(out.contains("$1 $money"));
    }

    #[test]
    fn test_anchor_splice_retains_both_anchors() {
        let text = "const hotTopics = [\n  old,\n];\nrest";
        let out = splice_anchors(text, "const hotTopics = [", "];", "\n  new,\n", "f").unwrap();
        assert_eq!(out, "const hotTopics = [\n  new,\n];\nrest");
    }

    #[test]
    fn test_anchor_splice_names_the_missing_anchor() {
        let text = "const hotTopics = [\n  old,\n";
        let err = splice_anchors(text, "const hotTopics = [", "];", "x", "Index.tsx").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("];"));
        assert!(message.contains("Index.tsx"));

        let err = splice_anchors("nothing here", "const hotTopics = [", "];", "x", "f")
            .unwrap_err();
        assert!(err.to_string().contains("const hotTopics = ["));
    }

    #[test]
    fn test_suffix_before_prefix_is_missing() {
        let text = "];\nconst hotTopics = [\n";
        assert!(splice_anchors(text, "const hotTopics = [", "];", "x", "f").is_err());
    }

    #[test]
    fn test_refresh_updated_marker() {
        let text = "<span>Updated: 2026-08-01 09:00</span>";
        assert_eq!(
            refresh_updated_marker(text, "2026-08-27 10:30"),
            "<span>Updated: 2026-08-27 10:30</span>"
        );
    }

    #[test]
    fn test_missing_updated_marker_is_noop() {
        assert_eq!(refresh_updated_marker("no marker", "x"), "no marker");
    }
}
