//! Schema validation for the persisted stats document. Checks the
//! structural contract the front end relies on: required top-level keys,
//! the shape of the `moltbook` sub-object, and the array sections. Legacy
//! key names that older revisions of the document used (`total_posts`,
//! `bullets`, `current_phase`, ...) are accepted with a warning so a
//! half-migrated document still validates.

use serde_json::{Map, Value};

const REQUIRED_TOP_LEVEL: &[&str] = &[
    "last_updated",
    "moltbook",
    "learning_progress",
    "insights",
    "challenge_status",
    "network",
    "strategies",
    "daily_log",
];

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

pub fn validate_document(document: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let root = match document.as_object() {
        Some(root) => root,
        None => {
            report.error("root must be a JSON object");
            return report;
        }
    };

    for key in REQUIRED_TOP_LEVEL {
        if !root.contains_key(*key) {
            report.error(format!("missing top-level field \"{}\"", key));
        }
    }

    if let Some(value) = root.get("last_updated") {
        if !value.is_string() {
            report.error("\"last_updated\" must be a string");
        }
    }

    match root.get("moltbook") {
        Some(Value::Object(moltbook)) => validate_moltbook(moltbook, &mut report),
        Some(_) => report.error("\"moltbook\" must be an object"),
        None => {}
    }

    if let Some(value) = root.get("learning_progress") {
        if !value.is_object() && !value.is_array() {
            report.error("\"learning_progress\" must be an object (preferred) or legacy array");
        }
    }

    match root.get("insights") {
        Some(Value::Array(insights)) => validate_insights(insights, &mut report),
        Some(_) => report.error("\"insights\" must be an array"),
        None => {}
    }

    match root.get("challenge_status") {
        Some(Value::Object(challenge)) => validate_challenge_status(challenge, &mut report),
        Some(_) => report.error("\"challenge_status\" must be an object"),
        None => {}
    }

    for key in ["network", "strategies"] {
        if let Some(value) = root.get(key) {
            if !value.is_array() {
                report.error(format!("\"{}\" must be an array", key));
            }
        }
    }

    if let Some(value) = root.get("daily_log") {
        if !value.is_object() && !value.is_array() {
            report.error("\"daily_log\" must be an object (preferred) or legacy array");
        }
    }

    report
}

fn validate_moltbook(moltbook: &Map<String, Value>, report: &mut ValidationReport) {
    for key in ["karma", "followers", "following"] {
        if !moltbook.get(key).map_or(false, Value::is_number) {
            report.error(format!("\"moltbook.{}\" must be a number", key));
        }
    }
    if !moltbook.get("profile_url").map_or(false, Value::is_string) {
        report.error("\"moltbook.profile_url\" must be a string");
    }
    if !moltbook.get("recent_activity").map_or(false, Value::is_array) {
        report.error("\"moltbook.recent_activity\" must be an array");
    }
    number_with_legacy(moltbook, "posts", "total_posts", report);
    number_with_legacy(moltbook, "comments", "total_comments", report);
}

fn number_with_legacy(
    moltbook: &Map<String, Value>,
    preferred: &str,
    legacy: &str,
    report: &mut ValidationReport,
) {
    if moltbook.get(preferred).map_or(false, Value::is_number) {
        return;
    }
    if moltbook.get(legacy).map_or(false, Value::is_number) {
        report.warn(format!(
            "using legacy \"moltbook.{}\"; prefer \"moltbook.{}\"",
            legacy, preferred
        ));
    } else {
        report.error(format!("\"moltbook.{}\" must be a number", preferred));
    }
}

fn validate_insights(insights: &[Value], report: &mut ValidationReport) {
    for (i, item) in insights.iter().enumerate() {
        let entry = match item.as_object() {
            Some(entry) => entry,
            None => {
                report.error(format!("\"insights[{}]\" must be an object", i));
                continue;
            }
        };
        if !entry.get("date").map_or(false, Value::is_string) {
            report.error(format!("\"insights[{}].date\" must be a string", i));
        }
        if !entry.get("items").map_or(false, Value::is_array) {
            if entry.get("bullets").map_or(false, Value::is_array) {
                report.warn(format!(
                    "using legacy \"insights[{}].bullets\"; prefer \"items\"",
                    i
                ));
            } else {
                report.error(format!("\"insights[{}].items\" must be an array", i));
            }
        }
    }
}

fn validate_challenge_status(challenge: &Map<String, Value>, report: &mut ValidationReport) {
    string_with_legacy(challenge, "phase", "current_phase", report);
    string_with_legacy(challenge, "target", "target_label", report);

    if !challenge.get("timeline").map_or(false, Value::is_string) {
        report.error("\"challenge_status.timeline\" must be a string");
    }
    if !challenge.get("progress").map_or(false, Value::is_object) {
        report.error("\"challenge_status.progress\" must be an object");
    }
    if !challenge.get("milestones").map_or(false, Value::is_array) {
        if challenge.get("next_milestones").map_or(false, Value::is_array) {
            report.warn(
                "using legacy \"challenge_status.next_milestones\"; prefer \"milestones\""
                    .to_string(),
            );
        } else {
            report.error("\"challenge_status.milestones\" must be an array");
        }
    }
}

fn string_with_legacy(
    challenge: &Map<String, Value>,
    preferred: &str,
    legacy: &str,
    report: &mut ValidationReport,
) {
    if challenge.get(preferred).map_or(false, Value::is_string) {
        return;
    }
    if challenge.get(legacy).map_or(false, Value::is_string) {
        report.warn(format!(
            "using legacy \"challenge_status.{}\"; prefer \"{}\"",
            legacy, preferred
        ));
    } else {
        report.error(format!("\"challenge_status.{}\" must be a string", preferred));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_document() -> Value {
        json!({
            "last_updated": "2026-08-27T10:30:00+0000",
            "moltbook": {
                "karma": 120,
                "followers": 8,
                "following": 5,
                "posts": 14,
                "comments": 32,
                "profile_url": "https://www.moltbook.com/u/andy",
                "recent_activity": []
            },
            "learning_progress": {"rust": []},
            "insights": [{"date": "2026-08-20", "items": ["one"]}],
            "challenge_status": {
                "phase": "two",
                "target": "10k",
                "timeline": "Q3",
                "progress": {"week": 3},
                "milestones": []
            },
            "network": [],
            "strategies": [],
            "daily_log": {}
        })
    }

    #[test]
    fn test_valid_document_passes_cleanly() {
        let report = validate_document(&valid_document());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty(), "warnings: {:?}", report.warnings);
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let report = validate_document(&json!(["not", "an", "object"]));
        assert_eq!(report.errors, vec!["root must be a JSON object"]);
    }

    #[test]
    fn test_missing_top_level_keys_are_listed() {
        let report = validate_document(&json!({"last_updated": "x"}));
        for key in ["moltbook", "insights", "daily_log"] {
            assert!(
                report
                    .errors
                    .iter()
                    .any(|e| e.contains(&format!("\"{}\"", key))),
                "no error for missing {}",
                key
            );
        }
    }

    #[test]
    fn test_moltbook_field_types_checked() {
        let mut document = valid_document();
        document["moltbook"]["karma"] = json!("high");
        document["moltbook"]["profile_url"] = json!(12);

        let report = validate_document(&document);
        assert!(report
            .errors
            .contains(&"\"moltbook.karma\" must be a number".to_string()));
        assert!(report
            .errors
            .contains(&"\"moltbook.profile_url\" must be a string".to_string()));
    }

    #[test]
    fn test_legacy_total_posts_warns_not_errors() {
        let mut document = valid_document();
        let moltbook = document["moltbook"].as_object_mut().unwrap();
        moltbook.remove("posts");
        moltbook.insert("total_posts".to_string(), json!(14));

        let report = validate_document(&document);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("total_posts")));
    }

    #[test]
    fn test_missing_posts_and_legacy_is_an_error() {
        let mut document = valid_document();
        document["moltbook"].as_object_mut().unwrap().remove("posts");

        let report = validate_document(&document);
        assert!(report
            .errors
            .contains(&"\"moltbook.posts\" must be a number".to_string()));
    }

    #[test]
    fn test_legacy_insight_bullets_warn() {
        let mut document = valid_document();
        document["insights"] = json!([{"date": "2026-08-20", "bullets": ["old style"]}]);

        let report = validate_document(&document);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("insights[0].bullets")));
    }

    #[test]
    fn test_malformed_insight_entries_reported_per_index() {
        let mut document = valid_document();
        document["insights"] = json!(["not an object", {"items": []}]);

        let report = validate_document(&document);
        assert!(report
            .errors
            .contains(&"\"insights[0]\" must be an object".to_string()));
        assert!(report
            .errors
            .contains(&"\"insights[1].date\" must be a string".to_string()));
    }

    #[test]
    fn test_legacy_challenge_keys_warn() {
        let mut document = valid_document();
        document["challenge_status"] = json!({
            "current_phase": "two",
            "target_label": "10k",
            "timeline": "Q3",
            "progress": {},
            "next_milestones": []
        });

        let report = validate_document(&document);
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert_eq!(report.warnings.len(), 3);
    }

    #[test]
    fn test_array_sections_must_be_arrays() {
        let mut document = valid_document();
        document["network"] = json!({});
        document["strategies"] = json!("none");

        let report = validate_document(&document);
        assert!(report
            .errors
            .contains(&"\"network\" must be an array".to_string()));
        assert!(report
            .errors
            .contains(&"\"strategies\" must be an array".to_string()));
    }

    #[test]
    fn test_daily_log_accepts_object_or_legacy_array() {
        let mut document = valid_document();
        document["daily_log"] = json!([]);
        assert!(validate_document(&document).is_valid());

        document["daily_log"] = json!("nope");
        assert!(!validate_document(&document).is_valid());
    }
}
