//! Topic classification and card assembly. A post lands in exactly one of
//! five categories; keyword sets are tested in a fixed order and the first
//! match wins.

use moltsync_core::TopicCard;
use moltbook_client::FeedPost;

const DESCRIPTION_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Security,
    Automation,
    DevTools,
    Philosophy,
    General,
}

const SECURITY_KEYWORDS: &[&str] = &[
    "security",
    "vulnerab",
    "exploit",
    "injection",
    "attack",
    "breach",
    "phishing",
    "malware",
];

const AUTOMATION_KEYWORDS: &[&str] = &[
    "autonom",
    "automat",
    "nightly",
    "cron",
    "schedule",
    "workflow",
    "self-improv",
];

const DEVTOOLS_KEYWORDS: &[&str] = &[
    "tool", "build", "code", "develop", "api", "sdk", "library", "framework", "debug",
];

const PHILOSOPHY_KEYWORDS: &[&str] = &[
    "philosoph",
    "conscious",
    "ethic",
    "meaning",
    "existen",
    "identity",
    "sentien",
];

impl Topic {
    pub fn label(self) -> &'static str {
        match self {
            Topic::Security => "Security",
            Topic::Automation => "Automation",
            Topic::DevTools => "Dev Tools",
            Topic::Philosophy => "Philosophy",
            Topic::General => "General",
        }
    }

    pub fn color_class(self) -> &'static str {
        match self {
            Topic::Security => "text-red-400",
            Topic::Automation => "text-purple-400",
            Topic::DevTools => "text-blue-400",
            Topic::Philosophy => "text-amber-400",
            Topic::General => "text-gray-400",
        }
    }
}

pub fn classify(title: &str, description: &str) -> Topic {
    let haystack = format!("{} {}", title, description).to_lowercase();
    let sets: &[(Topic, &[&str])] = &[
        (Topic::Security, SECURITY_KEYWORDS),
        (Topic::Automation, AUTOMATION_KEYWORDS),
        (Topic::DevTools, DEVTOOLS_KEYWORDS),
        (Topic::Philosophy, PHILOSOPHY_KEYWORDS),
    ];
    for (topic, keywords) in sets {
        if keywords.iter().any(|k| haystack.contains(k)) {
            return *topic;
        }
    }
    Topic::General
}

/// Collapse runs of whitespace (newlines included) to single spaces, then
/// keep the first 120 characters. Truncation counts chars, not bytes.
pub fn truncate_description(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(DESCRIPTION_CHARS).collect()
}

/// Escape for embedding inside a single-quoted JS string literal. Both
/// quote characters are escaped since revisions of the target have used
/// either style.
pub fn escape_js_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push(' '),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn format_votes(count: i64) -> String {
    if count >= 1000 {
        format!("{:.1}k", count as f64 / 1000.0)
    } else {
        count.to_string()
    }
}

pub fn build_card(post: &FeedPost) -> TopicCard {
    let description = truncate_description(&post.content);
    let topic = classify(&post.title, &description);

    TopicCard {
        tag: topic.label().to_string(),
        tag_color: topic.color_class().to_string(),
        author: escape_js_string(post.author_name()),
        title: escape_js_string(&post.title),
        description: escape_js_string(&description),
        votes: format_votes(post.upvotes),
        comments: post.comment_count,
        post_id: escape_js_string(&post.id),
    }
}
