use serde_json::Value;

use crate::text::normalize_value;

/// One raw comment as handed to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRecord {
    pub text: String,
    pub author: String,
    /// Kept as the dump's display string ("1.2K" and friends).
    pub votes: String,
    pub hearted: bool,
    pub has_replies: bool,
}

impl CommentRecord {
    pub fn from_value(comment: &Value) -> Self {
        static NULL: Value = Value::Null;
        let field = |name: &str| comment.get(name).unwrap_or(&NULL);

        let votes = match field("votes") {
            Value::Null => "0".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        Self {
            text: normalize_value(field("text")),
            author: field("author").as_str().unwrap_or_default().to_string(),
            votes,
            hearted: is_truthy(field("heart")),
            has_replies: is_truthy(field("replies")),
        }
    }
}

/// Loose truthiness: empty strings, zero, null and empty containers are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Reads the `comments` array of a raw dump; anything else yields no comments.
pub fn extract_comments(document: &Value) -> Vec<CommentRecord> {
    document
        .get("comments")
        .and_then(Value::as_array)
        .map(|comments| comments.iter().map(CommentRecord::from_value).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_with_defaults() {
        let doc = json!({
            "comments": [
                {"text": "Great &amp; clear\u{2026}", "author": "@alice", "votes": "1.2K", "heart": true, "replies": "4"},
                {"text": 17, "author": "@bob"}
            ]
        });

        let comments = extract_comments(&doc);
        assert_eq!(comments.len(), 2);

        assert_eq!(comments[0].text, "Great & clear...");
        assert_eq!(comments[0].votes, "1.2K");
        assert!(comments[0].hearted);
        assert!(comments[0].has_replies);

        assert_eq!(comments[1].text, "");
        assert_eq!(comments[1].votes, "0");
        assert!(!comments[1].hearted);
        assert!(!comments[1].has_replies);
    }

    #[test]
    fn test_empty_replies_string_is_false() {
        let record = CommentRecord::from_value(&json!({"text": "x", "author": "a", "replies": ""}));
        assert!(!record.has_replies);
    }

    #[test]
    fn test_numeric_votes_rendered() {
        let record = CommentRecord::from_value(&json!({"text": "x", "author": "a", "votes": 12}));
        assert_eq!(record.votes, "12");
    }

    #[test]
    fn test_missing_comments_key() {
        assert!(extract_comments(&json!({"video": "abc"})).is_empty());
        assert!(extract_comments(&json!({"comments": "nope"})).is_empty());
    }
}
