// src/aggregate.rs
//! Batch scoring: annotate comment records with `status` and fold labels into
//! per-post and overall totals.
//!
//! Records are open JSON objects; every caller field is copied through as is
//! and only `status` is written. A record whose `comment` is missing, not a
//! string, or empty is dropped from the output and not counted, both in flat
//! batches and inside posts.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::sentiment::{Label, SentimentAnalyzer};

pub const COMMENT_FIELD: &str = "comment";
pub const STATUS_FIELD: &str = "status";

/// Caller-supplied comment fields plus `status`.
pub type CommentRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl Totals {
    pub fn record(&mut self, label: Label) {
        match label {
            Label::Positive => self.positive += 1,
            Label::Neutral => self.neutral += 1,
            Label::Negative => self.negative += 1,
        }
    }

    pub fn add(&mut self, other: &Totals) {
        self.positive += other.positive;
        self.neutral += other.neutral;
        self.negative += other.negative;
    }

    pub fn sum(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentBatch {
    pub total: Totals,
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Value,
    pub title: Value,
    pub content: Value,
    pub created_at: Value,
    pub updated_at: Value,
    pub total: Totals,
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostBatch {
    pub overall_total: Totals,
    pub posts: Vec<PostRecord>,
}

/// Shape problems in a request body. Indices are positions in the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    CommentsNotList,
    PostsNotList,
    CommentNotObject(usize),
    PostNotObject(usize),
    PostCommentsNotList(usize),
    /// `(post index, comment index)`
    PostCommentNotObject(usize, usize),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::CommentsNotList => {
                f.write_str("Invalid input format, expected a list of comments")
            }
            InputError::PostsNotList => f.write_str("Invalid input format, expected a list of posts"),
            InputError::CommentNotObject(i) => {
                write!(f, "Invalid input format, comment at index {i} is not an object")
            }
            InputError::PostNotObject(i) => {
                write!(f, "Invalid input format, post at index {i} is not an object")
            }
            InputError::PostCommentsNotList(i) => write!(
                f,
                "Invalid input format, comments of post at index {i} must be a list"
            ),
            InputError::PostCommentNotObject(p, c) => write!(
                f,
                "Invalid input format, comment at index {c} of post at index {p} is not an object"
            ),
        }
    }
}

impl std::error::Error for InputError {}

/// Score a flat list of comment records.
pub fn score_comments(
    analyzer: &SentimentAnalyzer,
    comments: &Value,
) -> Result<CommentBatch, InputError> {
    let list = comments.as_array().ok_or(InputError::CommentsNotList)?;
    let (total, comments) = score_list(analyzer, list)?;
    Ok(CommentBatch { total, comments })
}

/// Score a list of posts, each with an optional nested `comments` list.
pub fn score_posts(analyzer: &SentimentAnalyzer, posts: &Value) -> Result<PostBatch, InputError> {
    let list = posts.as_array().ok_or(InputError::PostsNotList)?;

    let mut overall_total = Totals::default();
    let mut out = Vec::with_capacity(list.len());
    for (i, post) in list.iter().enumerate() {
        let obj = post.as_object().ok_or(InputError::PostNotObject(i))?;
        let (total, comments) = match obj.get("comments") {
            None | Some(Value::Null) => (Totals::default(), Vec::new()),
            Some(Value::Array(items)) => score_list(analyzer, items).map_err(|e| match e {
                InputError::CommentNotObject(j) => InputError::PostCommentNotObject(i, j),
                other => other,
            })?,
            Some(_) => return Err(InputError::PostCommentsNotList(i)),
        };
        overall_total.add(&total);

        let field = |k: &str| obj.get(k).cloned().unwrap_or(Value::Null);
        out.push(PostRecord {
            id: field("id"),
            title: field("title"),
            content: field("content"),
            created_at: field("created_at"),
            updated_at: field("updated_at"),
            total,
            comments,
        });
    }

    Ok(PostBatch {
        overall_total,
        posts: out,
    })
}

fn score_list(
    analyzer: &SentimentAnalyzer,
    items: &[Value],
) -> Result<(Totals, Vec<CommentRecord>), InputError> {
    let mut total = Totals::default();
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let obj = item.as_object().ok_or(InputError::CommentNotObject(i))?;
        let Some(text) = comment_text(obj) else {
            continue;
        };
        let label = analyzer.label(text);
        total.record(label);

        let mut record = obj.clone();
        record.insert(STATUS_FIELD.to_string(), Value::from(label.as_str()));
        out.push(record);
    }
    Ok((total, out))
}

fn comment_text(obj: &Map<String, Value>) -> Option<&str> {
    obj.get(COMMENT_FIELD)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::nlp::LexicalBundle;
    use serde_json::json;
    use std::sync::Arc;

    fn analyzer() -> SentimentAnalyzer {
        let bundle = LexicalBundle::embedded().expect("embedded data loads");
        SentimentAnalyzer::new(Arc::new(bundle), ScoringConfig::default())
    }

    #[test]
    fn totals_record_and_add() {
        let mut a = Totals::default();
        a.record(Label::Positive);
        a.record(Label::Negative);
        a.record(Label::Negative);
        let mut b = Totals::default();
        b.record(Label::Neutral);
        b.add(&a);
        assert_eq!(
            b,
            Totals {
                positive: 1,
                neutral: 1,
                negative: 2
            }
        );
        assert_eq!(b.sum(), 4);
    }

    #[test]
    fn comments_keep_fields_and_order() {
        let a = analyzer();
        let input = json!([
            {"id": 1, "comment": "This movie is absolutely wonderful", "author": {"name": "x"}},
            {"id": 2, "comment": "!!!", "status": "stale"},
        ]);
        let batch = score_comments(&a, &input).unwrap();
        assert_eq!(batch.comments.len(), 2);
        assert_eq!(batch.comments[0]["id"], 1);
        assert_eq!(batch.comments[0]["author"]["name"], "x");
        assert_eq!(batch.comments[0]["status"], "positive");
        assert_eq!(batch.comments[1]["id"], 2);
        assert_eq!(batch.comments[1]["status"], "neutral");
        assert_eq!(batch.total.sum(), 2);
    }

    #[test]
    fn empty_missing_and_non_string_comments_are_dropped() {
        let a = analyzer();
        let input = json!([
            {"id": 1, "comment": ""},
            {"id": 2},
            {"id": 3, "comment": 42},
            {"id": 4, "comment": null},
            {"id": 5, "comment": "   "},
        ]);
        let batch = score_comments(&a, &input).unwrap();
        assert_eq!(batch.comments.len(), 1);
        assert_eq!(batch.comments[0]["id"], 5);
        assert_eq!(batch.total, Totals { positive: 0, neutral: 1, negative: 0 });
    }

    #[test]
    fn shape_errors() {
        let a = analyzer();
        assert_eq!(
            score_comments(&a, &json!({"comment": "x"})).unwrap_err(),
            InputError::CommentsNotList
        );
        assert_eq!(
            score_comments(&a, &json!([{"comment": "x"}, "bare"])).unwrap_err(),
            InputError::CommentNotObject(1)
        );
        assert_eq!(score_posts(&a, &json!("nope")).unwrap_err(), InputError::PostsNotList);
        assert_eq!(
            score_posts(&a, &json!([{"id": 1}, 7])).unwrap_err(),
            InputError::PostNotObject(1)
        );
        assert_eq!(
            score_posts(&a, &json!([{"id": 1, "comments": "x"}])).unwrap_err(),
            InputError::PostCommentsNotList(0)
        );
        assert_eq!(
            score_posts(&a, &json!([{"id": 1}, {"id": 2, "comments": [{"comment": "ok"}, 3]}]))
                .unwrap_err(),
            InputError::PostCommentNotObject(1, 1)
        );
        assert_eq!(
            InputError::CommentsNotList.to_string(),
            "Invalid input format, expected a list of comments"
        );
    }

    #[test]
    fn posts_keep_order_and_sum_totals() {
        let a = analyzer();
        let input = json!([
            {
                "id": "p1", "title": "T1", "content": "C1",
                "created_at": "2024-01-01", "updated_at": "2024-01-02",
                "comments": [
                    {"id": "c1", "comment": "This movie is absolutely wonderful"},
                    {"id": "c2", "comment": "I do not like this at all"}
                ]
            },
            {
                "id": "p2", "title": "T2",
                "comments": [{"id": "c3", "comment": "123"}, {"id": "c4", "comment": ""}]
            },
            {"id": "p3"}
        ]);
        let batch = score_posts(&a, &input).unwrap();
        let ids: Vec<Option<&str>> = batch.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![Some("p1"), Some("p2"), Some("p3")]);

        let p1 = &batch.posts[0];
        assert_eq!(p1.comments[0]["id"], "c1");
        assert_eq!(p1.comments[1]["id"], "c2");
        assert_eq!(p1.total.sum(), 2);

        let p2 = &batch.posts[1];
        assert_eq!(p2.content, Value::Null);
        assert_eq!(p2.updated_at, Value::Null);
        assert_eq!(p2.comments.len(), 1);
        assert_eq!(p2.total, Totals { positive: 0, neutral: 1, negative: 0 });

        assert!(batch.posts[2].comments.is_empty());

        let mut sum = Totals::default();
        for p in &batch.posts {
            sum.add(&p.total);
        }
        assert_eq!(batch.overall_total, sum);
        assert_eq!(batch.overall_total.sum(), 3);
    }

    #[test]
    fn post_record_serializes_nulls() {
        let a = analyzer();
        let batch = score_posts(&a, &json!([{"id": 9}])).unwrap();
        let v = serde_json::to_value(&batch).unwrap();
        assert_eq!(v["posts"][0]["title"], Value::Null);
        assert_eq!(v["posts"][0]["total"]["neutral"], 0);
        assert_eq!(v["overall_total"]["positive"], 0);
    }
}
