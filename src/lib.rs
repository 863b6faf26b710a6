// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod nlp;
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{score_comments, score_posts, InputError, Totals};
pub use crate::api::{create_router, AppState};
pub use crate::config::{NegationMode, ScoringConfig, ScoringPolicy};
pub use crate::sentiment::{Label, SentimentAnalyzer, SentimentScore};
