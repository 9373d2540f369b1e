//! Sentiment labelling from embedding vectors.
//!
//! The score of a text is the arithmetic mean of its embedding components.
//! Scores above [`POSITIVE_THRESHOLD`] are positive, scores below
//! [`NEGATIVE_THRESHOLD`] are negative, everything else is neutral.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean above which a text is labelled positive.
pub const POSITIVE_THRESHOLD: f64 = 0.5;

/// Mean below which a text is labelled negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.5;

/// Three-way sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Maps a mean embedding value to a label.
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        };
        f.write_str(label)
    }
}

/// Score and label for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: f64,
    pub label: SentimentLabel,
}

impl Sentiment {
    /// Builds a sentiment from a mean score.
    ///
    /// # Example
    ///
    /// ```
    /// use impact_core::{Sentiment, SentimentLabel};
    ///
    /// assert_eq!(Sentiment::from_score(0.7).label, SentimentLabel::Positive);
    /// assert_eq!(Sentiment::from_score(-0.7).label, SentimentLabel::Negative);
    /// assert_eq!(Sentiment::from_score(0.0).label, SentimentLabel::Neutral);
    /// ```
    pub fn from_score(score: f64) -> Self {
        Self {
            score,
            label: SentimentLabel::from_score(score),
        }
    }

    /// Scores an embedding vector. Returns `None` for an empty vector.
    pub fn from_embedding(embedding: &[f32]) -> Option<Self> {
        mean(embedding).map(Self::from_score)
    }
}

/// Arithmetic mean of the components, `None` when there are none.
pub fn mean(values: &[f32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().map(|v| f64::from(*v)).sum();
    Some(sum / values.len() as f64)
}
