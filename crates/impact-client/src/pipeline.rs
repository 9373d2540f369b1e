//! Fetch, annotate, filter and sort: the data behind the dashboard.

use chrono::{DateTime, Utc};
use impact_core::dashboard::filter_and_sort;
use impact_core::{DashboardSummary, Filters, SentimentLabel, SortKey};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, instrument};

use crate::api::PostSource;
use crate::error::ClientError;
use crate::sentiment::{AnnotatedPost, EmbeddingModel, SentimentAnalyzer};

/// Everything the dashboard renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Metrics over the posts that pass the filters.
    pub summary: DashboardSummary,
    /// Topics present in the unfiltered data, for the topic selector.
    pub topics: Vec<String>,
    /// Posts per sentiment label among the visible posts; unscored posts are not counted.
    pub sentiment_counts: IndexMap<SentimentLabel, usize>,
    pub posts: Vec<AnnotatedPost>,
}

pub struct DashboardPipeline<S, M> {
    source: S,
    analyzer: Option<SentimentAnalyzer<M>>,
}

impl<S: PostSource, M: EmbeddingModel> DashboardPipeline<S, M> {
    /// Without an analyzer every post is left unscored.
    pub fn new(source: S, analyzer: Option<SentimentAnalyzer<M>>) -> Self {
        Self { source, analyzer }
    }

    /// Runs the pipeline once, evaluating the date window against `now`.
    #[instrument(skip_all, fields(sort = %sort))]
    pub async fn load(
        &self,
        filters: &Filters,
        sort: &SortKey,
        now: DateTime<Utc>,
    ) -> Result<DashboardView, ClientError> {
        let posts = self.source.fetch_posts().await?;

        let annotated = match &self.analyzer {
            Some(analyzer) => analyzer.annotate(posts).await,
            None => posts.into_iter().map(AnnotatedPost::unscored).collect(),
        };

        let topics = DashboardSummary::from_posts(&annotated)
            .topics()
            .map(str::to_string)
            .collect();

        let visible = filter_and_sort(annotated, filters, sort, now);
        let summary = DashboardSummary::from_posts(&visible);

        let mut sentiment_counts = IndexMap::new();
        for label in visible.iter().filter_map(|p| p.sentiment.map(|s| s.label)) {
            *sentiment_counts.entry(label).or_insert(0) += 1;
        }

        info!(
            total = summary.total_posts,
            likes = summary.total_likes,
            "Dashboard loaded"
        );

        Ok(DashboardView {
            summary,
            topics,
            sentiment_counts,
            posts: visible,
        })
    }
}
