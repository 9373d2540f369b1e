mod common;

use chrono::Utc;
use impact_core::dashboard::{filter_and_sort, DashboardSummary, DateRange, Filters, SortKey};
use impact_core::{PlatformReport, Sentiment, SentimentLabel};

#[test]
fn test_default_view_is_last_week_newest_first() {
    let now = Utc::now();
    let feed = common::mixed_feed(now);

    let view = filter_and_sort(feed, &Filters::default(), &SortKey::Date, now);
    let ids: Vec<_> = view.iter().map(|p| p.id.as_str()).collect();

    // e1 (200h) and b2 (300h) fall outside the 7-day window
    assert_eq!(ids, ["t3", "t1", "b1", "t2"]);
}

#[test]
fn test_topic_and_likes_view() {
    let now = Utc::now();
    let feed = common::mixed_feed(now);

    let filters = Filters::none().with_topic("Technology");
    let view = filter_and_sort(feed, &filters, &SortKey::Likes, now);

    assert!(view.iter().all(|p| p.topic == "Technology"));
    assert!(view.windows(2).all(|w| w[0].likes >= w[1].likes));
    assert_eq!(view[0].id, "t2");
}

#[test]
fn test_unknown_sort_key_preserves_filtered_order() {
    let now = Utc::now();
    let feed = common::mixed_feed(now);

    let filters = Filters::none().with_date_range(DateRange::AllTime);
    let view = filter_and_sort(feed.clone(), &filters, &"trending".parse().unwrap(), now);

    assert_eq!(view, feed);
}

#[test]
fn test_summary_over_filtered_view() {
    let now = Utc::now();
    let view = Filters::default().apply(common::mixed_feed(now), now);
    let summary = DashboardSummary::from_posts(&view);

    assert_eq!(summary.total_posts, 4);
    assert_eq!(summary.total_likes, 120 + 300 + 300 + 5);
    assert_eq!(summary.topics().collect::<Vec<_>>(), ["Technology", "Business"]);
}

#[test]
fn test_platform_report_engagement_matches_posts() {
    let now = Utc::now();
    let feed = common::mixed_feed(now);
    let expected: u64 = feed.iter().map(|p| p.likes + p.shares).sum();

    let report = PlatformReport::new("Facebook", feed);

    assert_eq!(report.data.total_engagement, expected);
    // t2 and b1 tie at 300 likes: the first one listed wins
    assert_eq!(report.data.top_post.unwrap().id, "b1");
}

#[test]
fn test_sentiment_examples() {
    assert_eq!(Sentiment::from_score(0.7).label, SentimentLabel::Positive);
    assert_eq!(Sentiment::from_score(-0.7).label, SentimentLabel::Negative);
    assert_eq!(Sentiment::from_score(0.0).label, SentimentLabel::Neutral);
}
