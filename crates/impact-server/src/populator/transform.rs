//! Conversion de las respuestas nativas de cada plataforma a `Post`.

use chrono::{DateTime, TimeZone, Utc};
use impact_core::{Post, Topic};
use serde::Deserialize;
use serde_json::Value;

/// Topic asignado cuando ninguna palabra clave coincide.
pub const FALLBACK_TOPIC: &str = "General";

/// Formato de respuesta de una plataforma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    /// Graph API: `{ "data": [{ id, message, created_time, likes.summary.total_count, shares.count }] }`
    Facebook,
    /// `{ "elements": [{ id, commentary, createdAt, likesSummary.totalLikes, shareStatistics.shareCount }] }`
    #[serde(rename = "linkedin")]
    LinkedIn,
    /// `{ "data": [{ id, text, created_at, public_metrics.{like,retweet,reply}_count }] }`
    PlatformX,
    /// Lista de posts ya normalizados, o `{ "posts": [...] }`.
    Generic,
}

impl PlatformKind {
    /// Prefijo de las variables `<PREFIX>_API_URL` / `<PREFIX>_API_KEY`.
    pub fn legacy_env_prefix(&self) -> Option<&'static str> {
        match self {
            PlatformKind::Facebook => Some("FACEBOOK"),
            PlatformKind::LinkedIn => Some("LINKEDIN"),
            PlatformKind::PlatformX => Some("PLATFORM_X"),
            PlatformKind::Generic => None,
        }
    }

    /// Nombre del query parameter que lleva la API key.
    pub fn key_param(&self) -> &'static str {
        match self {
            PlatformKind::Facebook => "access_token",
            PlatformKind::LinkedIn => "oauth2_access_token",
            PlatformKind::PlatformX | PlatformKind::Generic => "api_key",
        }
    }
}

/// Convierte un payload nativo en posts. Las entradas sin id o sin texto
/// se descartan; una fecha ausente o ilegible se reemplaza por `now`.
pub fn transform(kind: PlatformKind, payload: &Value, now: DateTime<Utc>) -> Vec<Post> {
    let mut posts: Vec<Post> = match kind {
        PlatformKind::Facebook => entries(payload, "data")
            .filter_map(|e| {
                let text = str_at(e, &["message"]).or_else(|| str_at(e, &["story"]))?;
                Some(
                    build(e, text, str_at(e, &["created_time"]).and_then(parse_date), now)
                        .with_counts(
                            u64_at(e, &["likes", "summary", "total_count"]),
                            u64_at(e, &["shares", "count"]),
                        ),
                )
            })
            .collect(),
        PlatformKind::LinkedIn => entries(payload, "elements")
            .filter_map(|e| {
                let text = str_at(e, &["commentary"])?;
                let date = e
                    .get("createdAt")
                    .and_then(Value::as_i64)
                    .and_then(|ms| Utc.timestamp_millis_opt(ms).single());
                Some(build(e, text, date, now).with_counts(
                    u64_at(e, &["likesSummary", "totalLikes"]),
                    u64_at(e, &["shareStatistics", "shareCount"]),
                ))
            })
            .collect(),
        PlatformKind::PlatformX => entries(payload, "data")
            .filter_map(|e| {
                let text = str_at(e, &["text"])?;
                let mut post = build(e, text, str_at(e, &["created_at"]).and_then(parse_date), now)
                    .with_counts(
                        u64_at(e, &["public_metrics", "like_count"]),
                        u64_at(e, &["public_metrics", "retweet_count"]),
                    );
                post.comments = u64_at(e, &["public_metrics", "reply_count"]);
                Some(post)
            })
            .collect(),
        PlatformKind::Generic => {
            let list = payload.get("posts").unwrap_or(payload);
            serde_json::from_value(list.clone()).unwrap_or_default()
        },
    };

    posts.retain(|p| !p.id.is_empty());
    posts
}

/// Clasifica un texto en uno de los topics conocidos por palabras clave.
pub fn classify_topic(text: &str) -> String {
    const KEYWORDS: [(Topic, &[&str]); 3] = [
        (
            Topic::Technology,
            &[
                "tech", "technology", "software", "ai", "cloud", "data", "app", "code", "api",
                "developer", "digital", "startup", "security",
            ],
        ),
        (
            Topic::Business,
            &[
                "business", "revenue", "market", "sales", "growth", "customer", "customers",
                "quarter", "hiring", "finance", "strategy", "partnership", "investors",
            ],
        ),
        (
            Topic::Entertainment,
            &[
                "movie", "music", "show", "game", "games", "film", "festival", "concert",
                "celebrity", "series", "fun", "trailer",
            ],
        ),
    ];

    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();

    KEYWORDS
        .iter()
        .map(|(topic, keys)| {
            let hits = words.iter().filter(|w| keys.contains(&w.as_str())).count();
            (topic, hits)
        })
        .filter(|(_, hits)| *hits > 0)
        // max_by_key devuelve el ultimo en empate; rev() deja ganar al primero
        .rev()
        .max_by_key(|(_, hits)| *hits)
        .map(|(topic, _)| topic.as_str().to_string())
        .unwrap_or_else(|| FALLBACK_TOPIC.to_string())
}

fn entries<'a>(payload: &'a Value, field: &str) -> impl Iterator<Item = &'a Value> {
    payload
        .get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn build(entry: &Value, text: &str, date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Post {
    let id = match entry.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    Post::new(id, text, classify_topic(text), date.unwrap_or(now))
}

fn value_at<'a>(entry: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(entry, |v, key| v.get(*key))
}

fn str_at<'a>(entry: &'a Value, path: &[&str]) -> Option<&'a str> {
    value_at(entry, path)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn u64_at(entry: &Value, path: &[&str]) -> u64 {
    value_at(entry, path).and_then(Value::as_u64).unwrap_or(0)
}

/// RFC 3339, o el formato de Graph API (`+0000` sin dos puntos).
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_facebook_graph_shape() {
        let payload = json!({
            "data": [
                {
                    "id": "123_456",
                    "message": "Our new cloud app is live",
                    "created_time": "2024-05-30T10:00:00+0000",
                    "likes": {"summary": {"total_count": 42}},
                    "shares": {"count": 7}
                },
                {"id": "no_text"}
            ]
        });

        let posts = transform(PlatformKind::Facebook, &payload, now());

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "123_456");
        assert_eq!(posts[0].likes, 42);
        assert_eq!(posts[0].shares, 7);
        assert_eq!(posts[0].topic, "Technology");
        assert_eq!(
            posts[0].date,
            Utc.with_ymd_and_hms(2024, 5, 30, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_linkedin_elements_shape() {
        let payload = json!({
            "elements": [{
                "id": "urn:li:share:1",
                "commentary": "Record quarter for revenue growth",
                "createdAt": 1717000000000i64,
                "likesSummary": {"totalLikes": 15},
                "shareStatistics": {"shareCount": 3}
            }]
        });

        let posts = transform(PlatformKind::LinkedIn, &payload, now());

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].topic, "Business");
        assert_eq!(posts[0].engagement(), 18);
        assert_eq!(posts[0].date.timestamp_millis(), 1717000000000);
    }

    #[test]
    fn test_platform_x_metrics() {
        let payload = json!({
            "data": [{
                "id": "1790000000000000000",
                "text": "Trailer drops tonight",
                "created_at": "2024-05-31T18:30:00.000Z",
                "public_metrics": {"like_count": 100, "retweet_count": 20, "reply_count": 5}
            }]
        });

        let posts = transform(PlatformKind::PlatformX, &payload, now());

        assert_eq!(posts[0].likes, 100);
        assert_eq!(posts[0].shares, 20);
        assert_eq!(posts[0].comments, 5);
        assert_eq!(posts[0].topic, "Entertainment");
    }

    #[test]
    fn test_missing_date_uses_now() {
        let payload = json!({"data": [{"id": "1", "text": "hello"}]});

        let posts = transform(PlatformKind::PlatformX, &payload, now());
        assert_eq!(posts[0].date, now());
        assert_eq!(posts[0].topic, FALLBACK_TOPIC);
    }

    #[test]
    fn test_generic_accepts_wrapped_list() {
        let payload = json!({"posts": [{
            "id": "g1", "text": "t", "likes": 1, "shares": 2,
            "date": "2024-05-01T00:00:00Z", "topic": "Business"
        }]});

        let posts = transform(PlatformKind::Generic, &payload, now());
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].topic, "Business");
    }

    #[test]
    fn test_unexpected_shape_yields_nothing() {
        let payload = json!({"error": {"message": "invalid token"}});

        for kind in [
            PlatformKind::Facebook,
            PlatformKind::LinkedIn,
            PlatformKind::PlatformX,
            PlatformKind::Generic,
        ] {
            assert!(transform(kind, &payload, now()).is_empty());
        }
    }

    #[test]
    fn test_classify_topic_tie_prefers_first() {
        assert_eq!(classify_topic("tech music"), "Technology");
        assert_eq!(classify_topic("music festival and an app"), "Entertainment");
        assert_eq!(classify_topic(""), FALLBACK_TOPIC);
    }
}
