//! Datos sinteticos para poblar el cache sin APIs externas.

use chrono::{DateTime, Duration, Utc};
use impact_core::{PlatformReport, Post, Topic};
use rand::Rng;

/// Posts generados por plataforma.
pub const POSTS_PER_PLATFORM: usize = 10;

const WEEK_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Genera `count` posts para `platform`.
///
/// Ids `<platform en minusculas>_post_<n>`, likes en `0..1000`, shares en
/// `0..100`, fecha dentro de los 7 dias previos a `now`.
pub fn synthetic_posts<R: Rng + ?Sized>(
    platform: &str,
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Post> {
    let prefix = platform.to_lowercase();

    (1..=count)
        .map(|n| {
            let age = Duration::milliseconds(rng.gen_range(0..WEEK_MILLIS));
            let topic = Topic::ALL[rng.gen_range(0..Topic::ALL.len())];

            Post::new(
                format!("{}_post_{}", prefix, n),
                format!("This is a sample post for {} - {}", platform, n),
                topic.as_str(),
                now - age,
            )
            .with_counts(rng.gen_range(0..1000), rng.gen_range(0..100))
        })
        .collect()
}

/// Reporte sintetico completo de una plataforma.
pub fn synthetic_report<R: Rng + ?Sized>(
    platform: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> PlatformReport {
    PlatformReport::new(
        platform,
        synthetic_posts(platform, POSTS_PER_PLATFORM, now, rng),
    )
}
