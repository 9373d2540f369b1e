//! Domain model: posts, items and per-platform reports.

mod item;
mod platform;
mod post;

pub use item::{Item, NewItem};
pub use platform::{PlatformData, PlatformReport};
pub use post::{NewPost, Post, Topic};
