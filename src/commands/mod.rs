//! CLI command implementations

pub mod list;
pub mod new;
pub mod related;
pub mod show;
pub mod sitemap;
pub mod tags;
pub mod watch;
