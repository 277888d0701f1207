//! HTTP API handlers for jop-api

pub mod episodes;
pub mod health;
pub mod reference;

pub use episodes::{episode_detail, list_episodes, list_episodes_body};
pub use health::health_routes;
pub use reference::{list_colors, list_months, list_subjects};
