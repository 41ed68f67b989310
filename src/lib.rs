// Library exports for the CLI and integration tests
pub mod analysis;
pub mod comment;
pub mod comment_selector;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod filter;
pub mod logging;
pub mod renderer;
pub mod sentiment;
pub mod stats;
pub mod stats_builder;
pub mod timefmt;
pub mod video_id;
pub mod view;
