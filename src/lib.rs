// captiond - HTTP meme captioning service with a content-addressed render cache

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod metrics;
pub mod models;
pub mod render;
pub mod server;
pub mod utils;
