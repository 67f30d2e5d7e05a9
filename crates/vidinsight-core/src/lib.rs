//! Vidinsight Core Library
//!
//! This crate provides the domain models, key generation, routes, configuration
//! and error types shared by the gateway client and the command-line pages.

pub mod config;
pub mod constants;
pub mod error;
pub mod keys;
pub mod models;
pub mod routes;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::CoreError;
pub use keys::{generate_unique_key, route_id_for_key};
pub use models::{
    AnalysisResult, DetectedLabel, LabelFrame, SelectedFile, Sentiment, SentimentAnalysis,
    SubResult, UploadCandidate, UploadUrlRequest, UploadUrlResponse, VideoAnalysis, VideoMetadata,
};
pub use routes::Route;
