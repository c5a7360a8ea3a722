// Library for tests and the ringcap binary

pub mod config;
pub mod error;
pub mod fetch;
pub mod merger;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod summarizer;
pub mod topology;
pub mod window;
