pub mod client;
pub mod error;

pub use client::SourceClient;
pub use error::FetchError;
