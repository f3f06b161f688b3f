pub mod client;
pub mod types;

pub use client::OpenAIModerationClient;
pub use types::*;
