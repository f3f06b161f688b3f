//! # Moderation SDK
//!
//! A small client for hosted content-moderation APIs, starting with OpenAI.
//!
//! ## Example
//!
//! ```rust,no_run
//! use moderation_sdk::client::ModerationClient;
//! use moderation_sdk::openai::OpenAIModerationClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIModerationClient::new("your-api-key")?;
//!     let verdict = client.moderate("Is this fine to post?").await?;
//!
//!     if verdict.flagged {
//!         println!("Flagged for: {}", verdict.categories.join(", "));
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod openai;
pub mod types;
