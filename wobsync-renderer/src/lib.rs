//! # wobsync-renderer
//!
//! Tera-based template engine that renders feed data into the fixed HTML
//! post layouts synchronized into topics.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wobsync_renderer::Renderer;
//! use wobsync_core::types::{Channel, FeedSource};
//!
//! fn render(feed: &FeedSource, channel: &Channel) {
//!     if let Ok(renderer) = Renderer::new() {
//!         if let Ok(root) = renderer.render_root(feed, channel) {
//!             println!("{} bytes", root.len());
//!         }
//!         for item in &channel.items {
//!             if let Ok(body) = renderer.render_post(item) {
//!                 println!("{} bytes", body.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod text;

pub use engine::Renderer;
pub use error::RenderError;
pub use text::{escape_html, shorten};
