//! Tera rendering engine — fixed post layouts for topic content.
//!
//! # Layouts
//!
//! | Template         | Output                                                |
//! |------------------|-------------------------------------------------------|
//! | `root.html.tera` | Topic info post: feed title, description, homepage    |
//! | `post.html.tera` | Item post: title, date, shortened link label, body    |
//!
//! Composed bodies are compared verbatim against stored remote content to
//! decide whether an edit is due, so rendering must stay deterministic: same
//! input, same bytes.

use tera::Tera;

use wobsync_core::types::{Channel, ChannelItem, FeedSource};

use crate::context::{PostContext, RootContext};
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("root.html.tera", include_str!("templates/root.html.tera")),
    ("post.html.tera", include_str!("templates/post.html.tera")),
];

fn build_tera() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TPLS.to_vec())?;
    // Every context field is final display text; escaping already happened
    // while building the context.
    tera.autoescape_on(vec![]);
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Tera-based renderer for topic post bodies.
///
/// Uses embedded templates only. Create once with [`Renderer::new`] and reuse.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Construct a new [`Renderer`] with embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Renderer { tera: build_tera()? })
    }

    /// Render the root/info post body for `feed`'s fetched `channel`.
    pub fn render_root(&self, feed: &FeedSource, channel: &Channel) -> Result<String, RenderError> {
        let ctx = RootContext::new(feed, channel);
        Ok(self.tera.render("root.html.tera", &ctx.to_tera_context()?)?)
    }

    /// Render the post body for one feed item.
    pub fn render_post(&self, item: &ChannelItem) -> Result<String, RenderError> {
        let ctx = PostContext::new(item);
        Ok(self.tera.render("post.html.tera", &ctx.to_tera_context()?)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
