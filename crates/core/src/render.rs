//! Markdown-to-HTML rendering seam and final page assembly.
//!
//! The pipeline treats the renderer as an opaque `markdown -> html`
//! function; [`ComrakRenderer`] is the default implementation. Tests can
//! substitute their own to observe or fail renders.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer failed on '{page}': {message}")]
    Failed { page: String, message: String },
}

pub trait Renderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// Default renderer backed by comrak.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComrakRenderer;

impl Renderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        Ok(comrak::markdown_to_html(markdown, &comrak::Options::default()))
    }
}

/// Wrap a rendered body in the site's header and footer.
///
/// The header template's `{{site_title}}` placeholder is substituted; the
/// copyright notice, when given, lands only on the landing page.
pub fn assemble_page(
    header: &str,
    body_html: &str,
    footer: &str,
    site_title: &str,
    copyright: Option<&str>,
) -> String {
    let mut page = header.replace("{{site_title}}", site_title);
    page.push_str(body_html);
    if let Some(text) = copyright {
        if !text.is_empty() {
            page.push_str(&format!("<p class=\"copyright\">{text}</p>\n"));
        }
    }
    page.push_str(footer);
    page
}
