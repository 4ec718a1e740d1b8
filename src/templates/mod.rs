//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary. Autoescaping stays on:
//! the only unescaped insertion point is the pre-converted rich-text body
//! HTML, which templates mark `safe` explicitly. That markup comes from the
//! rich-text converter, which is the trusted sanitization boundary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer with the embedded caravel theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("caravel/layout.html")),
            ("index.html", include_str!("caravel/index.html")),
            ("post.html", include_str!("caravel/post.html")),
            ("loading.html", include_str!("caravel/loading.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Site-level data available to every template
#[derive(Debug, Clone, Serialize)]
pub struct SiteView {
    pub title: String,
    pub description: String,
    pub author: String,
    pub root: String,
}

/// Data for a rendered post page
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: String,
    /// Formatted publication date; absent for never-published documents
    pub formatted_date: Option<String>,
    /// Estimated reading time in minutes
    pub reading_time: usize,
    pub blocks: Vec<BlockView>,
}

/// One content block of a post page
#[derive(Debug, Clone, Serialize)]
pub struct BlockView {
    pub heading: String,
    /// Pre-converted, trusted HTML
    pub body_html: String,
}

/// One entry of the index page
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub formatted_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteView {
        SiteView {
            title: "spacetraveling".to_string(),
            description: String::new(),
            author: String::new(),
            root: "/".to_string(),
        }
    }

    #[test]
    fn test_render_loading_page() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("current_year", "2023");

        let html = renderer.render("loading.html", &context).unwrap();
        assert!(html.contains("Carregando..."));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn test_render_post_page_escapes_titles_but_trusts_body() {
        let renderer = TemplateRenderer::new().unwrap();
        let post = PostView {
            title: "Tags & <scripts>".to_string(),
            subtitle: String::new(),
            author: "Ana".to_string(),
            banner_url: "https://images.example.com/banner.png".to_string(),
            formatted_date: Some("15 mar 2023".to_string()),
            reading_time: 4,
            blocks: vec![BlockView {
                heading: "Intro".to_string(),
                body_html: "<p>already <strong>converted</strong></p>".to_string(),
            }],
        };

        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("current_year", "2023");
        context.insert("post", &post);

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("Tags &amp; &lt;scripts&gt;"));
        assert!(html.contains("<p>already <strong>converted</strong></p>"));
        assert!(html.contains("15 mar 2023"));
        assert!(html.contains("4 min"));
    }

    #[test]
    fn test_render_post_page_without_date_omits_the_entry() {
        let renderer = TemplateRenderer::new().unwrap();
        let post = PostView {
            title: "Draft".to_string(),
            subtitle: String::new(),
            author: "Ana".to_string(),
            banner_url: "https://images.example.com/banner.png".to_string(),
            formatted_date: None,
            reading_time: 0,
            blocks: vec![],
        };

        let mut context = Context::new();
        context.insert("site", &site());
        context.insert("current_year", "2023");
        context.insert("post", &post);

        let html = renderer.render("post.html", &context).unwrap();
        assert!(!html.contains("class=\"date\""));
    }
}
