//! Generator module - renders normalized posts into static HTML files
//!
//! One page generation is a sequential fetch-transform-render-write pass;
//! the generator itself holds no mutable state, so independent generations
//! can run concurrently.

use anyhow::Result;
use std::fs;
use tera::Context;
use walkdir::WalkDir;

use crate::api::ContentClient;
use crate::content::{richtext, Post};
use crate::helpers::{format_publication_date, reading_time};
use crate::templates::{BlockView, IndexEntry, PostView, SiteView, TemplateRenderer};
use crate::Caravel;

/// Static page generator using the embedded Tera templates
pub struct Generator {
    caravel: Caravel,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(caravel: &Caravel) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;

        Ok(Self {
            caravel: caravel.clone(),
            renderer,
        })
    }

    /// Fetch, normalize, and write the page for a single slug.
    ///
    /// This is the on-demand generation path; a fetch or transform failure
    /// propagates to the caller untouched.
    pub async fn generate_post(&self, client: &ContentClient, slug: &str) -> Result<Post> {
        let document = client.get_by_uid(slug).await?;
        let post = Post::from_document(document)?;
        self.write_post_page(&post)?;
        Ok(post)
    }

    /// Render and write one post page; returns the output path relative to
    /// the public dir
    pub fn write_post_page(&self, post: &Post) -> Result<String> {
        let html = self.render_post_page(post)?;

        let relative = format!("posts/{}/index.html", post.uid);
        let output_path = self.caravel.public_dir.join(&relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, &html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated post: {:?}", output_path);

        Ok(relative)
    }

    /// Render a post page to HTML
    pub fn render_post_page(&self, post: &Post) -> Result<String> {
        let mut context = self.base_context();
        context.insert("post", &self.build_post_view(post));
        self.renderer.render("post.html", &context)
    }

    /// Render the transient loading page shown while an on-demand
    /// generation is still in flight
    pub fn render_loading_page(&self) -> Result<String> {
        let context = self.base_context();
        self.renderer.render("loading.html", &context)
    }

    /// Render and write the index page listing all posts, newest first
    pub fn write_index_page(&self, posts: &[Post]) -> Result<()> {
        let mut sorted: Vec<&Post> = posts.iter().collect();
        sorted.sort_by(|a, b| b.first_publication_date.cmp(&a.first_publication_date));

        let entries: Vec<IndexEntry> = sorted
            .iter()
            .map(|post| IndexEntry {
                uid: post.uid.clone(),
                title: post.title.clone(),
                subtitle: post.subtitle.clone(),
                author: post.author.clone(),
                formatted_date: post
                    .first_publication_date
                    .as_ref()
                    .map(format_publication_date),
            })
            .collect();

        let mut context = self.base_context();
        context.insert("entries", &entries);
        let html = self.renderer.render("index.html", &context)?;

        fs::create_dir_all(&self.caravel.public_dir)?;
        let output_path = self.caravel.public_dir.join("index.html");
        fs::write(&output_path, html)?;
        tracing::info!("Generated index page");

        Ok(())
    }

    /// Copy static assets (css, images) into the public directory
    pub fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.caravel.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let relative = path.strip_prefix(static_dir)?;
                let dest = self.caravel.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }

    /// Build the view model for a post page.
    ///
    /// The date formatter is only invoked for published posts; the reading
    /// time comes from the naive word counter.
    fn build_post_view(&self, post: &Post) -> PostView {
        let blocks: Vec<BlockView> = post
            .content
            .iter()
            .map(|block| BlockView {
                heading: block.heading.clone(),
                body_html: richtext::as_html(&block.body),
            })
            .collect();

        PostView {
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            author: post.author.clone(),
            banner_url: post.banner_url.clone(),
            formatted_date: post
                .first_publication_date
                .as_ref()
                .map(format_publication_date),
            reading_time: reading_time(&post.content),
            blocks,
        }
    }

    /// Create a base context with common variables
    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteView {
                title: self.caravel.config.title.clone(),
                description: self.caravel.config.description.clone(),
                author: self.caravel.config.author.clone(),
                root: self.caravel.config.root.clone(),
            },
        );
        context.insert(
            "current_year",
            &chrono::Utc::now().format("%Y").to_string(),
        );
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RichTextFragment;
    use crate::content::ContentBlock;

    fn test_caravel(base: &std::path::Path) -> Caravel {
        Caravel::new(base).unwrap()
    }

    fn sample_post() -> Post {
        Post {
            uid: "como-utilizar-hooks".to_string(),
            first_publication_date: Some("2023-03-15T00:00:00Z".parse().unwrap()),
            title: "Como utilizar Hooks".to_string(),
            subtitle: "Pensando em sincronizacao".to_string(),
            author: "Joseph Oliveira".to_string(),
            banner_url: "https://images.example.com/banner.png".to_string(),
            content: vec![ContentBlock {
                heading: "Proin et varius".to_string(),
                body: vec![RichTextFragment::paragraph("Nulla auctor sit amet quam")],
            }],
        }
    }

    #[test]
    fn test_write_post_page() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&test_caravel(dir.path())).unwrap();

        let relative = generator.write_post_page(&sample_post()).unwrap();
        assert_eq!(relative, "posts/como-utilizar-hooks/index.html");

        let html = std::fs::read_to_string(
            dir.path().join("public/posts/como-utilizar-hooks/index.html"),
        )
        .unwrap();
        assert!(html.contains("Posts | Como utilizar Hooks"));
        assert!(html.contains("15 mar 2023"));
        assert!(html.contains("Joseph Oliveira"));
        assert!(html.contains("1 min"));
        assert!(html.contains("<p>Nulla auctor sit amet quam</p>"));
    }

    #[test]
    fn test_write_index_page_sorts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&test_caravel(dir.path())).unwrap();

        let mut older = sample_post();
        older.uid = "older".to_string();
        older.title = "Older".to_string();
        older.first_publication_date = Some("2020-01-01T00:00:00Z".parse().unwrap());

        let mut newer = sample_post();
        newer.uid = "newer".to_string();
        newer.title = "Newer".to_string();

        generator.write_index_page(&[older, newer]).unwrap();

        let html = std::fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        let newer_at = html.find("Newer").unwrap();
        let older_at = html.find("Older").unwrap();
        assert!(newer_at < older_at);
        assert!(html.contains("posts/newer/"));
    }

    #[test]
    fn test_unpublished_post_renders_without_date() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(&test_caravel(dir.path())).unwrap();

        let mut post = sample_post();
        post.first_publication_date = None;

        let html = generator.render_post_page(&post).unwrap();
        assert!(!html.contains("class=\"date\""));
        assert!(html.contains("Joseph Oliveira"));
    }

    #[test]
    fn test_copy_static_assets() {
        let dir = tempfile::tempdir().unwrap();
        let css_dir = dir.path().join("static/css");
        std::fs::create_dir_all(&css_dir).unwrap();
        std::fs::write(css_dir.join("style.css"), "body { margin: 0 }").unwrap();

        let generator = Generator::new(&test_caravel(dir.path())).unwrap();
        generator.copy_static_assets().unwrap();

        let copied = std::fs::read_to_string(dir.path().join("public/css/style.css")).unwrap();
        assert_eq!(copied, "body { margin: 0 }");
    }
}
