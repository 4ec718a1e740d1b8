//! caravel: a static blog generator backed by a headless CMS
//!
//! This crate fetches blog posts from a headless content API, normalizes
//! them into a compact post record, and renders static HTML pages with
//! embedded Tera templates. Pages older than the configured revalidation
//! window are regenerated in the background by the server.

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main Caravel application
#[derive(Clone)]
pub struct Caravel {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets directory (copied verbatim into public)
    pub static_dir: std::path::PathBuf,
}

impl Caravel {
    /// Create a new Caravel instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
            static_dir,
        })
    }

    /// Build a content API client from the configuration
    pub fn client(&self) -> api::ContentClient {
        api::ContentClient::new(&self.config.api_url, &self.config.document_type)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self, false).await
    }

    /// Clean the public directory and cache
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
