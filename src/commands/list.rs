//! List known slugs and their generation status

use anyhow::Result;

use crate::cache::{self, CacheDb};
use crate::Caravel;

/// List every slug the content API knows about, with the local page status
pub async fn run(caravel: &Caravel) -> Result<()> {
    let client = caravel.client();
    let cache = CacheDb::load(&caravel.base_dir);
    let now = cache::unix_now();

    let slugs = client.list_slugs().await?;

    println!("Posts ({}):", slugs.len());
    for slug in &slugs {
        let page_on_disk = caravel
            .public_dir
            .join("posts")
            .join(slug)
            .join("index.html")
            .is_file();

        let status = if !page_on_disk {
            "missing"
        } else if cache.is_stale(slug, now, caravel.config.revalidate_secs) {
            "stale"
        } else {
            "fresh"
        };

        println!("  {} [{}]", slug, status);
    }

    Ok(())
}
