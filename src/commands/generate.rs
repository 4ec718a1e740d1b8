//! Generate static pages from the content API

use anyhow::Result;

use crate::cache::{self, CacheDb};
use crate::content::Post;
use crate::generator::Generator;
use crate::Caravel;

/// Generate the full site.
///
/// Every known slug is fetched and normalized; pages still inside the
/// revalidation window are left untouched on disk unless `force` is set.
/// The index page is rebuilt on every run. Any fetch or transform failure
/// aborts the run.
pub async fn run(caravel: &Caravel, force: bool) -> Result<()> {
    let start = std::time::Instant::now();

    let client = caravel.client();
    let generator = Generator::new(caravel)?;
    let mut cache = CacheDb::load(&caravel.base_dir);

    let slugs = client.list_slugs().await?;
    tracing::info!("Loaded {} slugs", slugs.len());

    let now = cache::unix_now();
    let mut generated = 0usize;
    let mut skipped = 0usize;
    let mut posts = Vec::with_capacity(slugs.len());

    for slug in &slugs {
        let document = client.get_by_uid(slug).await?;
        let post = Post::from_document(document)?;

        let page_on_disk = caravel
            .public_dir
            .join("posts")
            .join(&post.uid)
            .join("index.html")
            .is_file();

        if force || !page_on_disk || cache.is_stale(&post.uid, now, caravel.config.revalidate_secs)
        {
            let output_path = generator.write_post_page(&post)?;
            cache.record(&post.uid, &output_path, now);
            generated += 1;
        } else {
            tracing::debug!("Skipping '{}', still within revalidation window", post.uid);
            skipped += 1;
        }

        posts.push(post);
    }

    generator.copy_static_assets()?;
    generator.write_index_page(&posts)?;
    cache.save(&caravel.base_dir)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages ({} still fresh) in {:.2}s",
        generated,
        skipped,
        duration.as_secs_f64()
    );

    Ok(())
}
