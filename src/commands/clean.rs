//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Caravel;

/// Clean the public directory and the revalidation cache
pub fn run(caravel: &Caravel) -> Result<()> {
    if caravel.public_dir.exists() {
        fs::remove_dir_all(&caravel.public_dir)?;
        tracing::info!("Deleted: {:?}", caravel.public_dir);
    }

    let cache_dir = caravel.base_dir.join(".caravel-cache");
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        tracing::info!("Deleted: {:?}", cache_dir);
    }

    Ok(())
}
