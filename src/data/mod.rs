//! Loaders for the materialized snapshot and post tables.
//!
//! The collector exports each table as a JSON array. Read and parse errors
//! are returned to the caller as-is, with the file path attached.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;

use crate::models::{Post, Snapshot};

/// Reads the daily snapshot table.
pub fn load_snapshots(path: impl AsRef<Path>) -> Result<Vec<Snapshot>> {
    let rows: Vec<Snapshot> = read_json(path.as_ref())?;
    info!(
        "Loaded {} snapshots from {}",
        rows.len(),
        path.as_ref().display()
    );
    Ok(rows)
}

/// Reads the post table used by the weekly report.
pub fn load_posts(path: impl AsRef<Path>) -> Result<Vec<Post>> {
    let posts: Vec<Post> = read_json(path.as_ref())?;
    info!("Loaded {} posts from {}", posts.len(), path.as_ref().display());
    Ok(posts)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}
