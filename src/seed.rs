use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::devotions::Devotions;
use crate::model::NewDevotion;

pub fn read_records(path: &Path) -> Result<Vec<NewDevotion>> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read seed file {}", path.display()))?;
    let records = serde_json::from_str(&raw).with_context(|| format!("invalid seed file {}", path.display()))?;
    Ok(records)
}

/// Inserts the records one at a time and stops at the first failure. Rows
/// inserted before the failure stay, and running it twice inserts everything
/// twice.
pub async fn seed(repo: &Devotions<'_>, records: Vec<NewDevotion>) -> Result<usize> {
    let total = records.len();
    for (idx, record) in records.into_iter().enumerate() {
        repo.insert(record)
            .await
            .with_context(|| format!("failed to insert record {} of {}", idx + 1, total))?;
    }
    Ok(total)
}
