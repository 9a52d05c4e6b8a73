//! Plain-text export of generated titles.

use crate::{parse::Category, PlannerError, TitleSet};
use std::path::{Path, PathBuf};
use tracing::info;

/// Render `titles` as a text document: a heading naming the destination,
/// then one section per category with 1-based numbering.
#[must_use]
pub fn format_title_document(destination: &str, titles: &TitleSet) -> String {
    let sections = Category::ALL
        .iter()
        .map(|&category| {
            let items = titles.category(category);
            let lines = items
                .iter()
                .enumerate()
                .map(|(i, title)| format!("{}. {title}", i + 1))
                .collect::<Vec<_>>()
                .join("\n");
            format!("■ {} ({})\n{lines}", category.label(), items.len())
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "[ {} travel blog title ideas ]\n\n{sections}",
        destination.trim()
    )
}

/// File name for the export of `destination`. Characters that are not
/// allowed in file names are replaced with `_`.
#[must_use]
pub fn export_filename(destination: &str) -> String {
    let name: String = destination
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let name = if name.is_empty() { "destination" } else { &name };

    format!("{name}_travel_titles_60.txt")
}

/// Write the export of `titles` into `dir` and return the file path.
pub async fn save_title_document(
    dir: &Path,
    destination: &str,
    titles: &TitleSet,
) -> Result<PathBuf, PlannerError> {
    let path = dir.join(export_filename(destination));
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, format_title_document(destination, titles)).await?;
    info!(path = %path.display(), titles = titles.len(), "saved title document");
    Ok(path)
}
