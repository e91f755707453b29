pub mod annotator;
pub mod assets;
pub mod config;
pub mod files;
pub mod renderer;
pub mod server;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use pitest_json::Measures;
use serde::de::DeserializeOwned;

use crate::assets::AssetResolver;
use crate::config::Output;
use crate::files::{Files, SourceProvider};
use crate::renderer::RenderContext;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("malformed json in {}: {source}", path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    Data(#[from] pitest_json::Error),
    #[error("failed to write html")]
    Fmt(#[from] std::fmt::Error),
}

pub fn read_json<T: DeserializeOwned>(json_path: &Path) -> Result<T, Error> {
    let file = File::open(json_path).map_err(|source| Error::Io { path: json_path.to_owned(), source })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| Error::Json { path: json_path.to_owned(), source })
}

/// Loads the source lines and measures of one file and renders them.
pub fn render_file(
    files: &impl SourceProvider,
    source: &Path,
    measures_path: &Path,
    assets: &AssetResolver,
    output: Output,
) -> Result<String, Error> {
    let lines = files.source_lines(source)?;
    let measures: Measures = read_json(measures_path)?;
    let title = source.to_string_lossy();
    tracing::debug!(file = %title, lines = lines.len(), "rendering");

    let ctx = RenderContext { title: &title, lines: &lines, measures: &measures, assets };
    match output {
        Output::Page => renderer::render_page(&ctx),
        Output::Fragment => renderer::render_source_tab(&ctx),
    }
}

/// Renders a standalone source file, resolving it against its own directory.
pub fn render_source_file(
    source: &Path,
    measures_path: &Path,
    assets: &AssetResolver,
    output: Output,
) -> Result<String, Error> {
    let file_name = source.file_name().ok_or_else(|| Error::NotFound(source.to_owned()))?;
    let root = source.parent().unwrap_or(Path::new(""));
    render_file(&Files::new(root), Path::new(file_name), measures_path, assets, output)
}
