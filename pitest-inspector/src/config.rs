use std::path::{Path, PathBuf};

use serde::Deserialize;

/// What a render produces: a standalone document, or only the source tab for embedding.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Page,
    Fragment,
}

pub struct ServerConfig {
    pub port: u16,
    pub source_dir: PathBuf,
    /// Holds one `<source path>.json` measures file per source file.
    pub measures_dir: PathBuf,
    pub resource_dir: PathBuf,
}

impl ServerConfig {
    pub fn measures_path(&self, source: &Path) -> PathBuf {
        let mut path = self.measures_dir.join(source).into_os_string();
        path.push(".json");
        PathBuf::from(path)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.resource_dir.join("static")
    }
}
