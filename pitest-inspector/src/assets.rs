/// Resolves static asset paths to the urls they are served from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetResolver {
    prefix: String,
}

impl AssetResolver {
    pub const STYLESHEET: &'static str = "pitest.css";
    pub const SEPARATOR: &'static str = "images/sep12.svg";

    pub fn new(prefix: &str) -> Self {
        AssetResolver { prefix: prefix.trim_end_matches('/').to_owned() }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.prefix, path.trim_start_matches('/'))
    }
}

impl Default for AssetResolver {
    fn default() -> Self {
        AssetResolver::new(pitest_cli::common::DEFAULT_STATIC_PREFIX)
    }
}
