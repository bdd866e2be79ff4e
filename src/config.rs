use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

const DEFAULT_ACCOUNT: &str = "shokujinjp";
const DEFAULT_QUERIES: [&str; 3] = ["今週の週替わり定食", "今週の週変わり定食", "#食神週替わり定食"];

/// Where to look for the weekly post
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct FeedConfig {
    pub(crate) account: String,
    pub(crate) queries: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            account: DEFAULT_ACCOUNT.to_string(),
            queries: DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OcrConfig {
    /// Override for the text-detection endpoint
    #[serde(default)]
    pub(crate) endpoint: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) ledger: Option<PathBuf>,
    #[serde(default)]
    pub(crate) timezone: Option<String>,
    #[serde(default)]
    pub(crate) strict_slots: bool,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) feed: FeedConfig,
    #[serde(default)]
    pub(crate) ocr: OcrConfig,
}

/// A loaded config plus what happened while finding it
///
/// Loading runs before the log subscriber exists, so the outcome is kept
/// here and reported through [`LoadedConfig::log`] once logging is up.
#[derive(Debug, Default)]
pub(crate) struct LoadedConfig {
    pub(crate) config: Config,
    pub(crate) path: Option<PathBuf>,
    pub(crate) rejected: Vec<(PathBuf, toml::de::Error)>,
}

impl LoadedConfig {
    pub(crate) fn log(&self) {
        for (path, e) in &self.rejected {
            warn!("Failed to parse {}: {}", path.display(), e);
        }
        match &self.path {
            Some(path) => debug!("Loaded config from {}", path.display()),
            None => debug!("No config file found, using defaults"),
        }
    }
}

impl Config {
    pub(crate) fn load() -> LoadedConfig {
        Self::load_from(Self::get_config_paths())
    }

    fn load_from(paths: Vec<PathBuf>) -> LoadedConfig {
        let mut loaded = LoadedConfig::default();

        // Try config locations in order of priority
        for path in paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        loaded.config = config;
                        loaded.path = Some(path);
                        return loaded;
                    }
                    Err(e) => loaded.rejected.push((path, e)),
                }
            }
        }

        loaded
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/weekly-menu/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("weekly-menu").join("config.toml"));
        }

        // 2. Platform config dir (e.g. ~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("weekly-menu").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.weekly-menu.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".weekly-menu.toml"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        let paths = Config::get_config_paths();
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.to_string_lossy().contains("weekly-menu")));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.ledger.is_none());
        assert!(!config.strict_slots);
        assert_eq!(config.feed.account, "shokujinjp");
        assert_eq!(config.feed.queries.len(), 3);
        assert!(config.ocr.endpoint.is_none());
    }

    #[test]
    fn full_config_parses() {
        let config: Config = toml::from_str(
            r#"
ledger = "/srv/menu/weekly.csv"
timezone = "Asia/Tokyo"
strict_slots = true
debug = true

[feed]
account = "someshop"
queries = ["weekly lunch"]

[ocr]
endpoint = "http://localhost:8080/annotate"
"#,
        )
        .unwrap();
        assert_eq!(config.ledger, Some(PathBuf::from("/srv/menu/weekly.csv")));
        assert_eq!(config.timezone.as_deref(), Some("Asia/Tokyo"));
        assert!(config.strict_slots);
        assert!(config.debug);
        assert_eq!(config.feed.account, "someshop");
        assert_eq!(config.feed.queries, vec!["weekly lunch".to_string()]);
        assert_eq!(
            config.ocr.endpoint.as_deref(),
            Some("http://localhost:8080/annotate")
        );
    }

    #[test]
    fn partial_feed_keeps_default_queries() {
        let config: Config = toml::from_str("[feed]\naccount = \"other\"\n").unwrap();
        assert_eq!(config.feed.account, "other");
        assert_eq!(config.feed.queries[0], "今週の週替わり定食");
    }

    #[test]
    fn load_from_skips_unparsable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("config.toml");
        fs::write(&broken, "debug = \"yes\"\n").unwrap();
        fs::write(&good, "debug = true\n").unwrap();

        let loaded = Config::load_from(vec![dir.path().join("missing.toml"), broken.clone(), good.clone()]);
        assert!(loaded.config.debug);
        assert_eq!(loaded.path, Some(good));
        assert_eq!(loaded.rejected.len(), 1);
        assert_eq!(loaded.rejected[0].0, broken);
    }

    #[test]
    fn load_from_without_files_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = Config::load_from(vec![dir.path().join("missing.toml")]);
        assert!(loaded.path.is_none());
        assert!(loaded.rejected.is_empty());
        assert!(!loaded.config.debug);
    }
}
