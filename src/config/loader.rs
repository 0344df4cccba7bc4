use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::BigoConfig;
use crate::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".bigo.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<BigoConfig> {
    let config = toml::from_str::<BigoConfig>(contents)
        .map_err(|e| Error::config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;
    config.validate()?;
    Ok(config)
}

/// Try loading config from a specific path, falling back on any problem
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<BigoConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} ({}). Using defaults.", e, config_path.display());
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Directory and its ancestors, nearest first, up to `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.bigo.toml`
pub fn load_config_from(start: &Path) -> BigoConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            BigoConfig::default()
        })
}

/// Search the current directory and its ancestors for `.bigo.toml`
pub fn load_config() -> BigoConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            BigoConfig::default()
        }
    }
}

/// Load a config file named explicitly; every problem is an error
pub fn load_config_file(path: &Path) -> Result<BigoConfig> {
    let contents = read_config_file(path)
        .map_err(|e| Error::file_system("Failed to read config file", path, e))?;
    let config = parse_and_validate_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::StrategyKind;
    use tempfile::TempDir;

    #[test]
    fn test_parse_and_validate_config() {
        let config = parse_and_validate_config("[output]\nevidence = true\n").unwrap();
        assert!(config.output.evidence);

        let err = parse_and_validate_config("[analysis]\nstrategy = \"guess\"\n").unwrap_err();
        assert!(err.to_string().contains(".bigo.toml"));
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_load_config_from_ancestor() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[analysis]\nstrategy = \"pattern\"\n",
        )
        .unwrap();
        let nested = temp.path().join("src").join("lib");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config_from(&nested);
        assert_eq!(config.analysis.strategy, StrategyKind::Pattern);
    }

    #[test]
    fn test_invalid_discovered_config_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "[analysis\nbroken").unwrap();

        assert_eq!(load_config_from(temp.path()), BigoConfig::default());
    }

    #[test]
    fn test_explicit_config_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        assert!(matches!(
            load_config_file(&missing),
            Err(Error::FileSystem { .. })
        ));

        let invalid = temp.path().join("invalid.toml");
        fs::write(&invalid, "[analysis]\nmax_passes = 0\n").unwrap();
        assert!(matches!(
            load_config_file(&invalid),
            Err(Error::Configuration(_))
        ));
    }
}
