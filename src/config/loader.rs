use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::VisionConfig;
use super::validation::{format_config_errors, validate_config_result};
use crate::core::{Error, Result, ResultExt};

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".visionscreen.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML document without semantic validation
pub fn parse_config(contents: &str) -> Result<VisionConfig> {
    Ok(toml::from_str::<VisionConfig>(contents)?)
}

/// Parse and validate config from a TOML string, reporting every problem
pub fn parse_and_validate_config(contents: &str) -> Result<VisionConfig> {
    let config = parse_config(contents)?;
    validate_config_result(&config).map_err(|errors| {
        Error::Configuration(format!(
            "{} invalid setting(s):\n{}",
            errors.len(),
            format_config_errors(&errors)
        ))
    })?;
    Ok(config)
}

/// Try loading config from a specific path; missing or broken files yield `None`
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<VisionConfig> {
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
            log::warn!(
                "Ignoring {}: {}. Using defaults.",
                config_path.display(),
                e
            );
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

/// Directory ancestors of `start`, nearest first, up to a depth limit
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

/// Per-user config location, e.g. `~/.config/visionscreen/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("visionscreen").join("config.toml"))
}

/// Search `start` and its ancestors, then the user config, falling back to defaults
pub fn load_config_from(start: &Path) -> VisionConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .chain(user_config_path())
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            VisionConfig::default()
        })
}

pub fn load_config() -> VisionConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            VisionConfig::default()
        }
    }
}

/// Load an explicitly named config file; unlike discovery, failures are errors
pub fn load_config_from_path_validated(path: &Path) -> Result<VisionConfig> {
    let contents = read_config_file(path)
        .map_err(Error::from)
        .context(format!("Failed to read {}", path.display()))?;
    parse_and_validate_config(&contents).context(format!("Invalid config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_document_yields_defaults() {
        assert_eq!(parse_config("").unwrap(), VisionConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            [acuity]
            bonus_attempts = 3

            [amsler]
            symptom_weight = 2.0
        "#})
        .unwrap();

        assert_eq!(config.acuity.bonus_attempts, 3);
        assert_eq!(config.acuity.levels.len(), 8);
        assert_eq!(config.amsler.symptom_weight, 2.0);
        assert_eq!(config.amsler.high_score, 5.0);
        assert_eq!(config.color_vision.none_min, 90);
    }

    #[test]
    fn test_custom_ladder() {
        let config = parse_and_validate_config(indoc! {r#"
            [[acuity.levels]]
            label = "big"
            stimulus_size = 120.0
            trials_required = 3
            pass_threshold = 2

            [[acuity.levels]]
            label = "small"
            stimulus_size = 30.0
            trials_required = 5
            pass_threshold = 4
        "#})
        .unwrap();

        let labels: Vec<&str> = config.acuity.levels.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["big", "small"]);
    }

    #[test]
    fn test_invalid_values_rejected_with_all_errors() {
        let err = parse_and_validate_config(indoc! {r#"
            [color_vision]
            none_min = 40

            [amsler]
            medium_areas = 9
        "#})
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("2 invalid setting(s)"));
        assert!(msg.contains("color_vision"));
        assert!(msg.contains("amsler.medium_areas"));
    }

    #[test]
    fn test_unbounded_bonus_attempts_rejected() {
        let err = parse_and_validate_config("[acuity]\nbonus_attempts = 4294967295\n").unwrap_err();
        assert!(err.to_string().contains("acuity.bonus_attempts"));
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(matches!(
            parse_config("[acuity\nbonus = "),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_load_config_from_finds_ancestor_file() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[acuity]\nbonus_attempts = 5\n",
        )
        .unwrap();

        let config = load_config_from(&nested);
        assert_eq!(config.acuity.bonus_attempts, 5);
    }

    #[test]
    fn test_invalid_discovered_file_falls_back() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[acuity]\nlevels = []\n",
        )
        .unwrap();

        assert!(try_load_config_from_path(&temp.path().join(CONFIG_FILE_NAME)).is_none());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let err = load_config_from_path_validated(&temp.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn test_directory_ancestors_depth_limit() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }
}
