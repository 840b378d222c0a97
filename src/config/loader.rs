//! Config file loading

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::FileConfig;

pub fn load_config(root: &Path, config_path: Option<&Path>) -> Result<FileConfig> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(root),
    };

    let Some(config_file) = discovered else {
        return Ok(FileConfig::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    // An explicitly passed config must parse; an auto-discovered one only
    // warns and falls back to defaults.
    let parsed = match ext.as_str() {
        "toml" => match parse_toml_config(&content, &config_file) {
            Ok(cfg) => cfg,
            Err(e) => {
                if config_path_provided {
                    return Err(e);
                }
                tracing::warn!(
                    "Failed to parse auto-discovered config {}: {}",
                    config_file.display(),
                    e
                );
                return Ok(FileConfig::default());
            }
        },
        "yaml" | "yml" => match parse_yaml_config(&content, &config_file) {
            Ok(cfg) => cfg,
            Err(e) => {
                if config_path_provided {
                    return Err(e);
                }
                tracing::warn!(
                    "Failed to parse auto-discovered config {}: {}",
                    config_file.display(),
                    e
                );
                return Ok(FileConfig::default());
            }
        },
        other => {
            let err = anyhow::anyhow!(
                "Unsupported config extension '.{}' for file {}",
                other,
                config_file.display()
            );
            if config_path_provided {
                return Err(err);
            }
            tracing::warn!("{}", err);
            return Ok(FileConfig::default());
        }
    };

    Ok(parsed)
}

/// Parse TOML config, supporting a nested [code-mentor] section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = if let Some(nested) = raw.get("code-mentor") { nested.clone() } else { raw };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested code-mentor section.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = if let Some(nested) = raw.get("code-mentor") { nested.clone() } else { raw };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(root: &Path) -> Option<std::path::PathBuf> {
    let candidates = [
        "code-mentor.toml",
        ".code-mentor.toml",
        "code-mentor.yml",
        ".code-mentor.yml",
        "code-mentor.yaml",
        ".code-mentor.yaml",
    ];

    for candidate in candidates {
        let path = root.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(tmp.path(), None).expect("config");
        assert!(cfg.model.is_none());
        assert!(cfg.max_chunk_size.is_none());
    }

    #[test]
    fn test_load_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("code-mentor.toml");
        fs::write(&path, "model = 'gpt-4o'\nmax_chunk_size = 4000\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.model.as_deref(), Some("gpt-4o"));
        assert_eq!(cfg.max_chunk_size, Some(4000));
    }

    #[test]
    fn test_load_toml_nested_section() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("code-mentor.toml");
        fs::write(&path, "[code-mentor]\nbase_url = 'http://localhost:8000/v1'\n")
            .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:8000/v1"));
    }

    #[test]
    fn test_load_yaml_config() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join(".code-mentor.yml");
        fs::write(&path, "model: gpt-4o-mini\nrequest_timeout_secs: 30\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(cfg.request_timeout_secs, Some(30));
    }

    #[test]
    fn test_explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "max_chunk_size = 'lots'\n").expect("write");

        let result = load_config(tmp.path(), Some(&path));
        assert!(result.is_err(), "explicit config with invalid type should return Err");
    }

    #[test]
    fn test_explicit_config_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.ini");
        fs::write(&path, "model=gpt\n").expect("write");

        let result = load_config(tmp.path(), Some(&path));
        assert!(result.is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_type_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("code-mentor.toml"), "max_chunk_size = 'lots'\n")
            .expect("write");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert!(cfg.max_chunk_size.is_none());
    }

    #[test]
    fn test_explicit_missing_file_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let result = load_config(tmp.path(), Some(&tmp.path().join("absent.toml")));
        assert!(result.is_err());
    }
}
