use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::session::TitlePolicy;

/// Smallest and largest editor pane share, in percent.
pub const SPLIT_RANGE: std::ops::RangeInclusive<u16> = 20..=80;
pub const DEFAULT_SPLIT: u16 = 50;

/// Flags that can be given on the command line or saved as defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub split: Option<u16>,
    pub title_policy: Option<TitlePolicy>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge two flag sets; values in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            split: other.split.or(self.split),
            title_policy: other.title_policy.or(self.title_policy),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    pub fn split_or_default(&self) -> u16 {
        self.split.unwrap_or(DEFAULT_SPLIT)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markpad")
                .join("config");
        }
    }

    PathBuf::from(".markpadrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markpadrc")
}

/// Load saved flags. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Persist `flags` as defaults, one flag per line.
///
/// # Errors
///
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# markpad defaults (saved with --save)".to_string()];
    if let Some(split) = flags.split {
        lines.push(format!("--split {split}"));
    }
    if let Some(policy) = flags.title_policy {
        let policy_str = match policy {
            TitlePolicy::Append => "append",
            TitlePolicy::Replace => "replace",
        };
        lines.push(format!("--title-policy {policy_str}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove saved defaults, if any.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from raw argument tokens, ignoring everything else.
///
/// Invalid values are dropped rather than reported; clap has already
/// validated the command line by the time this runs.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(name, "--split" | "--title-policy" | "--log-file");
        if takes_value {
            let value = match inline_value {
                Some(value) => Some(value),
                None => {
                    i += 1;
                    tokens.get(i).map(String::as_str)
                }
            };
            if let Some(value) = value {
                match name {
                    "--split" => flags.split = parse_split(value),
                    "--title-policy" => flags.title_policy = parse_title_policy(value),
                    _ => flags.log_file = Some(PathBuf::from(value)),
                }
            }
        }
        i += 1;
    }
    flags
}

fn parse_split(s: &str) -> Option<u16> {
    s.parse::<u16>().ok().filter(|v| SPLIT_RANGE.contains(v))
}

fn parse_title_policy(s: &str) -> Option<TitlePolicy> {
    match s {
        "append" => Some(TitlePolicy::Append),
        "replace" => Some(TitlePolicy::Replace),
        _ => None,
    }
}
