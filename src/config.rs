use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::api::DEFAULT_ENDPOINT;
use crate::pagination::DEFAULT_SPAN;

/// Quiet period before a typed query is searched.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Flags that can come from the command line or an rc file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub api_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub span: Option<u32>,
    pub log_file: Option<PathBuf>,
    pub no_mouse: bool,
}

impl ConfigFlags {
    /// Merge two flag sets; values in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            api_url: other.api_url.clone().or_else(|| self.api_url.clone()),
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            span: other.span.or(self.span),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            no_mouse: self.no_mouse || other.no_mouse,
        }
    }
}

/// Effective runtime settings after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub debounce_ms: u64,
    pub span: u32,
    pub mouse_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_ENDPOINT.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            span: DEFAULT_SPAN,
            mouse_enabled: true,
        }
    }
}

impl Settings {
    pub fn from_flags(flags: &ConfigFlags) -> Self {
        let defaults = Self::default();
        Self {
            api_url: flags.api_url.clone().unwrap_or(defaults.api_url),
            debounce_ms: flags.debounce_ms.unwrap_or(defaults.debounce_ms),
            span: flags.span.unwrap_or(defaults.span),
            mouse_enabled: !flags.no_mouse,
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("charsearch").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("charsearch")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("charsearch").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("charsearch")
                .join("config");
        }
    }

    PathBuf::from(".charsearchrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".charsearchrc")
}

/// Read flags from an rc file; a missing file yields no flags.
///
/// # Errors
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

/// Write `flags` to an rc file, creating parent directories.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# charsearch defaults (saved with --save)".to_string());
    if let Some(url) = &flags.api_url {
        lines.push(format!("--api-url {url}"));
    }
    if let Some(ms) = flags.debounce_ms {
        lines.push(format!("--debounce-ms {ms}"));
    }
    if let Some(span) = flags.span {
        lines.push(format!("--span {span}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if flags.no_mouse {
        lines.push("--no-mouse".to_string());
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove an rc file if present.
///
/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract the persistable flags from raw arguments, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "--api-url" | "--debounce-ms" | "--span" | "--log-file"
        );
        let value = if takes_value {
            match inline {
                Some(value) => Some(value.to_string()),
                None => {
                    i += 1;
                    tokens.get(i).cloned()
                }
            }
        } else {
            None
        };

        match (name, value) {
            ("--api-url", Some(value)) => flags.api_url = Some(value),
            ("--debounce-ms", Some(value)) => {
                flags.debounce_ms = value.parse().ok().or(flags.debounce_ms);
            }
            ("--span", Some(value)) => flags.span = value.parse().ok().or(flags.span),
            ("--log-file", Some(value)) => flags.log_file = Some(PathBuf::from(value)),
            ("--no-mouse", _) => flags.no_mouse = true,
            _ => {}
        }
        i += 1;
    }
    flags
}
