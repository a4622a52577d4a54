use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const RC_FILE_NAME: &str = ".termitrc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardKind {
    System,
    Internal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RcConfig {
    pub tab_stop: usize,
    pub expand_tab: bool,
    pub status_timeout_ms: u64,
    pub resize_debounce_ms: u64,
    pub clipboard: ClipboardKind,
    pub title: Option<String>,
}

impl Default for RcConfig {
    fn default() -> Self {
        Self {
            tab_stop: 4,
            expand_tab: false,
            status_timeout_ms: 4000,
            resize_debounce_ms: 150,
            clipboard: ClipboardKind::System,
            title: None,
        }
    }
}

impl RcConfig {
    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

pub struct RcLoader;

impl RcLoader {
    /// `.termitrc` in the working directory, falling back to `$HOME/.termitrc`.
    pub fn get_rc_path() -> Option<PathBuf> {
        let home = env::var_os("HOME").map(|home| Path::new(&home).join(RC_FILE_NAME));
        std::iter::once(PathBuf::from(RC_FILE_NAME))
            .chain(home)
            .find(|candidate| candidate.is_file())
    }

    /// Loads the discovered RC file, or defaults when there is none.
    pub fn load_config() -> RcConfig {
        let Some(rc_path) = Self::get_rc_path() else {
            return RcConfig::default();
        };
        Self::load_from(&rc_path).unwrap_or_else(|err| {
            debug!(target: "config", path = %rc_path.display(), %err, "rc file unreadable, using defaults");
            RcConfig::default()
        })
    }

    pub fn load_from(path: &Path) -> std::io::Result<RcConfig> {
        let content = fs::read_to_string(path)?;
        debug!(target: "config", path = %path.display(), "rc file loaded");
        Ok(Self::parse(&content))
    }

    fn parse(content: &str) -> RcConfig {
        let mut config = RcConfig::default();
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(['#', '"']))
            .for_each(|line| Self::parse_config_line(line, &mut config));
        config
    }

    fn parse_config_line(line: &str, config: &mut RcConfig) {
        let line = line.split('#').next().unwrap_or_default().trim();

        if let Some(setting) = line.strip_prefix("set ") {
            let setting = setting.trim();
            match setting {
                "expandtab" => config.expand_tab = true,
                "noexpandtab" => config.expand_tab = false,
                _ => match setting.split_once('=') {
                    Some((key, value)) => Self::apply_setting(key.trim(), value.trim(), config),
                    None => debug!(target: "config", setting, "unknown setting ignored"),
                },
            }
        } else if let Some((key, value)) = line.split_once('=') {
            Self::apply_setting(key.trim(), value.trim(), config);
        } else {
            debug!(target: "config", line, "unparsed rc line ignored");
        }
    }

    fn apply_setting(key: &str, value: &str, config: &mut RcConfig) {
        match key {
            "tabstop" | "tab_stop" => match value.parse::<usize>() {
                Ok(tab_stop) if (1..=16).contains(&tab_stop) => config.tab_stop = tab_stop,
                _ => debug!(target: "config", value, "invalid tabstop ignored"),
            },
            "expandtab" | "expand_tab" => config.expand_tab = matches!(value, "true" | "1" | "yes" | "on"),
            "status_timeout" => match value.parse::<u64>() {
                Ok(ms) => config.status_timeout_ms = ms,
                Err(_) => debug!(target: "config", value, "invalid status_timeout ignored"),
            },
            "resize_debounce" => match value.parse::<u64>() {
                Ok(ms) => config.resize_debounce_ms = ms,
                Err(_) => debug!(target: "config", value, "invalid resize_debounce ignored"),
            },
            "clipboard" => match value {
                "system" => config.clipboard = ClipboardKind::System,
                "internal" => config.clipboard = ClipboardKind::Internal,
                _ => debug!(target: "config", value, "invalid clipboard ignored"),
            },
            "title" => {
                let title = value.trim_matches('"');
                config.title = (!title.is_empty()).then(|| title.to_string());
            }
            _ => debug!(target: "config", key, "unknown setting ignored"),
        }
    }
}
