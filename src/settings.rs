//! 搜索设置
//!
//! JSON 文件，字段全部可省略：
//! ```json
//! { "strength": "secondary", "canonical": true, "breaks": "word",
//!   "contractions": { "ch": "" }, "expansions": { "æ": "ae" } }
//! ```
//! `contractions` 的值为空时给该序列分配新的 primary，否则按值的根权重排序。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::collation::{root_weights, Collator, RootCollator, Strength, Tailoring};
use crate::search::StringSearch;
use crate::text::BreakKind;

const SETTINGS_DIR: &str = "zsearch";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default)]
    pub strength: Strength,
    #[serde(default)]
    pub alternate_shifted: bool,
    #[serde(default)]
    pub canonical: bool,
    #[serde(default)]
    pub overlapping: bool,
    #[serde(default)]
    pub breaks: BreakKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub contractions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expansions: BTreeMap<String, String>,
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// 内容合法但无法使用，例如展开的键不是单个字符
    Invalid(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "Parse error: {}", e),
            SettingsError::Invalid(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl SearchSettings {
    pub fn from_json(data: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tailoring(&self) -> Result<Tailoring, SettingsError> {
        let mut tailoring = Tailoring::new();
        for (seq, like) in &self.contractions {
            if seq.chars().count() < 2 {
                return Err(SettingsError::Invalid(format!(
                    "contraction {:?} needs at least two characters",
                    seq
                )));
            }
            tailoring = if like.is_empty() {
                tailoring.contraction(seq)
            } else {
                let mut ces = Vec::new();
                for ch in like.chars() {
                    root_weights(ch, &mut ces);
                }
                ces.retain(|ce| !ce.is_ignorable());
                tailoring.contraction_with(seq, ces)
            };
        }
        for (key, as_text) in &self.expansions {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(SettingsError::Invalid(format!(
                    "expansion key {:?} must be a single character",
                    key
                )));
            };
            tailoring = tailoring.expansion(ch, as_text);
        }
        Ok(tailoring)
    }

    pub fn build_collator(&self) -> Result<RootCollator, SettingsError> {
        Ok(RootCollator::new()
            .with_strength(self.strength)
            .with_alternate_shifted(self.alternate_shifted)
            .with_tailoring(self.tailoring()?))
    }

    /// 会话级选项：规范等价、重叠和断点
    pub fn apply<C: Collator>(&self, search: &mut StringSearch<C>) {
        search.set_canonical(self.canonical);
        search.set_overlapping(self.overlapping);
        let breaks = match self.breaks {
            BreakKind::Grapheme => None,
            kind => Some(kind.service()),
        };
        search.set_break_service(breaks);
    }
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// 文件不存在时返回默认设置
pub fn load(path: &Path) -> Result<SearchSettings, SettingsError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "settings file missing, using defaults");
            return Ok(SearchSettings::default());
        }
        Err(e) => return Err(e.into()),
    };
    let settings = SearchSettings::from_json(&data)?;
    tracing::debug!(path = %path.display(), ?settings, "settings loaded");
    Ok(settings)
}

pub fn load_default() -> Result<SearchSettings, SettingsError> {
    match get_settings_path() {
        Some(path) => load(&path),
        None => Ok(SearchSettings::default()),
    }
}

pub fn ensure_settings_file_at(path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        std::fs::write(path, SearchSettings::default().to_json()?)?;
    }
    Ok(())
}

pub fn ensure_settings_file() -> Result<PathBuf, SettingsError> {
    let path = get_settings_path().ok_or_else(|| {
        SettingsError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        ))
    })?;
    ensure_settings_file_at(&path)?;
    Ok(path)
}

fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(target_os = "windows"))]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg.is_empty() {
                return Some(PathBuf::from(xdg));
            }
        }
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config"))
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
