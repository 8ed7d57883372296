use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

const SETTINGS_FILE: &str = "settings.json";

/// Директория конфигурации (`~/.config/mcdev` и аналоги), None если домашняя
/// директория не определена
pub fn config_dir() -> Option<&'static Path> {
    CONFIG_DIR
        .get_or_init(|| ProjectDirs::from("", "", "mcdev").map(|d| d.config_dir().to_path_buf()))
        .as_deref()
}

pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE))
}
