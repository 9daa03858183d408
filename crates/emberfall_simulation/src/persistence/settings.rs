//! Настройки приложения: секция → ключ → значение
//!
//! Core хранит и персистит, интерпретация значений — забота фронтенда.

use serde_json::{json, Value};
use std::collections::HashMap;

pub type Settings = HashMap<String, HashMap<String, Value>>;

/// Дефолтные секции audio и display
pub fn default_settings() -> Settings {
    let mut settings = Settings::new();

    let mut audio = HashMap::new();
    audio.insert("master_volume".to_string(), json!(1.0));
    audio.insert("music_volume".to_string(), json!(0.8));
    audio.insert("sfx_volume".to_string(), json!(1.0));
    settings.insert("audio".to_string(), audio);

    let mut display = HashMap::new();
    display.insert("fullscreen".to_string(), json!(false));
    display.insert("vsync".to_string(), json!(true));
    settings.insert("display".to_string(), display);

    settings
}
