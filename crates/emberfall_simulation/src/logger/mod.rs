//! Подключаемый логгер симуляции
//!
//! Core не привязан к конкретному выводу: фронтенд ставит свой
//! [`LogPrinter`] через [`set_logger`], headless-запуск получает
//! консольный принтер через [`init_logger`].

use once_cell::sync::Lazy;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn print(&self, level: LogLevel, message: &str);
}

static LOGGER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));
static MIN_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

/// Подменяет принтер (фронтенд вызывает при старте)
pub fn set_logger(printer: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(printer);
    }
}

pub fn set_log_level(level: LogLevel) {
    if let Ok(mut slot) = MIN_LEVEL.lock() {
        *slot = level;
    }
}

/// Ставит консольный принтер, если никакой ещё не установлен
pub fn init_logger() {
    if let Ok(mut slot) = LOGGER.lock() {
        if slot.is_none() {
            *slot = Some(Box::new(ConsoleLogger));
        }
    }
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    let min_level = MIN_LEVEL.lock().map(|l| *l).unwrap_or(LogLevel::Debug);
    if level < min_level {
        return;
    }
    if let Ok(slot) = LOGGER.lock() {
        if let Some(printer) = slot.as_ref() {
            let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
            printer.print(level, &format!("[{timestamp}] {message}"));
        }
    }
}

struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn print(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}
