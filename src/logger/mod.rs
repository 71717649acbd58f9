use colored::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

pub struct Logger {
    show_debug: bool,
    show_info: bool,
    show_warning: bool,
    show_error: bool,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            show_debug: false,
            show_info: true,
            show_warning: true,
            show_error: true,
        }
    }

    /// Logger configured from `ONCODERMA_DEBUG` / `ONCODERMA_QUIET`.
    pub fn from_env() -> Self {
        let mut logger = Self::new();
        if std::env::var("ONCODERMA_DEBUG").map_or(false, |v| v == "1") {
            logger.set_level(LogLevel::Debug, true);
        }
        if std::env::var("ONCODERMA_QUIET").map_or(false, |v| v == "1") {
            logger.set_level(LogLevel::Info, false);
            logger.set_level(LogLevel::Warning, false);
        }
        logger
    }

    pub fn set_level(&mut self, level: LogLevel, enabled: bool) {
        match level {
            LogLevel::Debug => self.show_debug = enabled,
            LogLevel::Info => self.show_info = enabled,
            LogLevel::Warning => self.show_warning = enabled,
            LogLevel::Error => self.show_error = enabled,
        }
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        match level {
            LogLevel::Debug => self.show_debug,
            LogLevel::Info => self.show_info,
            LogLevel::Warning => self.show_warning,
            LogLevel::Error => self.show_error,
        }
    }

    pub fn debug(&self, message: &str) {
        if self.show_debug {
            eprintln!("{}", format!("[DEBUG] {}", message).blue().bold());
        }
    }

    pub fn info(&self, message: &str) {
        if self.show_info {
            eprintln!("{}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if self.show_warning {
            eprintln!("{}", format!("[WARNING] {}", message).yellow().bold());
        }
    }

    pub fn error(&self, message: &str) {
        if self.show_error {
            eprintln!("{}", format!("[ERROR] {}", message).red().bold());
        }
    }

    pub fn fingerprint(&self, message: &str) {
        if self.show_debug {
            eprintln!("{}", format!("[FINGERPRINT] {}", message).cyan());
        }
    }

    pub fn cache(&self, message: &str) {
        if self.show_debug {
            eprintln!("{}", format!("[CACHE] {}", message).magenta());
        }
    }

    pub fn analysis(&self, message: &str) {
        if self.show_info {
            eprintln!("{}", format!("[ANALYSIS] {}", message).green());
        }
    }

    pub fn http(&self, message: &str) {
        if self.show_debug {
            eprintln!("{}", format!("[HTTP] {}", message).blue());
        }
    }

    pub fn auth(&self, message: &str) {
        if self.show_info {
            eprintln!("{}", format!("[AUTH] {}", message).yellow());
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    pub static ref LOGGER: Logger = Logger::from_env();
}
