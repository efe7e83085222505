use std::{collections::HashMap, fs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    Sync,
    Async,
}

impl ServiceMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SYNC" => Some(ServiceMode::Sync),
            "ASYNC" => Some(ServiceMode::Async),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceMode::Sync => "SYNC",
            ServiceMode::Async => "ASYNC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub mode: ServiceMode,
    pub payment_delay_ms: u64,
    pub queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            mode: ServiceMode::Sync,
            payment_delay_ms: 3000,
            queue_capacity: 64,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("checkout.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind_addr") {
                settings.server_bind = v.clone();
            }
            if let Some(v) = file_cfg.get("mode").and_then(|v| ServiceMode::parse(v)) {
                settings.mode = v;
            }
            if let Some(v) = file_cfg.get("payment_delay_ms").and_then(|v| v.parse().ok()) {
                settings.payment_delay_ms = v;
            }
            if let Some(v) = file_cfg.get("queue_capacity").and_then(|v| v.parse().ok()) {
                settings.queue_capacity = v;
            }
        }
    }

    if let Ok(v) = std::env::var("CHECKOUT_BIND") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("MODE") {
        if let Some(mode) = ServiceMode::parse(&v) {
            settings.mode = mode;
        }
    }
    if let Ok(v) = std::env::var("CHECKOUT_MODE") {
        if let Some(mode) = ServiceMode::parse(&v) {
            settings.mode = mode;
        }
    }

    if let Ok(v) = std::env::var("PAYMENT_DELAY_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.payment_delay_ms = parsed;
        }
    }

    if let Ok(v) = std::env::var("QUEUE_CAPACITY") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.queue_capacity = parsed;
        }
    }

    settings
}
