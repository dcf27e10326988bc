use std::collections::HashMap;
use std::env;
use std::fs;

pub const DEFAULT_TIMEZONE: &str = "Europe/London";
pub const DEFAULT_CONTACTS_FILE: &str = "./personal_contacts.csv";
pub const DEFAULT_BIND_PORT: u16 = 3001;

/// Flat key=value config file ("export KEY=value" lines work too), with the
/// process environment as fallback for every key.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    /// Load from the file named by CONFIG_FILE, or fall back to env-only.
    pub fn load() -> Self {
        match env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(&path).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            values.insert(key.trim().to_string(), strip_quotes(value.trim()));
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn timezone(&self) -> String {
        self.get_or("DEFAULT_TIMEZONE", DEFAULT_TIMEZONE)
    }

    pub fn contacts_file(&self) -> String {
        self.get_or("CONTACTS_FILE", DEFAULT_CONTACTS_FILE)
    }

    pub fn bind_port(&self) -> u16 {
        self.get("BIND_PORT")
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_BIND_PORT)
    }
}

fn strip_quotes(value: &str) -> String {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}
