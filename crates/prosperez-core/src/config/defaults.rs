//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Prosperez".to_string()
}

pub fn default_owner() -> String {
    "Not Set!".to_string()
}

pub fn default_prefix() -> String {
    ".".to_string()
}

pub fn default_mode() -> String {
    "Public".to_string()
}

pub fn default_version() -> String {
    "1.8.8".to_string()
}

pub fn default_plugins() -> u32 {
    331
}

pub fn default_host() -> String {
    "Render".to_string()
}

pub fn default_data_dir() -> String {
    "~/.prosperez".to_string()
}

pub fn default_device_name() -> String {
    "Prosperez".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
