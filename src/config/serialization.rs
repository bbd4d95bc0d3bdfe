//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render this config as a commented TOML template
    pub fn to_toml(&self) -> String {
        format!(
            r#"# roster configuration

# URL returning a JSON array of users (id, name, email, phone)
# Env override: ROSTER_ENDPOINT
endpoint = "{endpoint}"

# Theme: dark, light
# Env override: ROSTER_THEME
theme = "{theme}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            endpoint = escape(&self.endpoint),
            theme = escape(&self.theme),
            log_level = escape(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = escape(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = escape(&self.logging.file_prefix),
        )
    }
}

/// Escape a value for a TOML basic string
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
