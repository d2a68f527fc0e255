//! Visual theme and styling.

use console::Style;

/// Brick's visual theme.
#[derive(Debug, Clone)]
pub struct BrickTheme {
    /// Success messages (green).
    pub success: Style,
    /// Warnings (yellow).
    pub warning: Style,
    /// Errors (red bold).
    pub error: Style,
    /// Informational accents (cyan).
    pub info: Style,
    /// Secondary text.
    pub dim: Style,
    /// Bold emphasis.
    pub highlight: Style,
    /// Headers (cyan bold).
    pub header: Style,
    /// Labels in key-value displays.
    pub key: Style,
}

impl Default for BrickTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl BrickTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            key: Style::new().bold(),
        }
    }

    /// Theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            key: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{} {}", self.header.apply_to("▦"), self.highlight.apply_to(title))
    }

    /// `key: value` line with the key styled.
    pub fn format_field(&self, key: &str, value: &str) -> String {
        format!("{} {}", self.key.apply_to(format!("{}:", key)), value)
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
