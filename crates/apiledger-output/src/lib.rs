//! Output formatting utilities.
//!
//! Provides consistent JSON/text output across commands via the `OutputFormatter` trait.

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

/// Color output mode.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Auto-detect based on TTY (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Configuration for pretty output mode.
///
/// Example config.toml:
/// ```toml
/// [pretty]
/// enabled = true       # auto-enable when TTY (default: auto)
/// colors = "auto"      # "auto", "always", or "never"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(default)]
pub struct PrettyConfig {
    /// Enable pretty mode. None = auto (true when stdout is TTY)
    pub enabled: Option<bool>,
    /// Color mode: auto (default), always, or never
    pub colors: Option<ColorMode>,
}

impl PrettyConfig {
    /// Should pretty mode be enabled?
    /// Respects explicit setting, otherwise auto-detects TTY.
    pub fn enabled(&self) -> bool {
        self.enabled
            .unwrap_or_else(|| std::io::stdout().is_terminal())
    }

    /// Should colors be used?
    /// Respects colors setting and NO_COLOR env var.
    pub fn use_colors(&self) -> bool {
        if std::env::var("NO_COLOR").is_ok() {
            return false;
        }

        match self.colors.unwrap_or_default() {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }

    /// Layer `other` over `self`; set fields in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            enabled: other.enabled.or(self.enabled),
            colors: other.colors.or(self.colors),
        }
    }
}

/// Output format and display mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compact text output (one line per item, no colors).
    #[default]
    Compact,
    /// Pretty text output (human-friendly, with colors if available).
    Pretty { colors: bool },
    /// JSON output.
    Json,
    /// JSON Lines output (one JSON object per line, arrays emit each element).
    JsonLines,
}

impl OutputFormat {
    /// Create from CLI flags and config (fully resolved).
    pub fn from_cli(
        json: bool,
        jsonl: bool,
        pretty: bool,
        compact: bool,
        config: &PrettyConfig,
    ) -> Self {
        // JSON modes take precedence
        if jsonl {
            return OutputFormat::JsonLines;
        }
        if json {
            return OutputFormat::Json;
        }

        let is_pretty = if compact {
            false
        } else {
            pretty || config.enabled()
        };

        if is_pretty {
            // Respect "never", otherwise --pretty forces colors
            let use_colors = if std::env::var("NO_COLOR").is_ok() {
                false
            } else {
                match config.colors.unwrap_or_default() {
                    ColorMode::Never => false,
                    ColorMode::Always => true,
                    ColorMode::Auto => pretty || std::io::stdout().is_terminal(),
                }
            };
            OutputFormat::Pretty { colors: use_colors }
        } else {
            OutputFormat::Compact
        }
    }

    /// Is this a JSON-based format?
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonLines)
    }

    /// Are colors enabled?
    pub fn use_colors(&self) -> bool {
        matches!(self, OutputFormat::Pretty { colors: true })
    }
}

/// Trait for types that can format output in multiple formats.
///
/// JSON serialization uses serde, while text formatting is custom.
pub trait OutputFormatter: Serialize + schemars::JsonSchema {
    /// Format as minimal text (default).
    fn format_text(&self) -> String;

    /// Format as pretty text (human-friendly, colored when `colors` is set).
    /// Default implementation falls back to format_text().
    fn format_pretty(&self, colors: bool) -> String {
        let _ = colors;
        self.format_text()
    }

    /// Render in the specified format.
    fn render(&self, format: &OutputFormat) -> String {
        match format {
            OutputFormat::Compact => self.format_text(),
            OutputFormat::Pretty { colors } => self.format_pretty(*colors),
            OutputFormat::Json => serde_json::to_string(self).unwrap_or_default(),
            OutputFormat::JsonLines => {
                let json = serde_json::to_value(self).unwrap_or_default();
                jsonl_lines(&json).join("\n")
            }
        }
    }

    /// Print to stdout in the specified format.
    fn print(&self, format: &OutputFormat) {
        let rendered = self.render(format);
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
    }
}

/// Split a JSON value into JSON Lines.
///
/// Arrays emit each element as a separate line. Objects whose only array
/// field holds the items (e.g. `{"diagnostics": [...]}`) are exploded the
/// same way; anything else is a single line.
pub fn jsonl_lines(value: &serde_json::Value) -> Vec<String> {
    let items = match value {
        serde_json::Value::Array(arr) => Some(arr),
        serde_json::Value::Object(map) => {
            let mut arrays = map.values().filter_map(|v| v.as_array());
            match (arrays.next(), arrays.next()) {
                (Some(arr), None) => Some(arr),
                _ => None,
            }
        }
        _ => None,
    };
    match items {
        Some(arr) => arr
            .iter()
            .map(|item| serde_json::to_string(item).unwrap_or_default())
            .collect(),
        None => vec![serde_json::to_string(value).unwrap_or_default()],
    }
}

/// Print JSON schema for a type implementing OutputFormatter.
pub fn print_output_schema<T: OutputFormatter>() {
    let schema = schemars::schema_for!(T);
    println!(
        "{}",
        serde_json::to_string_pretty(&schema).unwrap_or_default()
    );
}

/// Paint `text` in `color` when `colors` is set.
pub fn paint(text: &str, color: nu_ansi_term::Color, colors: bool) -> String {
    if colors {
        color.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Paint `text` bold when `colors` is set.
pub fn bold(text: &str, colors: bool) -> String {
    if colors {
        nu_ansi_term::Style::new().bold().paint(text).to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, schemars::JsonSchema)]
    struct TestOutput {
        name: String,
        items: Vec<usize>,
    }

    impl OutputFormatter for TestOutput {
        fn format_text(&self) -> String {
            format!("{}: {}", self.name, self.items.len())
        }
    }

    #[test]
    fn test_output_format_from_cli() {
        let config = PrettyConfig::default();
        // compact=true overrides auto
        assert_eq!(
            OutputFormat::from_cli(false, false, false, true, &config),
            OutputFormat::Compact
        );
        assert_eq!(
            OutputFormat::from_cli(true, false, false, false, &config),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::from_cli(false, true, false, false, &config),
            OutputFormat::JsonLines
        );
        // jsonl takes precedence over json
        assert_eq!(
            OutputFormat::from_cli(true, true, false, false, &config),
            OutputFormat::JsonLines
        );
    }

    #[test]
    fn test_pretty_never_disables_colors() {
        let config = PrettyConfig {
            colors: Some(ColorMode::Never),
            ..Default::default()
        };
        assert_eq!(
            OutputFormat::from_cli(false, false, true, false, &config),
            OutputFormat::Pretty { colors: false }
        );
    }

    #[test]
    fn test_pretty_config_merge() {
        let global = PrettyConfig {
            enabled: Some(true),
            colors: Some(ColorMode::Always),
        };
        let project = PrettyConfig {
            enabled: None,
            colors: Some(ColorMode::Never),
        };
        let merged = global.merge(project);
        assert_eq!(merged.enabled, Some(true));
        assert_eq!(merged.colors, Some(ColorMode::Never));
    }

    #[test]
    fn test_render_formats() {
        let out = TestOutput {
            name: "x".to_string(),
            items: vec![1, 2],
        };
        assert_eq!(out.render(&OutputFormat::Compact), "x: 2");
        assert_eq!(
            out.render(&OutputFormat::Pretty { colors: false }),
            "x: 2"
        );
        assert_eq!(
            out.render(&OutputFormat::Json),
            r#"{"name":"x","items":[1,2]}"#
        );
        assert_eq!(out.render(&OutputFormat::JsonLines), "1\n2");
    }

    #[test]
    fn test_jsonl_lines_scalar_object() {
        let value = serde_json::json!({"a": 1, "b": "c"});
        assert_eq!(jsonl_lines(&value).len(), 1);
    }

    #[test]
    fn test_paint_without_colors() {
        assert_eq!(paint("error", nu_ansi_term::Color::Red, false), "error");
        assert_eq!(bold("x", false), "x");
    }
}
