//! Rendering of command results.

use std::fmt::Display;

use clap::ValueEnum;
use serde::Serialize;

use crate::Result;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Render `value` in the requested format.
pub fn render<T>(format: OutputFormat, value: &T) -> Result<String>
where
    T: Display + Serialize,
{
    match format {
        OutputFormat::Table => Ok(value.to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// Write a rendered result to stdout.
pub fn emit<T>(format: OutputFormat, value: &T) -> Result<()>
where
    T: Display + Serialize,
{
    println!("{}", render(format, value)?);
    Ok(())
}

/// `Some(x)` as fixed decimals, `None` as `n/a`.
pub(crate) fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Serialize)]
    struct Point {
        x: f64,
    }

    impl fmt::Display for Point {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "x = {}", self.x)
        }
    }

    #[test]
    fn test_render_formats() {
        let p = Point { x: 1.5 };
        assert_eq!(render(OutputFormat::Table, &p).unwrap(), "x = 1.5");

        let json: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &p).unwrap()).unwrap();
        assert_eq!(json["x"], 1.5);
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(1.23456), 2), "1.23");
        assert_eq!(fmt_opt(None, 2), "n/a");
    }
}
