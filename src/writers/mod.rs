pub mod json_writer;
pub mod text_writer;

pub use json_writer::JsonWriter;
pub use text_writer::TextWriter;

use crate::error::AnalyticsError;
use crate::utils::constants::{FORMAT_JSON, FORMAT_TEXT};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            FORMAT_TEXT => Ok(OutputFormat::Text),
            FORMAT_JSON => Ok(OutputFormat::Json),
            _ => Err(AnalyticsError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!(" JSON ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "parquet".parse::<OutputFormat>(),
            Err(AnalyticsError::UnknownFormat(_))
        ));
    }
}
