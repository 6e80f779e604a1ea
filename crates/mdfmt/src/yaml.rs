//! YAML formatting.
//!
//! Documents are normalized by a round trip through [`serde_yaml::Value`]:
//! quoting is reduced to what the value needs and indentation is made
//! uniform. Comments do not survive the round trip.

use mdfmt_core::{CodeFormatError, CodeFormatter};

/// Error type for YAML formatting
#[derive(Debug, thiserror::Error)]
pub enum YamlError {
    #[error("unmarshalling: {0}")]
    Unmarshal(#[source] serde_yaml::Error),

    #[error("marshalling: {0}")]
    Marshal(#[source] serde_yaml::Error),
}

/// Format a YAML document
pub fn format_yaml(src: &[u8]) -> Result<Vec<u8>, YamlError> {
    if src.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let value: serde_yaml::Value = serde_yaml::from_slice(src).map_err(YamlError::Unmarshal)?;
    if value.is_null() {
        // nothing but comments or an explicit null; keep it as written
        return Ok(src.to_vec());
    }

    let formatted = serde_yaml::to_string(&value).map_err(YamlError::Marshal)?;
    Ok(formatted.into_bytes())
}

/// [`CodeFormatter`] for `yaml` and `yml` code blocks and front matter
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormatter;

impl CodeFormatter for YamlFormatter {
    fn format(&self, code: &[u8]) -> Result<Vec<u8>, CodeFormatError> {
        Ok(format_yaml(code)?)
    }
}
