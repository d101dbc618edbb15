use serde::{Deserialize, Serialize};

/// Options applied when a record is encoded to its wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    pub pretty: bool,
    pub indent: usize,
    /// Drop fields the service owns so a fetched record can be resent as a request body.
    pub strip_output_only: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
            strip_output_only: false,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for building a request body from a record.
    pub fn request() -> Self {
        Self::default().with_strip_output_only(true)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_strip_output_only(mut self, strip: bool) -> Self {
        self.strip_output_only = strip;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.pretty && !(1..=8).contains(&self.indent) {
            return Err("Indent must be between 1 and 8 spaces".to_string());
        }

        Ok(())
    }
}
