//! Serializable description of a clidef command definition.
//!
//! Plain data with no dependency on `clidef` or its handlers. Used for:
//! - exporting a definition as JSON (documentation, tooling, snapshot tests)
//! - comparing two definitions without holding their handlers

use serde::{Deserialize, Serialize};

/// Current layout of [`DefinitionMeta`].
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct OptionMeta {
    pub letter: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusion_groups: Vec<String>,
    #[serde(default)]
    pub switch: bool,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ParameterMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SubcommandMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionMeta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterMeta>,
    #[serde(default)]
    pub asynchronous: bool,
}

/// JSON description of a whole definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DefinitionMeta {
    pub format_version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub differentiated_subcommands: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<SubcommandMeta>,
}

impl DefinitionMeta {
    pub fn new(name: impl Into<String>, differentiated_subcommands: bool) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            name: name.into(),
            version: None,
            differentiated_subcommands,
            subcommands: Vec::new(),
        }
    }

    pub fn subcommand(&self, name: &str) -> Option<&SubcommandMeta> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Encode as compact JSON bytes.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Encode as indented JSON text.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
