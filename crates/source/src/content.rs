//! The content model the document source renders from.
//!
//! Content arrives as JSON. Prose fields hold inline markup, interpreted by the
//! [`InlineRenderer`](crate::InlineRenderer) handed to the document source.

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_toc_title() -> String {
    "Contents".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default = "default_toc_title")]
    pub toc_title: String,
    #[serde(default)]
    pub lang: Option<String>,
    pub sections: Vec<SectionContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionContent {
    /// Anchor id of the section. Derived from the title when absent.
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        text: String,
        #[serde(default)]
        id: Option<String>,
        /// Whether the heading is listed in the table of contents.
        #[serde(default = "default_true")]
        toc: bool,
    },
    Paragraph {
        text: String,
    },
    Quote {
        text: String,
        #[serde(default)]
        attribution: Option<String>,
    },
    List {
        #[serde(default)]
        ordered: bool,
        items: Vec<String>,
    },
    Math {
        tex: String,
        #[serde(default = "default_true")]
        display: bool,
    },
    Footnotes {
        items: Vec<String>,
    },
}

impl DocumentContent {
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}
