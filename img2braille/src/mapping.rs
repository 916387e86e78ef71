use std::{collections::HashMap, fs, path::Path};

use crate::{dots::DotKey, error::Error};

/// Read-only lookup table from canonical dot keys to output glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    glyphs: HashMap<String, String>,
}

impl Mapping {
    /// Standard Unicode Braille patterns, `BLANK` included.
    pub fn standard() -> Self {
        DotKey::all()
            .map(|key| (key.to_string(), key.braille().to_string()))
            .collect::<HashMap<_, _>>()
            .into()
    }

    /// Parses a JSON object of `"1358": "⢕"` style entries.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Self::parse(json, "<inline>")
    }

    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path).map_err(|e| Error::MappingLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&json, &path.display().to_string())
    }

    fn parse(json: &str, origin: &str) -> Result<Self, Error> {
        serde_json::from_str::<HashMap<String, String>>(json)
            .map(Into::into)
            .map_err(|e| Error::MappingLoad {
                path: origin.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn glyph(&self, key: DotKey) -> Result<&str, Error> {
        let key = key.to_string();
        self.glyphs
            .get(&key)
            .map(String::as_str)
            .ok_or(Error::UnknownPattern(key))
    }

    /// Canonical keys this mapping cannot encode.
    pub fn missing_keys(&self) -> Vec<String> {
        DotKey::all()
            .map(|key| key.to_string())
            .filter(|key| !self.glyphs.contains_key(key))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_keys().is_empty()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl Default for Mapping {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<HashMap<String, String>> for Mapping {
    fn from(glyphs: HashMap<String, String>) -> Self {
        Self { glyphs }
    }
}
