use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::error::ConfigError;

/// Longest inclusive range a single `start-end` token may expand to.
pub const MAX_RANGE_LEN: u64 = 10_000;

/// Raw configuration: every key maps to its expanded, ordered value list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    values: BTreeMap<String, Vec<String>>,
}

impl ParameterMap {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    fn insert(&mut self, key: String, values: Vec<String>) {
        self.values.insert(key, values);
    }
}

pub struct ConfigParser {
    range: Regex,
}

impl ConfigParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            range: Regex::new(r"^([0-9]+)-([0-9]+)$")
                .context("failed to compile range token regex")?,
        })
    }

    pub fn parse_file(&self, path: &Path) -> Result<ParameterMap, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&raw)
    }

    pub fn parse_str(&self, raw: &str) -> Result<ParameterMap, ConfigError> {
        let mut params = ParameterMap::default();

        for (index, line) in raw.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, raw_value) =
                line.split_once('=').ok_or_else(|| ConfigError::MalformedLine {
                    line_no,
                    line: line.to_string(),
                })?;

            let mut values = Vec::new();
            for token in raw_value.split(',') {
                self.expand_token(token.trim(), line_no, &mut values)?;
            }

            // Repeated keys: last one wins.
            params.insert(key.trim().to_string(), values);
        }

        Ok(params)
    }

    /// Pushes `token` onto `out`, expanding `start-end` into the inclusive sequence.
    pub fn expand_token(
        &self,
        token: &str,
        line_no: usize,
        out: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        let Some(captures) = self.range.captures(token) else {
            out.push(token.to_string());
            return Ok(());
        };

        let bound = |index: usize| {
            captures[index]
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidRangeBound {
                    line_no,
                    token: token.to_string(),
                })
        };
        let start = bound(1)?;
        let end = bound(2)?;

        if start > end {
            return Err(ConfigError::ReversedRange {
                line_no,
                token: token.to_string(),
            });
        }
        if end - start >= MAX_RANGE_LEN {
            return Err(ConfigError::RangeTooLarge {
                line_no,
                token: token.to_string(),
                limit: MAX_RANGE_LEN,
            });
        }

        out.extend((start..=end).map(|value| value.to_string()));
        Ok(())
    }
}
