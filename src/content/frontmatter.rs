//! Front-matter parsing

use indexmap::IndexMap;
use serde_yaml::Value;

use super::error::{ContentError, Result};

/// Open key/value mapping declared by a file's front-matter block,
/// in declaration order
pub type Metadata = IndexMap<String, Value>;

const DELIMITER: &str = "---";

/// Front-matter data from a content file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub data: Metadata,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// The block must open on the very first line. A file without one
    /// yields empty metadata and is returned whole as the body.
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let (first_line, rest) = split_line(content);
        if first_line.trim_end() != DELIMITER {
            return Ok((FrontMatter::default(), content));
        }

        // The block closes at the next line starting with ---; without one
        // the remainder is all front-matter
        let mut offset = 0;
        let mut yaml_content = rest;
        let mut body = "";
        while offset < rest.len() {
            let (line, tail) = split_line(&rest[offset..]);
            if line.starts_with(DELIMITER) {
                yaml_content = &rest[..offset];
                body = tail;
                break;
            }
            offset = rest.len() - tail.len();
        }

        let data = Self::parse_yaml(yaml_content)?;
        Ok((FrontMatter { data }, body))
    }

    fn parse_yaml(yaml_content: &str) -> Result<Metadata> {
        let is_blank = yaml_content.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if is_blank {
            return Ok(Metadata::new());
        }

        let value: Value = serde_yaml::from_str(yaml_content)
            .map_err(|e| ContentError::FrontMatter(e.to_string()))?;

        match value {
            Value::Null => Ok(Metadata::new()),
            Value::Mapping(mapping) => mapping
                .into_iter()
                .map(|(key, value)| Ok((key_to_string(key)?, value)))
                .collect(),
            other => Err(ContentError::FrontMatter(format!(
                "expected a mapping, found {}",
                describe(&other)
            ))),
        }
    }

    pub fn into_metadata(self) -> Metadata {
        self.data
    }
}

/// Split off the first line, consuming its line terminator
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(pos) => (s[..pos].trim_end_matches('\r'), &s[pos + 1..]),
        None => (s.trim_end_matches('\r'), ""),
    }
}

fn key_to_string(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ContentError::FrontMatter(format!(
            "unsupported key type: {}",
            describe(&other)
        ))),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
