//! Page content files.
//!
//! Each page directory holds at most one content file carrying the page's
//! fields. Two formats are understood:
//!
//! - Markdown with YAML frontmatter (`*.md`): the fields are the frontmatter
//!   keys.
//!
//!   ```markdown
//!   ---
//!   title: Members only
//!   access:
//!     type: roles
//!     roles: [member]
//!   ---
//!
//!   Body text.
//!   ```
//!
//! - Field text (`*.txt`): `Key: value` blocks separated by `----` lines.
//!
//!   ```text
//!   Title: Members only
//!
//!   ----
//!
//!   Access:
//!
//!   type: roles
//!   roles:
//!     - member
//!   ```
//!
//! Field names are lowercased. Every value is kept as text: frontmatter
//! values that are not strings are written back out as YAML, so a rule
//! stored as a nested mapping reaches the rule decoder the same way as one
//! stored as a string.

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::Value;

/// Content fields of one page, keyed by lowercase name.
pub type Fields = BTreeMap<String, String>;

/// Supported content file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// Markdown with YAML frontmatter.
    Markdown,
    /// `Key: value` blocks separated by `----`.
    FieldText,
}

impl ContentFormat {
    /// Format implied by a file extension, if it is a content file.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "md" => Some(ContentFormat::Markdown),
            "txt" => Some(ContentFormat::FieldText),
            _ => None,
        }
    }
}

/// Parse a content file in the given format.
pub fn parse_fields(format: ContentFormat, content: &str) -> Fields {
    match format {
        ContentFormat::Markdown => parse_frontmatter_fields(content),
        ContentFormat::FieldText => parse_field_text(content),
    }
}

/// Split YAML frontmatter off markdown content.
///
/// Returns the YAML text and the body, or `None` when the content has no
/// complete `---` delimited block.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    if !content.starts_with("---") {
        return None;
    }

    // Skip the rest of the opening delimiter line
    let after_open = &content[3 + content[3..].find('\n')? + 1..];

    let (yaml, rest) = if let Some(rest) = after_open.strip_prefix("---") {
        ("", rest)
    } else if let Some(close) = after_open.find("\n---") {
        (&after_open[..close], &after_open[close + 4..])
    } else {
        log::warn!("Frontmatter opening delimiter found but no closing delimiter");
        return None;
    };

    let body = rest.strip_prefix('\n').unwrap_or(rest);
    Some((yaml, body))
}

fn parse_frontmatter_fields(content: &str) -> Fields {
    let Some((yaml, _body)) = split_frontmatter(content) else {
        return Fields::new();
    };

    let value = match serde_yaml::from_str::<Value>(yaml) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed to parse frontmatter YAML: {e}");
            return Fields::new();
        }
    };

    let Value::Mapping(map) = value else {
        return Fields::new();
    };

    let mut fields = Fields::new();
    for (key, value) in map {
        let Some(key) = key.as_str() else {
            continue;
        };
        let text = match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => match serde_yaml::to_string(&other) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Skipping frontmatter field '{key}': {e}");
                    continue;
                }
            },
        };
        fields.insert(key.to_lowercase(), text);
    }
    fields
}

fn parse_field_text(content: &str) -> Fields {
    let mut fields = Fields::new();
    let mut block = Vec::new();

    for line in content.lines() {
        if is_separator(line) {
            insert_block(&mut fields, &block);
            block.clear();
        } else {
            block.push(line);
        }
    }
    insert_block(&mut fields, &block);
    fields
}

fn is_separator(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 4 && line.chars().all(|c| c == '-')
}

fn insert_block(fields: &mut Fields, lines: &[&str]) {
    let text = lines.join("\n");
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let Some((key, value)) = text.split_once(':') else {
        log::debug!("Ignoring content block without a field name");
        return;
    };
    let key = key.trim();
    if key.is_empty() || key.contains('\n') {
        return;
    }
    fields.insert(key.to_lowercase(), value.trim().to_string());
}

// ============================================================================
// Tests
// ============================================================================
