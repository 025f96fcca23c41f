//! Loader for key-file style configuration (`[group]` headers with
//! `key=value` entries), the format used by the switch controller configs.

pub mod path;

use std::{fs, io, path::Path};

use thiserror::Error;

/// Represents all possible errors loading a [KeyFile]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid syntax on line {line}: {reason}")]
    SyntaxError { line: usize, reason: String },
}

/// A single `[group]` section and its entries in file order
#[derive(Debug, Clone)]
struct Group {
    name: String,
    entries: Vec<(String, String)>,
}

impl Group {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parsed key file. Values are kept as raw text and decoded on access, so a
/// value can be read as a string, an integer, or a list.
#[derive(Debug, Clone, Default)]
pub struct KeyFile {
    groups: Vec<Group>,
}

impl KeyFile {
    /// Load a [KeyFile] from the given path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<KeyFile, LoadError> {
        let content = fs::read_to_string(path)?;
        KeyFile::parse(content.as_str())
    }

    /// Parse a [KeyFile] from the given text
    pub fn parse(content: &str) -> Result<KeyFile, LoadError> {
        let mut groups: Vec<Group> = Vec::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim_start();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Group header
            if let Some(header) = line.strip_prefix('[') {
                let Some(name) = header.trim_end().strip_suffix(']') else {
                    return Err(LoadError::SyntaxError {
                        line: line_no,
                        reason: "unterminated group header".to_string(),
                    });
                };
                let name = name.to_string();
                if !groups.iter().any(|g| g.name == name) {
                    groups.push(Group {
                        name,
                        entries: Vec::new(),
                    });
                } else {
                    // Re-opened groups are merged into the original
                    let pos = groups.iter().position(|g| g.name == name);
                    if let Some(pos) = pos {
                        let group = groups.remove(pos);
                        groups.push(group);
                    }
                }
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(LoadError::SyntaxError {
                    line: line_no,
                    reason: format!("expected 'key=value', got '{line}'"),
                });
            };
            let key = key.trim_end();
            if key.is_empty() {
                return Err(LoadError::SyntaxError {
                    line: line_no,
                    reason: "empty key".to_string(),
                });
            }
            let value = value.trim_start();

            let Some(group) = groups.last_mut() else {
                return Err(LoadError::SyntaxError {
                    line: line_no,
                    reason: format!("key '{key}' is not inside a group"),
                });
            };

            // Later definitions replace earlier ones
            if let Some(entry) = group.entries.iter_mut().find(|(k, _)| k == key) {
                entry.1 = value.to_string();
            } else {
                group.entries.push((key.to_string(), value.to_string()));
            }
        }

        Ok(KeyFile { groups })
    }

    fn group(&self, group: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == group)
    }

    fn raw(&self, group: &str, key: &str) -> Option<&str> {
        self.group(group)?.get(key)
    }

    /// Returns all keys of the given group in the order they appear in the file
    pub fn keys(&self, group: &str) -> Vec<&str> {
        let Some(group) = self.group(group) else {
            return vec![];
        };
        group.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Returns the unescaped string value of the given key
    pub fn get_string(&self, group: &str, key: &str) -> Option<String> {
        self.raw(group, key).map(unescape)
    }

    /// Returns the decimal integer value of the given key. Returns `None` if the
    /// key does not exist or is not a valid integer.
    pub fn get_integer(&self, group: &str, key: &str) -> Option<i32> {
        self.raw(group, key)?.trim().parse().ok()
    }

    /// Returns the list value of the given key. List elements are separated
    /// by ';' or ','. A trailing separator does not produce an empty element.
    pub fn get_string_list(&self, group: &str, key: &str) -> Option<Vec<String>> {
        let raw = self.raw(group, key)?;
        Some(split_list(raw))
    }

    /// Returns the integer list value of the given key. Returns `None` if any
    /// element is not a valid integer.
    pub fn get_integer_list(&self, group: &str, key: &str) -> Option<Vec<i32>> {
        let values = self.get_string_list(group, key)?;
        values.iter().map(|v| v.trim().parse().ok()).collect()
    }
}

/// Split a raw list value on unescaped separators, unescaping each element.
fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(';') => current.push(';'),
                Some(',') => current.push(','),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            ';' | ',' => {
                items.push(unescape(current.trim()));
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        items.push(unescape(current.trim()));
    }

    items
}

/// Decode the escape sequences allowed in key file values
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Parse an integer using C `strtol` base detection: a `0x` prefix selects
/// hexadecimal, a leading `0` selects octal, otherwise decimal. The whole
/// string must be consumed.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() {
        return None;
    }

    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // from_str_radix would otherwise accept a second sign
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let value = i64::from_str_radix(body, radix).ok()?;

    Some(if negative { -value } else { value })
}
