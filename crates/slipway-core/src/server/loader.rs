//! Config file discovery and parsing.
//!
//! Loads `slipway.config.ts`, `slipway.config.js`, `vite.config.ts`, or
//! `vite.config.js` and extracts the static `server` section (port, strict
//! port, host, open, watch exclusions).
//!
//! ## Supported config shape
//!
//! ```js
//! import { defineConfig } from 'vite'
//!
//! export default defineConfig({
//!   server: {
//!     port: 1420,
//!     strictPort: true,
//!     watch: {
//!       ignored: ['**/src-tauri/**']
//!     }
//!   }
//! })
//! ```
//!
//! The `defineConfig(...)` wrapper is optional; a bare object literal works
//! too. Only static literals are read — computed values and spreads are not
//! evaluated. TypeScript configs are read by the same extractor, which is
//! enough as long as the default export is a plain literal.

use crate::error::Error;
use crate::server::config::FileServerConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Config file names in priority order.
const CONFIG_FILES: &[&str] = &[
    "slipway.config.ts",
    "slipway.config.js",
    "vite.config.ts",
    "vite.config.js",
];

/// Find a config file in the given root directory.
#[must_use]
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.exists())
}

/// Load the server configuration from a config file in the given root.
///
/// If `config_path` is `Some`, use that specific file (error if missing).
/// Otherwise auto-discover; `Ok(None)` means no config file exists.
pub fn load_config(
    root: &Path,
    config_path: Option<&Path>,
) -> Result<Option<(PathBuf, FileServerConfig)>, Error> {
    let path = match config_path {
        Some(p) => {
            let abs = if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            };
            if !abs.exists() {
                return Err(Error::ConfigNotFound { path: abs });
            }
            abs
        }
        None => match find_config_file(root) {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    let source = std::fs::read_to_string(&path).map_err(|e| Error::ConfigRead {
        path: path.clone(),
        source: e,
    })?;

    let config = parse_server_section(&source).map_err(|message| Error::ConfigParse {
        path: path.clone(),
        message,
    })?;

    Ok(Some((path, config)))
}

/// Parse the `server` section out of a config file source.
fn parse_server_section(source: &str) -> Result<FileServerConfig, String> {
    let literal = extract_config_literal(source)
        .ok_or_else(|| "no `export default { ... }` found in config file".to_string())?;

    let value = Reader::new(&literal).read_document()?;
    Ok(server_config_from_value(&value))
}

/// Extract the configuration object literal following `export default`,
/// unwrapping an optional `defineConfig(...)`-style call.
fn extract_config_literal(source: &str) -> Option<String> {
    let stripped = strip_comments(source);

    let marker = "export default";
    let mut rest = stripped[stripped.find(marker)? + marker.len()..].trim_start();

    // Optional wrapper call: `defineConfig({ ... })` or any `ident({ ... })`.
    if !rest.starts_with('{') {
        let ident_len = rest
            .char_indices()
            .find(|&(_, c)| !(c.is_alphanumeric() || c == '_' || c == '$'))
            .map_or(rest.len(), |(i, _)| i);
        if ident_len == 0 {
            return None;
        }
        rest = rest[ident_len..].trim_start().strip_prefix('(')?.trim_start();
    }

    if !rest.starts_with('{') {
        return None;
    }

    balanced_braces(rest)
}

/// Take the leading `{ ... }` from `input`, respecting nested braces and
/// string literals.
fn balanced_braces(input: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in input.char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => in_string = Some(ch),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(input[..=i].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Strip `//` line comments and `/* */` block comments, leaving string
/// literals intact.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if let Some(quote) = in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' | '`' => {
                in_string = Some(ch);
                out.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Map a parsed config object onto the fields the server cares about.
/// Unknown keys are ignored.
fn server_config_from_value(value: &Value) -> FileServerConfig {
    let mut config = FileServerConfig::default();

    let Some(server) = value.get("server").and_then(Value::as_object) else {
        return config;
    };

    // Out-of-range ports don't fit u16 and fall through to defaults.
    config.port = server
        .get("port")
        .and_then(Value::as_u64)
        .and_then(|p| u16::try_from(p).ok());
    config.strict_port = server.get("strictPort").and_then(Value::as_bool);
    config.host = server
        .get("host")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    config.open = server.get("open").and_then(Value::as_bool);

    if let Some(watch) = server.get("watch").and_then(Value::as_object) {
        config.watch_ignored = match watch.get("ignored") {
            // Vite accepts both a single pattern and an array.
            Some(Value::String(s)) => Some(vec![s.clone()]),
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ToString::to_string)
                    .collect(),
            ),
            _ => None,
        };
    }

    config
}

/// Lenient object-literal reader: unquoted keys, single-quoted and backtick
/// strings, trailing commas, nested objects and arrays.
struct Reader<'a> {
    rest: &'a str,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn read_document(mut self) -> Result<Value, String> {
        let value = self.read_value()?;
        if !self.rest.trim().is_empty() {
            return Err(format!(
                "trailing content after config object: {}",
                snippet(self.rest)
            ));
        }
        Ok(value)
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let mut chars = self.rest.chars();
        let ch = chars.next();
        self.rest = chars.as_str();
        ch
    }

    fn eat(&mut self, expected: char) -> Result<(), String> {
        self.skip_ws();
        match self.bump() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(format!("expected `{expected}`, found `{ch}`")),
            None => Err(format!("expected `{expected}`, found end of input")),
        }
    }

    fn read_value(&mut self) -> Result<Value, String> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.read_object(),
            Some('[') => self.read_array(),
            Some('"' | '\'' | '`') => self.read_string().map(Value::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.read_number(),
            Some(_) => self.read_keyword(),
            None => Err("unexpected end of input".to_string()),
        }
    }

    fn read_object(&mut self) -> Result<Value, String> {
        self.eat('{')?;
        let mut map = serde_json::Map::new();

        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }
            if self.rest.is_empty() {
                return Err("unterminated object".to_string());
            }

            let key = self.read_key()?;
            self.eat(':')?;
            let value = self.read_value()?;
            map.insert(key, value);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                Some(ch) => return Err(format!("expected `,` or `}}` in object, found `{ch}`")),
                None => return Err("unterminated object".to_string()),
            }
        }
    }

    fn read_array(&mut self) -> Result<Value, String> {
        self.eat('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }
            if self.rest.is_empty() {
                return Err("unterminated array".to_string());
            }

            items.push(self.read_value()?);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(ch) => return Err(format!("expected `,` or `]` in array, found `{ch}`")),
                None => return Err("unterminated array".to_string()),
            }
        }
    }

    /// Object keys: quoted strings or bare identifiers. Dots are allowed in
    /// bare keys (`process.env.NODE_ENV` style).
    fn read_key(&mut self) -> Result<String, String> {
        self.skip_ws();
        match self.peek() {
            Some('"' | '\'' | '`') => self.read_string(),
            Some(c) if c.is_alphanumeric() || c == '_' || c == '$' => {
                let end = self
                    .rest
                    .char_indices()
                    .find(|&(_, c)| !(c.is_alphanumeric() || c == '_' || c == '$' || c == '.'))
                    .map_or(self.rest.len(), |(i, _)| i);
                let key = self.rest[..end].to_string();
                self.rest = &self.rest[end..];
                Ok(key)
            }
            Some(ch) => Err(format!("expected object key, found `{ch}`")),
            None => Err("expected object key, found end of input".to_string()),
        }
    }

    fn read_string(&mut self) -> Result<String, String> {
        let quote = self.bump().ok_or("expected string")?;
        let mut out = String::new();

        loop {
            match self.bump() {
                Some(ch) if ch == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('\\') => out.push('\\'),
                    Some(ch) if ch == quote => out.push(ch),
                    Some(ch) => {
                        out.push('\\');
                        out.push(ch);
                    }
                    None => return Err("unterminated string escape".to_string()),
                },
                Some(ch) => out.push(ch),
                None => return Err("unterminated string".to_string()),
            }
        }
    }

    fn read_number(&mut self) -> Result<Value, String> {
        let end = self
            .rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| !(c.is_ascii_digit() || c == '.'))
            .map_or(self.rest.len(), |(i, _)| i);
        let text = &self.rest[..end];
        self.rest = &self.rest[end..];

        if text.contains('.') {
            let n: f64 = text
                .parse()
                .map_err(|e| format!("invalid number `{text}`: {e}"))?;
            serde_json::Number::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| format!("invalid number `{text}`"))
        } else {
            let n: i64 = text
                .parse()
                .map_err(|e| format!("invalid number `{text}`: {e}"))?;
            Ok(Value::Number(n.into()))
        }
    }

    fn read_keyword(&mut self) -> Result<Value, String> {
        for (word, value) in [
            ("true", Value::Bool(true)),
            ("false", Value::Bool(false)),
            ("null", Value::Null),
        ] {
            if let Some(rest) = self.rest.strip_prefix(word) {
                self.rest = rest;
                return Ok(value);
            }
        }
        Err(format!("unexpected token: {}", snippet(self.rest)))
    }
}

/// First few characters of `input`, for error messages.
fn snippet(input: &str) -> String {
    let trimmed = input.trim_start();
    let end = trimmed
        .char_indices()
        .nth(16)
        .map_or(trimmed.len(), |(i, _)| i);
    format!("`{}`", &trimmed[..end])
}
