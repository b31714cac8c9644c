//! Dependency extraction from script source text.
//!
//! Two module conventions are understood:
//!
//! - **AMD**: a dependency array passed to `require` or `define`:
//!   `require(["app/main", "dojo/dom"], function (main, dom) { ... })`,
//!   `define("app/id", ["dojo/_base/lang"], factory)`,
//!   `require({ async: true }, ["app/main"])`
//! - **Legacy**: one `dojo.require("dijit.form.Button")` statement per module
//!
//! Extraction is textual. It never fails: scripts that are malformed or do
//! not use modules at all simply yield no identifiers. Comments are blanked
//! before matching so commented-out requires are not reported.

use regex::Regex;
use std::sync::OnceLock;

use super::ModuleFormat;

/// Identifiers AMD loaders inject rather than load.
const AMD_PSEUDO_DEPENDENCIES: &[&str] = &["require", "exports", "module"];

static AMD_CALL: OnceLock<Regex> = OnceLock::new();
static STRING_LITERAL: OnceLock<Regex> = OnceLock::new();
static LEGACY_REQUIRE: OnceLock<Regex> = OnceLock::new();

fn amd_call() -> &'static Regex {
    AMD_CALL.get_or_init(|| {
        Regex::new(
            r#"\b(?:require|define)\s*\(\s*(?:(?:"[^"]*"|'[^']*')\s*,\s*)?(?:\{[^{}]*\}\s*,\s*)?\[([^\]]*)\]"#,
        )
        .expect("AMD call pattern is valid")
    })
}

fn string_literal() -> &'static Regex {
    STRING_LITERAL
        .get_or_init(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("string literal pattern is valid"))
}

fn legacy_require() -> &'static Regex {
    LEGACY_REQUIRE.get_or_init(|| {
        Regex::new(
            r#"\bdojo\s*(?:\.\s*require|\[\s*["']require["']\s*\])\s*\(\s*["']([^"']+)["']"#,
        )
        .expect("legacy require pattern is valid")
    })
}

/// Parser variant for one module format.
///
/// The variant is a pure function of the page's [`ModuleFormat`]; see
/// [`ScriptParser::for_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptParser {
    /// Dependency arrays of `require`/`define` calls.
    Amd,
    /// `dojo.require("x.y")` statements.
    NonAmd,
}

impl ScriptParser {
    /// Select the parser for a module format.
    #[must_use]
    pub const fn for_format(format: ModuleFormat) -> Self {
        match format {
            ModuleFormat::Amd => Self::Amd,
            ModuleFormat::NonAmd => Self::NonAmd,
        }
    }

    /// Extract raw dependency identifiers in source order.
    ///
    /// Duplicates are kept; the registry collapses them.
    #[must_use]
    pub fn dependencies(self, source: &str) -> Vec<String> {
        let source = blank_comments(source);
        match self {
            Self::Amd => amd_dependencies(&source),
            Self::NonAmd => legacy_dependencies(&source),
        }
    }
}

fn amd_dependencies(source: &str) -> Vec<String> {
    let mut dependencies = Vec::new();

    for call in amd_call().captures_iter(source) {
        let Some(array) = call.get(1) else {
            continue;
        };
        for literal in string_literal().captures_iter(array.as_str()) {
            let Some(id) = literal.get(1).or_else(|| literal.get(2)) else {
                continue;
            };
            let id = id.as_str().trim();
            if id.is_empty() || AMD_PSEUDO_DEPENDENCIES.contains(&id) {
                continue;
            }
            dependencies.push(id.to_string());
        }
    }

    dependencies
}

fn legacy_dependencies(source: &str) -> Vec<String> {
    legacy_require()
        .captures_iter(source)
        .filter_map(|cap| cap.get(1))
        .map(|id| id.as_str().trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

/// Replace `//` and `/* */` comments with whitespace.
///
/// String literals (single, double and template quoted) are copied verbatim,
/// so a URL such as `"http://host/x.js"` survives. Newlines inside block
/// comments are kept to preserve line structure.
fn blank_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str(char),
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            State::Code => match ch {
                '"' | '\'' | '`' => {
                    state = State::Str(ch);
                    out.push(ch);
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                    out.push_str("  ");
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                    out.push_str("  ");
                }
                _ => out.push(ch),
            },
            State::Str(quote) => {
                out.push(ch);
                if ch == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if ch == quote || (ch == '\n' && quote != '`') {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if ch == '\n' {
                    state = State::Code;
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                    out.push_str("  ");
                } else if ch == '\n' {
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
        }
    }

    out
}
