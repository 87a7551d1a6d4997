//! Comment directive model.
//!
//! A directive is a machine-readable annotation embedded in a doc comment,
//! one per line, of the form `tool:name arg arg...` — for example
//! `view:toolbar -hide` or `typereg:embedder`. Directive lines are stripped
//! out of the prose documentation during scanning and collected separately,
//! so the registered `doc` string only contains human-readable text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed comment directive: a tool namespace, a directive name, and an
/// ordered list of string arguments. Equality is structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Tool namespace the directive is addressed to (e.g. `view`).
    pub tool: String,
    /// Directive name within the tool namespace (e.g. `toolbar`).
    pub name: String,
    /// Ordered arguments, whitespace-split from the directive line.
    pub args: Vec<String>,
}

impl Directive {
    pub fn new(tool: &str, name: &str, args: &[&str]) -> Self {
        Self {
            tool: tool.to_string(),
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tool, self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// A directive line is `tool:name` with no whitespace around the colon, both
// sides lower-case identifiers, followed by whitespace-separated args.
static DIRECTIVE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z][a-z0-9_-]*):([a-z][a-z0-9_-]*)((?:[ \t]+\S+)*)[ \t]*$")
        .expect("directive line regex")
});

/// Split raw doc-comment text into prose and directives.
///
/// Lines matching the directive form are removed from the prose and returned
/// as [`Directive`] values in source order. Leading and trailing blank lines
/// of the remaining prose are trimmed.
pub fn split_doc(raw: &str) -> (String, Vec<Directive>) {
    let mut prose: Vec<&str> = Vec::new();
    let mut directives = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim();
        if let Some(caps) = DIRECTIVE_LINE.captures(trimmed) {
            let args = caps
                .get(3)
                .map(|m| m.as_str())
                .unwrap_or("")
                .split_whitespace()
                .map(str::to_string)
                .collect();
            directives.push(Directive {
                tool: caps[1].to_string(),
                name: caps[2].to_string(),
                args,
            });
        } else {
            prose.push(line.trim_end());
        }
    }
    (prose.join("\n").trim().to_string(), directives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_doc_collects_directives() {
        let raw = "Person represents a person.\nview:toolbar -hide\ntypereg:embedder";
        let (doc, directives) = split_doc(raw);
        assert_eq!(doc, "Person represents a person.");
        assert_eq!(
            directives,
            vec![
                Directive::new("view", "toolbar", &["-hide"]),
                Directive::new("typereg", "embedder", &[]),
            ]
        );
    }

    #[test]
    fn test_split_doc_keeps_prose_with_colons() {
        let raw = "Note: this is prose, not a directive.\nSee also: other docs.";
        let (doc, directives) = split_doc(raw);
        assert_eq!(doc, raw);
        assert!(directives.is_empty());
    }

    #[test]
    fn test_split_doc_preserves_arg_order() {
        let (_, directives) = split_doc("ki:flagtype NodeFlags -field Flag");
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].args, vec!["NodeFlags", "-field", "Flag"]);
    }

    #[test]
    fn test_display_round_trip() {
        let d = Directive::new("view", "toolbar", &["-name", "Show"]);
        assert_eq!(d.to_string(), "view:toolbar -name Show");
    }
}
