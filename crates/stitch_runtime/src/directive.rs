//! Source directives: `#r "path"` and `using Namespace;`.
//!
//! Directives declare references and imports ahead of the code they belong
//! to. They are stripped before the code reaches the engine.

use std::path::PathBuf;

use stitch_foundation::{Error, Reference, Result};
use stitch_language::{CORE_MODULE, MATH_MODULE, core_module, math_module};
use stitch_session::ExecutionRequest;

/// A single directive line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `#r "target"`: a library path or built-in module name.
    Reference(String),
    /// `using Ns;`
    Using(String),
}

impl Directive {
    /// Adds this directive's input to a request.
    #[must_use]
    pub fn apply(&self, request: ExecutionRequest) -> ExecutionRequest {
        match self {
            Self::Reference(target) => request.with_reference(resolve_reference(target)),
            Self::Using(namespace) => request.with_namespace(namespace.clone()),
        }
    }
}

/// Maps a `#r` target to a reference: built-in module names resolve to the
/// module, anything else is a library path.
#[must_use]
pub fn resolve_reference(target: &str) -> Reference {
    match target {
        CORE_MODULE => core_module().into(),
        MATH_MODULE => math_module().into(),
        path => Reference::Path(PathBuf::from(path)),
    }
}

/// Parses one line as a directive.
///
/// Returns `Ok(None)` for lines that are ordinary code.
///
/// # Errors
///
/// Returns an error for a malformed `#r` line.
pub fn parse_directive(line: &str) -> Result<Option<Directive>> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix("#r") {
        let target = rest
            .trim()
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .filter(|s| !s.is_empty() && !s.contains('"'))
            .ok_or_else(|| Error::invalid_argument(format!("malformed reference directive: {line}")))?;
        return Ok(Some(Directive::Reference(target.to_string())));
    }

    let namespace = line
        .strip_prefix("using")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .and_then(|rest| rest.trim().strip_suffix(';'))
        .map(str::trim)
        .filter(|ns| is_namespace(ns));
    Ok(namespace.map(|ns| Directive::Using(ns.to_string())))
}

fn is_namespace(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Separates leading directives from the code that follows them.
///
/// Blank lines and `//` comments may sit between directives. Directive
/// lines are blanked rather than removed so diagnostics keep their line
/// numbers.
///
/// # Errors
///
/// Returns an error for a malformed directive.
pub fn split_directives(source: &str) -> Result<(Vec<Directive>, String)> {
    let mut directives = Vec::new();
    let mut code = Vec::new();
    let mut in_header = true;

    for line in source.lines() {
        if in_header {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                code.push(line);
                continue;
            }
            if let Some(directive) = parse_directive(line)? {
                directives.push(directive);
                code.push("");
                continue;
            }
            in_header = false;
        }
        code.push(line);
    }

    Ok((directives, code.join("\n")))
}
