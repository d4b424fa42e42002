//! Placeholder substitution for viewer command templates
//!
//! Recognized placeholders:
//! - `%a` application path (fails when no application is known)
//! - `%f` image file path
//! - `%t` window title
//! - `%%` literal percent sign
//!
//! Any other `%x` pair, and a trailing `%`, pass through unchanged.

use crate::error::{Result, ViewerError};

/// Values substituted into a command template for one resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionContext<'a> {
    pub app: &'a str,
    pub file: &'a str,
    pub title: &'a str,
}

impl<'a> SubstitutionContext<'a> {
    pub fn new(app: &'a str, file: &'a str, title: &'a str) -> Self {
        Self { app, file, title }
    }

    /// Use the file path as the title when no title was supplied
    pub fn with_default_title(self) -> Self {
        if self.title.is_empty() {
            Self {
                title: self.file,
                ..self
            }
        } else {
            self
        }
    }
}

/// Result of substituting a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub resolved: String,
    /// Whether `%f` occurred anywhere in the template
    pub file_token_seen: bool,
}

/// Replace every placeholder in `template` with its value from `ctx`.
///
/// Returns [`ViewerError::MissingApplication`] if `%a` is used while
/// `ctx.app` is empty. An unused `%a` never fails.
pub fn substitute(template: &str, ctx: &SubstitutionContext<'_>) -> Result<Substitution> {
    let mut resolved = String::with_capacity(template.len());
    let mut file_token_seen = false;
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            resolved.push(c);
            continue;
        }

        match chars.next() {
            Some('%') => resolved.push('%'),
            Some('a') => {
                if ctx.app.is_empty() {
                    return Err(ViewerError::MissingApplication);
                }
                resolved.push_str(ctx.app);
            }
            Some('t') => resolved.push_str(ctx.title),
            Some('f') => {
                resolved.push_str(ctx.file);
                file_token_seen = true;
            }
            Some(other) => {
                resolved.push('%');
                resolved.push(other);
            }
            None => resolved.push('%'),
        }
    }

    Ok(Substitution {
        resolved,
        file_token_seen,
    })
}
