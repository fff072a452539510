//! Runtime message templates
//!
//! The `*_fmt` write calls take a template and a slice of arguments that are
//! only matched up at runtime. A mismatch must never reach the caller, so the
//! outcome is an explicit [`FormattedMessage`]: either the rendered text or the
//! literal template with a diagnostic suffix.
//!
//! Template syntax follows `format!`: `{}` takes the next argument, `{N}` takes
//! argument `N`, and `{{` / `}}` are literal braces.

use std::fmt::{self, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Result of rendering a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedMessage {
    Formatted(String),
    /// Template could not be rendered; `message` is the literal template
    /// followed by a `[FORMAT ERROR: ...]` marker.
    Degraded { message: String, reason: String },
}

impl FormattedMessage {
    pub fn is_degraded(&self) -> bool {
        matches!(self, FormattedMessage::Degraded { .. })
    }

    pub fn as_str(&self) -> &str {
        match self {
            FormattedMessage::Formatted(message) => message,
            FormattedMessage::Degraded { message, .. } => message,
        }
    }

    pub fn into_message(self) -> String {
        match self {
            FormattedMessage::Formatted(message) => message,
            FormattedMessage::Degraded { message, .. } => message,
        }
    }
}

/// Render `template` with `args`.
///
/// printf-style markers such as `%s` are not placeholders and pass through
/// as plain text. An argument whose `Display` impl panics degrades the
/// message like any other formatting failure.
pub fn format_template(template: &str, args: &[&dyn fmt::Display]) -> FormattedMessage {
    let rendered = catch_unwind(AssertUnwindSafe(|| render(template, args)))
        .unwrap_or_else(|_| Err("argument panicked while formatting".to_string()));
    match rendered {
        Ok(text) => FormattedMessage::Formatted(text),
        Err(reason) => FormattedMessage::Degraded {
            message: format!("{} [FORMAT ERROR: {}]", template, reason),
            reason,
        },
    }
}

fn render(template: &str, args: &[&dyn fmt::Display]) -> Result<String, String> {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.char_indices().peekable();
    let mut next_implicit = 0usize;

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let mut placeholder = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    placeholder.push(c);
                }
                if !closed {
                    return Err(format!("unclosed placeholder at byte {}", pos));
                }

                let index = if placeholder.is_empty() {
                    let index = next_implicit;
                    next_implicit += 1;
                    index
                } else {
                    placeholder
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| format!("invalid placeholder '{{{}}}'", placeholder))?
                };

                let arg = args.get(index).ok_or_else(|| {
                    format!("missing argument {} ({} supplied)", index, args.len())
                })?;
                write!(out, "{}", arg)
                    .map_err(|_| format!("argument {} failed to format", index))?;
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(format!("unmatched '}}' at byte {}", pos));
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
