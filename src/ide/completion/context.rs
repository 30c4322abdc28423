//! Text-based classification of the cursor position.

use regex::Regex;
use std::sync::LazyLock;

static EMPTY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*:\s*$").expect("Invalid regex"));
static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["'][^"']*["']"#).expect("Invalid regex"));

const WORD_DELIMITERS: &str = " \t\n\r\":{[()]},*>+";

/// Which symbol groups make sense at the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionContext {
    pub comment: bool,
    pub variable: bool,
    pub mixin: bool,
    pub function: bool,
}

impl CompletionContext {
    /// Classify `offset` in `text`. `function_triggers` lists the characters
    /// after which functions are offered inside a property value.
    pub fn detect(text: &str, offset: usize, function_triggers: &str) -> Self {
        let offset = floor_char_boundary(text, offset.min(text.len()));
        let before = &text[..offset];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let line = &before[line_start..];

        if in_comment(before, line) {
            return Self {
                comment: true,
                ..Self::default()
            };
        }

        let word = current_word(before);
        let text_before_word = &line[..line.len() - word.len().min(line.len())];

        let interpolation = in_interpolation(line);
        let property_value = line.contains(':');
        let empty_value = EMPTY_VALUE.is_match(line);
        let quotes = QUOTED.replace_all(line, "").contains(['"', '\'']);

        let variable = if property_value && !empty_value && !quotes {
            word.contains('$')
        } else if quotes {
            interpolation
        } else {
            word.starts_with('$') || interpolation || empty_value
        };

        let mixin = !property_value && text_before_word.contains("@include");

        let function = if property_value && !empty_value && !quotes {
            second_to_last_char(line).is_some_and(|c| function_triggers.contains(c))
        } else if quotes {
            interpolation
        } else {
            false
        };

        Self {
            comment: false,
            variable,
            mixin,
            function,
        }
    }
}

/// Word under construction immediately left of the cursor.
fn current_word(before: &str) -> &str {
    let start = before
        .rfind(|c| WORD_DELIMITERS.contains(c))
        .map(|i| i + 1)
        .unwrap_or(0);
    &before[start..]
}

/// A `//` earlier on the line, or a `/*` that is still open.
fn in_comment(before: &str, line: &str) -> bool {
    if line.contains("//") && !line.contains("://") {
        return true;
    }
    match before.rfind("/*") {
        Some(open) => !before[open..].contains("*/"),
        None => false,
    }
}

/// An unclosed `#{` on the current line.
fn in_interpolation(line: &str) -> bool {
    match line.rfind("#{") {
        Some(open) => !line[open..].contains('}'),
        None => false,
    }
}

fn second_to_last_char(line: &str) -> Option<char> {
    line.chars().rev().nth(1)
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
