//! Markdown escaping helpers.

/// Escape characters that would otherwise be read as markdown syntax.
///
/// Backslash, emphasis (`*`, `_`), brackets, backticks, pipes and angle brackets always; `#`
/// only at the start of a line and `!` only when it would open an image.
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    let mut chars = text.chars().peekable();
    let mut at_line_start = true;

    while let Some(c) = chars.next() {
        match c {
            '\\' => result.push_str("\\\\"),
            '*' | '_' | '[' | ']' | '`' | '|' | '<' | '>' => {
                result.push('\\');
                result.push(c);
            }
            '#' if at_line_start => result.push_str("\\#"),
            '!' if chars.peek() == Some(&'[') => result.push_str("\\!"),
            _ => result.push(c),
        }
        at_line_start = c == '\n';
    }

    result
}

/// Smallest fence (at least 3) longer than any run of `fence_char` in `content`.
pub fn calculate_fence_length(content: &str, fence_char: char) -> usize {
    longest_run(content, fence_char).max(2) + 1
}

/// Smallest backtick count that does not appear as a run in `content`.
pub fn calculate_inline_code_ticks(content: &str) -> usize {
    longest_run(content, '`') + 1
}

fn longest_run(content: &str, target: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;
    for c in content.chars() {
        if c == target {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    max_run
}
