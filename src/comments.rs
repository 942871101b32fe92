//! Comment stripping for JSON-with-comments documents.
//!
//! Two comment forms are removed before the text reaches the JSON decoder:
//!
//! * `//` line comments, but only when nothing except whitespace precedes them
//!   on their line. The whole line, including its newline, is dropped. This keeps
//!   `"http://example.com"` intact.
//! * `/* ... */` block comments, which may span lines.
//!
//! The filter works on raw text and does not track string literals, so a `/*`
//! inside a string value still opens a block comment.

/// Removes line and block comments from `input`.
#[must_use]
pub fn strip_comments(input: &str) -> String {
    CommentStripper::new(input).strip()
}

struct CommentStripper<'a> {
    input: &'a str,
    position: usize,
    output: String,
}

impl<'a> CommentStripper<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            output: String::with_capacity(input.len()),
        }
    }

    fn strip(mut self) -> String {
        let mut at_line_start = true;
        while self.position < self.input.len() {
            if at_line_start {
                if self.skip_line_comment() {
                    continue;
                }
                at_line_start = false;
            }

            if self.rest().starts_with("/*") {
                if !self.skip_block_comment() {
                    // Unterminated block: leave the text for the decoder to reject.
                    self.output.push_str(self.rest());
                    self.position = self.input.len();
                }
                continue;
            }

            let Some(c) = self.advance() else {
                break;
            };
            self.output.push(c);
            if c == '\n' {
                at_line_start = true;
            }
        }
        self.output
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Skips the current line if it holds only whitespace followed by `//`.
    fn skip_line_comment(&mut self) -> bool {
        let rest = self.rest();
        let body = rest.trim_start_matches(|c: char| c.is_whitespace() && c != '\n');
        if !body.starts_with("//") {
            return false;
        }
        self.position += rest.find('\n').map_or(rest.len(), |i| i + 1);
        true
    }

    fn skip_block_comment(&mut self) -> bool {
        match self.rest()[2..].find("*/") {
            Some(end) => {
                self.position += end + 4;
                true
            }
            None => false,
        }
    }
}
