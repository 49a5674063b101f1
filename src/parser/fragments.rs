//! Parenthesis-aware slicing of simplified SQL
//!
//! Column lists and argument lists are split on commas, but a comma inside
//! `NUMERIC(10,2)`, a function-call default, a string literal or a tag
//! comment (`/* #roles=['a','b'] */`) never ends a fragment.

/// Nesting state while walking SQL text byte by byte.
#[derive(Debug, Default, Clone, Copy)]
struct NestingState {
    depth: i32,
    in_single: bool,
    in_double: bool,
    in_comment: bool,
}

impl NestingState {
    /// Advance over the byte at `i`, returning how many bytes were consumed.
    fn step(&mut self, bytes: &[u8], i: usize) -> usize {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        if self.in_comment {
            if b == b'*' && next == Some(b'/') {
                self.in_comment = false;
                return 2;
            }
            return 1;
        }
        if self.in_single {
            if b == b'\'' {
                self.in_single = false;
            }
            return 1;
        }
        if self.in_double {
            if b == b'"' {
                self.in_double = false;
            }
            return 1;
        }

        match b {
            b'/' if next == Some(b'*') => {
                self.in_comment = true;
                2
            }
            b'\'' => {
                self.in_single = true;
                1
            }
            b'"' => {
                self.in_double = true;
                1
            }
            b'(' => {
                self.depth += 1;
                1
            }
            b')' => {
                self.depth -= 1;
                1
            }
            _ => 1,
        }
    }

    fn feed(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            i += self.step(bytes, i);
        }
    }

    fn is_quoted(&self) -> bool {
        self.in_single || self.in_double || self.in_comment
    }

    fn is_top_level(&self) -> bool {
        self.depth <= 0 && !self.is_quoted()
    }
}

/// Return the text between the `(` at byte offset `open` and its matching `)`,
/// together with the offset just past the closing parenthesis.
pub fn extract_parenthesized(text: &str, open: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }

    let mut state = NestingState::default();
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        let consumed = state.step(bytes, i);
        if b == b')' && !state.is_quoted() && state.depth == 0 {
            return Some((&text[open + 1..i], i + 1));
        }
        i += consumed;
    }
    None
}

/// Split a column or argument list on top-level commas.
///
/// Comma-separated pieces are accumulated until the accumulated text is
/// balanced again, so nested commas stay inside their fragment. Fragments are
/// trimmed; empty ones are dropped.
pub fn split_top_level(list: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut state = NestingState::default();
    let mut accumulating = false;

    for piece in list.split(',') {
        if accumulating {
            current.push(',');
        }
        current.push_str(piece);
        state.feed(piece);

        if state.is_top_level() {
            push_fragment(&mut fragments, &current);
            current.clear();
            state = NestingState::default();
            accumulating = false;
        } else {
            accumulating = true;
        }
    }

    // Unbalanced tail: keep it rather than lose a column
    push_fragment(&mut fragments, &current);
    fragments
}

fn push_fragment(fragments: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        fragments.push(trimmed.to_string());
    }
}
