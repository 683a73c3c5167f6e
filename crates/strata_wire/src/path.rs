//! SVG path-data syntax validation
//!
//! The wire protocol carries path data as a raw string; the renderer on the
//! other side parses it for real. Validation here only decides whether the
//! string is worth shipping: a malformed string skips its node instead of
//! poisoning the frame.

/// Whether `data` is syntactically valid SVG path data
///
/// Checks command letters, number syntax, and that drawing starts with a
/// moveto. Argument-count rules per command are left to the renderer.
pub fn is_valid_path_data(data: &str) -> bool {
    let mut tokens = Tokenizer::new(data);
    let mut seen_command = false;

    loop {
        match tokens.next_token() {
            Some(Token::Command(c)) => {
                if !seen_command {
                    // Path data must start with an absolute or relative moveto.
                    if c != 'M' && c != 'm' {
                        return false;
                    }
                    seen_command = true;
                }
            }
            Some(Token::Number) => {
                if !seen_command {
                    return false;
                }
            }
            Some(Token::Invalid) => return false,
            None => break,
        }
    }
    seen_command
}

enum Token {
    Command(char),
    Number,
    Invalid,
}

struct Tokenizer<'a> {
    rest: &'a [u8],
}

impl<'a> Tokenizer<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            rest: data.as_bytes(),
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        while let [first, rest @ ..] = self.rest {
            if first.is_ascii_whitespace() || *first == b',' {
                self.rest = rest;
            } else {
                break;
            }
        }
        let first = *self.rest.first()?;

        if matches!(
            first,
            b'M' | b'm'
                | b'L' | b'l'
                | b'H' | b'h'
                | b'V' | b'v'
                | b'C' | b'c'
                | b'S' | b's'
                | b'Q' | b'q'
                | b'T' | b't'
                | b'A' | b'a'
                | b'Z' | b'z'
        ) {
            self.rest = &self.rest[1..];
            return Some(Token::Command(first as char));
        }

        if first.is_ascii_digit() || matches!(first, b'+' | b'-' | b'.') {
            return Some(self.consume_number());
        }
        Some(Token::Invalid)
    }

    fn consume_number(&mut self) -> Token {
        let mut index = 0;
        let bytes = self.rest;
        if matches!(bytes.get(index), Some(b'+') | Some(b'-')) {
            index += 1;
        }
        let mut digits = 0;
        while bytes.get(index).is_some_and(|b| b.is_ascii_digit()) {
            index += 1;
            digits += 1;
        }
        if bytes.get(index) == Some(&b'.') {
            index += 1;
            while bytes.get(index).is_some_and(|b| b.is_ascii_digit()) {
                index += 1;
                digits += 1;
            }
        }
        if digits == 0 {
            return Token::Invalid;
        }
        if matches!(bytes.get(index), Some(b'e') | Some(b'E')) {
            index += 1;
            if matches!(bytes.get(index), Some(b'+') | Some(b'-')) {
                index += 1;
            }
            let mut exp_digits = 0;
            while bytes.get(index).is_some_and(|b| b.is_ascii_digit()) {
                index += 1;
                exp_digits += 1;
            }
            if exp_digits == 0 {
                return Token::Invalid;
            }
        }
        self.rest = &bytes[index..];
        Token::Number
    }
}
