use std::io::BufRead;

use crate::error::LpError;

/// Number of raw tokens visible to the classifier at once.
pub const LOOKAHEAD: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum RawToken {
    /// Identifier-like run of characters (section keyword, variable or
    /// constraint name -- distinguished by the classifier)
    Str(String),
    /// Numeric literal, strtod-style maximal prefix
    Num(f64),
    // Punctuation
    Less,
    Greater,
    Equal,
    Colon,
    BracketOpen,
    BracketClose,
    Plus,
    Minus,
    Hat,
    Slash,
    Asterisk,
    /// End of input -- sticky, returned forever once reached
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub token: T,
    pub line: u32,
}

/// Characters that end an identifier run when seen mid-token.
/// This is the original format's delimiter set: note that `[`, `]` and `;`
/// are *not* in it, so they only act at the start of a token.
fn is_delimiter(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\\' | ':' | '+' | '<' | '>' | '^' | '=' | ' ' | '/' | '-' | '*'
    )
}

/// Line-buffered lexer over any line-readable byte source.
///
/// `next_token` returns `Ok(None)` when input was consumed without producing
/// a token (whitespace, comment, end of line); callers retry. Once the
/// source is exhausted the lexer yields [`RawToken::Eof`] on every call.
pub struct Lexer<R> {
    reader: R,
    filename: String,
    buf: Vec<char>,
    pos: usize,
    line_no: u32,
    at_eof: bool,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R, filename: &str) -> Self {
        Lexer {
            reader,
            filename: filename.to_owned(),
            buf: Vec::new(),
            pos: 0,
            line_no: 0,
            at_eof: false,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    fn spanned(&self, token: RawToken) -> Spanned<RawToken> {
        Spanned {
            token,
            line: self.line_no,
        }
    }

    /// Produce the next raw token, or `None` if only whitespace, a comment,
    /// or a line end was consumed (the caller retries).
    pub fn next_token(&mut self) -> Result<Option<Spanned<RawToken>>, LpError> {
        if self.at_eof {
            return Ok(Some(self.spanned(RawToken::Eof)));
        }

        // Refill the line buffer when the current line is exhausted.
        if self.pos >= self.buf.len() {
            let mut raw = String::new();
            let n = self
                .reader
                .read_line(&mut raw)
                .map_err(|e| LpError::UnopenableInput {
                    path: self.filename.clone(),
                    source: e,
                })?;
            if n == 0 {
                self.at_eof = true;
                return Ok(Some(self.spanned(RawToken::Eof)));
            }
            while raw.ends_with('\n') || raw.ends_with('\r') {
                raw.pop();
            }
            self.buf = raw.chars().collect();
            self.pos = 0;
            self.line_no += 1;
            return Ok(None);
        }

        let c = self.buf[self.pos];
        let single = match c {
            // `\` comments out the rest of the line
            '\\' => {
                self.pos = self.buf.len();
                return Ok(None);
            }
            '[' => Some(RawToken::BracketOpen),
            ']' => Some(RawToken::BracketClose),
            '<' => Some(RawToken::Less),
            '>' => Some(RawToken::Greater),
            '=' => Some(RawToken::Equal),
            ':' => Some(RawToken::Colon),
            '+' => Some(RawToken::Plus),
            '-' => Some(RawToken::Minus),
            '^' => Some(RawToken::Hat),
            '/' => Some(RawToken::Slash),
            '*' => Some(RawToken::Asterisk),
            ' ' | '\t' => {
                self.pos += 1;
                return Ok(None);
            }
            // `;` ends the current line's token production
            ';' => {
                self.pos = self.buf.len();
                return Ok(None);
            }
            _ => None,
        };
        if let Some(token) = single {
            self.pos += 1;
            return Ok(Some(self.spanned(token)));
        }

        if let Some((value, width)) = self.scan_number() {
            self.pos += width;
            return Ok(Some(self.spanned(RawToken::Num(value))));
        }

        let start = self.pos;
        while self.pos < self.buf.len() && !is_delimiter(self.buf[self.pos]) {
            self.pos += 1;
        }
        if self.pos > start {
            let s: String = self.buf[start..self.pos].iter().collect();
            return Ok(Some(self.spanned(RawToken::Str(s))));
        }

        Err(LpError::UnexpectedCharacter {
            file: self.filename.clone(),
            line: self.line_no,
            ch: c,
        })
    }

    /// Locale-independent numeric prefix scan:
    /// `digits [. digits] [eE [+|-] digits]`, or `. digits ...`.
    /// Returns the parsed value and consumed width, or `None` when the
    /// current position does not start a number.
    fn scan_number(&self) -> Option<(f64, usize)> {
        let chars = &self.buf;
        let len = chars.len();
        let mut i = self.pos;

        while i < len && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i < len && chars[i] == '.' {
            let j = i + 1;
            // take the dot only if a digit precedes or follows it
            if i > self.pos || (j < len && chars[j].is_ascii_digit()) {
                i = j;
                while i < len && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
        }
        if i == self.pos || !chars[self.pos..i].iter().any(|c| c.is_ascii_digit()) {
            return None;
        }
        if i < len && (chars[i] == 'e' || chars[i] == 'E') {
            let mut j = i + 1;
            if j < len && (chars[j] == '+' || chars[j] == '-') {
                j += 1;
            }
            // an exponent letter without digits is not part of the number
            if j < len && chars[j].is_ascii_digit() {
                while j < len && chars[j].is_ascii_digit() {
                    j += 1;
                }
                i = j;
            }
        }
        let text: String = chars[self.pos..i].iter().collect();
        text.parse::<f64>().ok().map(|v| (v, i - self.pos))
    }
}

/// Sliding window of the next [`LOOKAHEAD`] raw tokens.
///
/// The classifier inspects up to five tokens before committing to an
/// interpretation and then advances by however many it consumed. Advancing
/// internally loops past the lexer's "no token produced" results.
pub struct TokenWindow<R> {
    lexer: Lexer<R>,
    window: Vec<Spanned<RawToken>>,
}

impl<R: BufRead> TokenWindow<R> {
    pub fn new(mut lexer: Lexer<R>) -> Result<Self, LpError> {
        let mut window = Vec::with_capacity(LOOKAHEAD);
        for _ in 0..LOOKAHEAD {
            window.push(Self::pump(&mut lexer)?);
        }
        Ok(TokenWindow { lexer, window })
    }

    fn pump(lexer: &mut Lexer<R>) -> Result<Spanned<RawToken>, LpError> {
        loop {
            if let Some(t) = lexer.next_token()? {
                return Ok(t);
            }
        }
    }

    pub fn peek(&self, offset: usize) -> &Spanned<RawToken> {
        debug_assert!(offset < LOOKAHEAD);
        &self.window[offset]
    }

    pub fn advance(&mut self, count: usize) -> Result<(), LpError> {
        debug_assert!(count > 0);
        for _ in 0..count {
            let next = Self::pump(&mut self.lexer)?;
            self.window.rotate_left(1);
            self.window[LOOKAHEAD - 1] = next;
        }
        Ok(())
    }

    pub fn filename(&self) -> &str {
        self.lexer.filename()
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(src: &str) -> Vec<RawToken> {
        let mut lexer = Lexer::new(src.as_bytes(), "test.lp");
        let mut out = Vec::new();
        loop {
            match lexer.next_token().expect("lex failure") {
                Some(Spanned {
                    token: RawToken::Eof,
                    ..
                }) => break,
                Some(t) => out.push(t.token),
                None => {}
            }
        }
        out
    }

    #[test]
    fn punctuation_and_signs() {
        assert_eq!(
            lex_all("[ ] < > = : + - ^ / *"),
            vec![
                RawToken::BracketOpen,
                RawToken::BracketClose,
                RawToken::Less,
                RawToken::Greater,
                RawToken::Equal,
                RawToken::Colon,
                RawToken::Plus,
                RawToken::Minus,
                RawToken::Hat,
                RawToken::Slash,
                RawToken::Asterisk,
            ]
        );
    }

    #[test]
    fn numbers_take_maximal_prefix() {
        assert_eq!(
            lex_all("3 4.5 .25 1e3 2E-2"),
            vec![
                RawToken::Num(3.0),
                RawToken::Num(4.5),
                RawToken::Num(0.25),
                RawToken::Num(1000.0),
                RawToken::Num(0.02),
            ]
        );
    }

    #[test]
    fn exponent_without_digits_is_not_consumed() {
        // "2e" is the number 2 followed by the identifier "e"
        assert_eq!(
            lex_all("2e"),
            vec![RawToken::Num(2.0), RawToken::Str("e".to_string())]
        );
    }

    #[test]
    fn number_glued_to_identifier() {
        assert_eq!(
            lex_all("3x1"),
            vec![RawToken::Num(3.0), RawToken::Str("x1".to_string())]
        );
    }

    #[test]
    fn dotted_identifier_is_one_token() {
        // "s.t." must survive as a single string run for keyword matching
        assert_eq!(lex_all("s.t."), vec![RawToken::Str("s.t.".to_string())]);
    }

    #[test]
    fn backslash_comments_out_rest_of_line() {
        assert_eq!(
            lex_all("x1 \\ this is ignored\nx2"),
            vec![
                RawToken::Str("x1".to_string()),
                RawToken::Str("x2".to_string())
            ]
        );
    }

    #[test]
    fn semicolon_ends_token_production_for_the_line() {
        assert_eq!(
            lex_all("x1 ; x2\nx3"),
            vec![
                RawToken::Str("x1".to_string()),
                RawToken::Str("x3".to_string())
            ]
        );
    }

    #[test]
    fn crlf_lines_lex_like_lf_lines() {
        assert_eq!(lex_all("min\r\nx\r\n"), lex_all("min\nx\n"));
    }

    #[test]
    fn eof_is_sticky() {
        let mut lexer = Lexer::new("x".as_bytes(), "test.lp");
        loop {
            if let Some(t) = lexer.next_token().unwrap() {
                if t.token == RawToken::Eof {
                    break;
                }
            }
        }
        for _ in 0..3 {
            let t = lexer.next_token().unwrap().unwrap();
            assert_eq!(t.token, RawToken::Eof);
        }
    }

    #[test]
    fn tokens_carry_their_source_line() {
        let mut lexer = Lexer::new("a\nb\n\nc".as_bytes(), "test.lp");
        let mut seen = Vec::new();
        loop {
            match lexer.next_token().unwrap() {
                Some(Spanned {
                    token: RawToken::Eof,
                    ..
                }) => break,
                Some(t) => seen.push((t.token, t.line)),
                None => {}
            }
        }
        assert_eq!(
            seen,
            vec![
                (RawToken::Str("a".to_string()), 1),
                (RawToken::Str("b".to_string()), 2),
                (RawToken::Str("c".to_string()), 4),
            ]
        );
    }

    #[test]
    fn window_peek_and_advance() {
        let lexer = Lexer::new("a + b - c".as_bytes(), "test.lp");
        let mut w = TokenWindow::new(lexer).unwrap();
        assert_eq!(w.peek(0).token, RawToken::Str("a".to_string()));
        assert_eq!(w.peek(1).token, RawToken::Plus);
        assert_eq!(w.peek(4).token, RawToken::Str("c".to_string()));
        w.advance(2).unwrap();
        assert_eq!(w.peek(0).token, RawToken::Str("b".to_string()));
        // past the end of input the window fills with Eof
        assert_eq!(w.peek(3).token, RawToken::Eof);
    }
}
