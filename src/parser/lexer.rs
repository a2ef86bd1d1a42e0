/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// A bare identifier (field name or type name)
    Name(String),
    /// A single- or double-quoted string, escapes resolved
    Quoted(String),
    /// A byte that starts no token
    Unexpected(char),
    /// A quoted string with no closing quote
    Unterminated,
    /// End of input
    Eof,
}

/// A token with its source location.
#[derive(Debug, Clone)]
pub struct Located {
    pub token: Token,
    pub line: usize,
}

/// Tokenizer for schema text.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('#') => self.skip_line(),
                Some('/') if self.input[self.pos..].starts_with("//") => self.skip_line(),
                _ => break,
            }
        }
    }

    fn read_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if is_name_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn read_quoted(&mut self, quote: char) -> Token {
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Token::Unterminated,
                Some(c) if c == quote => return Token::Quoted(out),
                Some('\\') => match self.advance() {
                    None => return Token::Unterminated,
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Read the next token.
    pub fn next_token(&mut self) -> Located {
        self.skip_whitespace_and_comments();
        let line = self.line;

        let token = match self.peek_char() {
            None => Token::Eof,
            Some(c) if is_name_char(c) => Token::Name(self.read_name()),
            Some(c) => {
                self.advance();
                match c {
                    '{' => Token::LBrace,
                    '}' => Token::RBrace,
                    '[' => Token::LBracket,
                    ']' => Token::RBracket,
                    ':' => Token::Colon,
                    ',' => Token::Comma,
                    '"' | '\'' => self.read_quoted(c),
                    other => Token::Unexpected(other),
                }
            }
        };
        Located { token, line }
    }

    /// Peek at the next token without consuming it.
    pub fn peek_token(&mut self) -> Located {
        let saved_pos = self.pos;
        let saved_line = self.line;
        let tok = self.next_token();
        self.pos = saved_pos;
        self.line = saved_line;
        tok
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
