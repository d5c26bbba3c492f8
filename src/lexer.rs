// ABOUTME: Lexer turning source text into a sequence of located tokens

use crate::token::{Span, Token, TokenKind};

const MAX_IDENTIFIER_LEN: usize = 51;

/// Character-by-character scanner. Tracks a 1-based line and 0-based
/// column so spans line up with common editor conventions.
pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            col: 0,
        }
    }

    /// Scans the whole input and returns its tokens, always ending with
    /// a single `Eof` sentinel.
    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn here(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn emit(&self, kind: TokenKind, start: (usize, usize)) -> Token {
        let (start_line, start_col) = start;
        Token::new(kind, Span::new(start_line, start_col, self.line, self.col))
    }

    fn next_token(&mut self) -> Token {
        loop {
            match self.peek() {
                None => return self.emit(TokenKind::Eof, self.here()),
                Some(' ') | Some('\t') | Some('\n') | Some('\r') => {
                    self.advance();
                    continue;
                }
                Some(c) => return self.scan_one(c),
            }
        }
    }

    fn scan_one(&mut self, c: char) -> Token {
        let start = self.here();
        if c.is_ascii_digit() {
            return self.scan_number(start);
        }
        if c.is_ascii_alphabetic() {
            return self.scan_word(start);
        }
        if c == '"' {
            return self.scan_string(start);
        }

        self.advance();
        let two_char = |this: &mut Self, next: char, two: TokenKind, one: TokenKind| -> Token {
            if this.peek() == Some(next) {
                this.advance();
                this.emit(two, start)
            } else {
                this.emit(one, start)
            }
        };

        match c {
            '>' => two_char(self, '=', TokenKind::GreaterEquals, TokenKind::Greater),
            '<' => two_char(self, '=', TokenKind::LesserEquals, TokenKind::Lesser),
            '=' => two_char(self, '=', TokenKind::Equals, TokenKind::Assignment),
            '!' => two_char(self, '=', TokenKind::NotEquals, TokenKind::Not),
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    self.emit(TokenKind::And, start)
                } else {
                    self.emit(TokenKind::Error("Expected '&' after '&'.".into()), start)
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.emit(TokenKind::Or, start)
                } else {
                    self.emit(TokenKind::Error("Expected '|' after '|'.".into()), start)
                }
            }
            '+' => self.emit(TokenKind::Plus, start),
            '-' => self.emit(TokenKind::Minus, start),
            '*' => self.emit(TokenKind::Mul, start),
            '/' => self.emit(TokenKind::Div, start),
            '(' => self.emit(TokenKind::LeftBracket, start),
            ')' => self.emit(TokenKind::RightBracket, start),
            '{' => self.emit(TokenKind::LeftCurlyBracket, start),
            '}' => self.emit(TokenKind::RightCurlyBracket, start),
            ';' => self.emit(TokenKind::Semicolon, start),
            ',' => self.emit(TokenKind::Comma, start),
            other => self.emit(
                TokenKind::Error(format!("Unexpected character '{other}'.")),
                start,
            ),
        }
    }

    fn scan_string(&mut self, start: (usize, usize)) -> Token {
        self.advance(); // opening quote
        let mut content = String::new();
        loop {
            match self.advance() {
                None => return self.emit(TokenKind::Error("String never ended.".into()), start),
                Some('"') => return self.emit(TokenKind::String(Some(content)), start),
                Some(c) => content.push(c),
            }
        }
    }

    fn scan_number(&mut self, start: (usize, usize)) -> Token {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() != Some('.') {
            let value: i64 = digits.parse().expect("digit run must parse as i64");
            return self.emit(TokenKind::Int(Some(value)), start);
        }

        // Only consume the '.' once we know there is a number after it;
        // a second '.' or a lone trailing '.' are both errors.
        self.advance(); // '.'
        if self.peek() == Some('.') {
            return self.emit(
                TokenKind::Error("Expected only one . for a number.".into()),
                start,
            );
        }

        let mut fraction = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                fraction.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if fraction.is_empty() {
            return self.emit(
                TokenKind::Error("Expected digits after '.' for a number.".into()),
                start,
            );
        }

        if self.peek() == Some('.') {
            return self.emit(
                TokenKind::Error("Expected only one . for a number.".into()),
                start,
            );
        }

        let value: f64 = format!("{digits}.{fraction}")
            .parse()
            .expect("digit.digit run must parse as f64");
        self.emit(TokenKind::Double(Some(value)), start)
    }

    fn scan_word(&mut self, start: (usize, usize)) -> Token {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if word.len() > MAX_IDENTIFIER_LEN {
            return self.emit(
                TokenKind::Error(format!(
                    "Identifier exceeds the {MAX_IDENTIFIER_LEN}-character limit."
                )),
                start,
            );
        }

        let kind = match word.as_str() {
            "int" => TokenKind::Int(None),
            "double" => TokenKind::Double(None),
            "str" => TokenKind::String(None),
            "bool" => TokenKind::Boolean,
            "List" => TokenKind::List,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "while" => TokenKind::While,
            "if" => TokenKind::If,
            "elif" => TokenKind::Elif,
            "else" => TokenKind::Else,
            "fun" => TokenKind::Fun,
            "return" => TokenKind::Return,
            "struct" => TokenKind::Struct,
            "write" => TokenKind::Write,
            _ => TokenKind::Identifier(word),
        };
        self.emit(kind, start)
    }
}

/// `[A-Za-z][A-Za-z0-9]{0,50}` — the identifier shape the word scanner
/// accepts, exposed standalone so callers (and tests) can check a name
/// without round-tripping it through the lexer.
pub fn is_allowed_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    let rest = chars.as_str();
    rest.chars().count() <= 50 && rest.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn single_char_operators() {
        assert_eq!(kinds("+"), vec![TokenKind::Plus, TokenKind::Eof]);
        assert_eq!(kinds("-"), vec![TokenKind::Minus, TokenKind::Eof]);
        assert_eq!(kinds("*"), vec![TokenKind::Mul, TokenKind::Eof]);
        assert_eq!(kinds("/"), vec![TokenKind::Div, TokenKind::Eof]);
        assert_eq!(kinds(";"), vec![TokenKind::Semicolon, TokenKind::Eof]);
        assert_eq!(kinds(","), vec![TokenKind::Comma, TokenKind::Eof]);
        assert_eq!(kinds("("), vec![TokenKind::LeftBracket, TokenKind::Eof]);
        assert_eq!(kinds(")"), vec![TokenKind::RightBracket, TokenKind::Eof]);
        assert_eq!(kinds("{"), vec![TokenKind::LeftCurlyBracket, TokenKind::Eof]);
        assert_eq!(kinds("}"), vec![TokenKind::RightCurlyBracket, TokenKind::Eof]);
    }

    #[test]
    fn two_char_operators_and_fallbacks() {
        assert_eq!(kinds(">="), vec![TokenKind::GreaterEquals, TokenKind::Eof]);
        assert_eq!(kinds(">"), vec![TokenKind::Greater, TokenKind::Eof]);
        assert_eq!(kinds("<="), vec![TokenKind::LesserEquals, TokenKind::Eof]);
        assert_eq!(kinds("<"), vec![TokenKind::Lesser, TokenKind::Eof]);
        assert_eq!(kinds("=="), vec![TokenKind::Equals, TokenKind::Eof]);
        assert_eq!(kinds("="), vec![TokenKind::Assignment, TokenKind::Eof]);
        assert_eq!(kinds("!="), vec![TokenKind::NotEquals, TokenKind::Eof]);
        assert_eq!(kinds("!"), vec![TokenKind::Not, TokenKind::Eof]);
        assert_eq!(kinds("&&"), vec![TokenKind::And, TokenKind::Eof]);
        assert_eq!(kinds("||"), vec![TokenKind::Or, TokenKind::Eof]);
    }

    #[test]
    fn lone_ampersand_or_pipe_is_an_error_token() {
        assert!(matches!(kinds("&")[0], TokenKind::Error(_)));
        assert!(matches!(kinds("|")[0], TokenKind::Error(_)));
    }

    #[test]
    fn keywords() {
        assert_eq!(kinds("int"), vec![TokenKind::Int(None), TokenKind::Eof]);
        assert_eq!(kinds("double"), vec![TokenKind::Double(None), TokenKind::Eof]);
        assert_eq!(kinds("str"), vec![TokenKind::String(None), TokenKind::Eof]);
        assert_eq!(kinds("bool"), vec![TokenKind::Boolean, TokenKind::Eof]);
        assert_eq!(kinds("List"), vec![TokenKind::List, TokenKind::Eof]);
        assert_eq!(kinds("true"), vec![TokenKind::True, TokenKind::Eof]);
        assert_eq!(kinds("false"), vec![TokenKind::False, TokenKind::Eof]);
        assert_eq!(kinds("for"), vec![TokenKind::For, TokenKind::Eof]);
        assert_eq!(kinds("in"), vec![TokenKind::In, TokenKind::Eof]);
        assert_eq!(kinds("while"), vec![TokenKind::While, TokenKind::Eof]);
        assert_eq!(kinds("if"), vec![TokenKind::If, TokenKind::Eof]);
        assert_eq!(kinds("elif"), vec![TokenKind::Elif, TokenKind::Eof]);
        assert_eq!(kinds("else"), vec![TokenKind::Else, TokenKind::Eof]);
        assert_eq!(kinds("fun"), vec![TokenKind::Fun, TokenKind::Eof]);
        assert_eq!(kinds("return"), vec![TokenKind::Return, TokenKind::Eof]);
        assert_eq!(kinds("struct"), vec![TokenKind::Struct, TokenKind::Eof]);
        assert_eq!(kinds("write"), vec![TokenKind::Write, TokenKind::Eof]);
    }

    #[test]
    fn is_allowed_identifier_accepts_letters_and_digits() {
        assert!(is_allowed_identifier("a"));
        assert!(is_allowed_identifier("A"));
        assert!(is_allowed_identifier("aA"));
        assert!(is_allowed_identifier("a78"));
    }

    #[test]
    fn is_allowed_identifier_rejects_bad_shapes() {
        assert!(!is_allowed_identifier("0aa"));
        assert!(!is_allowed_identifier("_0aa"));
        assert!(!is_allowed_identifier("a|8"));
        assert!(!is_allowed_identifier(""));
    }

    #[test]
    fn simple_assignment_statement() {
        assert_eq!(
            kinds("int a = 5"),
            vec![
                TokenKind::Int(None),
                TokenKind::Identifier("a".into()),
                TokenKind::Assignment,
                TokenKind::Int(Some(5)),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn double_literal() {
        assert_eq!(kinds("3.14"), vec![TokenKind::Double(Some(3.14)), TokenKind::Eof]);
    }

    #[test]
    fn trailing_dot_is_an_error() {
        assert!(matches!(kinds("42.")[0], TokenKind::Error(_)));
    }

    #[test]
    fn second_dot_is_an_error() {
        match &kinds("1.2.3")[0] {
            TokenKind::Error(msg) => assert_eq!(msg, "Expected only one . for a number."),
            other => panic!("expected error token, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_is_an_error() {
        match &kinds("\"abc")[0] {
            TokenKind::Error(msg) => assert_eq!(msg, "String never ended."),
            other => panic!("expected error token, got {other:?}"),
        }
    }

    #[test]
    fn string_with_embedded_newline() {
        assert_eq!(
            kinds("\"a\nb\""),
            vec![TokenKind::String(Some("a\nb".into())), TokenKind::Eof]
        );
    }

    #[test]
    fn identifier_over_limit_is_an_error() {
        let long = "a".repeat(52);
        assert!(matches!(kinds(&long)[0], TokenKind::Error(_)));
        let ok = "a".repeat(51);
        assert_eq!(kinds(&ok), vec![TokenKind::Identifier(ok), TokenKind::Eof]);
    }

    #[test]
    fn fizzbuzz_program_tokenizes() {
        let source = "int i = 1;\nwhile (i < 101) {\n    write(i);\n    i = i + 1;\n}";
        let tokens = kinds(source);
        assert_eq!(tokens.first(), Some(&TokenKind::Int(None)));
        assert_eq!(tokens.last(), Some(&TokenKind::Eof));
        assert!(tokens.contains(&TokenKind::While));
        assert!(tokens.contains(&TokenKind::Write));
    }

    #[test]
    fn line_and_column_tracking() {
        let tokens = Lexer::tokenize("int a\n= 5;");
        let eq_token = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Assignment)
            .expect("assignment token");
        assert_eq!(eq_token.span.start_line, 2);
        assert_eq!(eq_token.span.start_col, 0);
    }
}
