use thiserror::Error;

use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexerState {
    LineBegin,
    TokenStart,
}

enum StepOutcome {
    Emit(Token),
    Continue,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("indent incorrect at position {position}")]
    IndentIncorrect { position: usize },
    #[error("unterminated string starting at position {position}")]
    UnterminatedString { position: usize },
    #[error("invalid number literal '{literal}' at position {position}")]
    InvalidNumberLiteral { literal: String, position: usize },
}

pub type LexResult<T> = Result<T, LexError>;

/// Streaming tokenizer with indentation framing.
///
/// One indentation level is exactly two spaces. Leading whitespace of each
/// logical line is compared against the current level and the difference is
/// emitted as synthetic `Indent`/`Dedent` tokens, one per `next_token` call.
/// The constructor eagerly produces the first token, so `current_token` is
/// valid from the start.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    indent_level: usize,
    line_has_tokens: bool,
    pending_tokens: Vec<Token>,
    state: LexerState,
    current: Token,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> LexResult<Self> {
        let mut lexer = Self {
            input,
            pos: 0,
            indent_level: 0,
            line_has_tokens: false,
            pending_tokens: Vec::new(),
            state: LexerState::LineBegin,
            current: Token::Eof,
        };
        lexer.current = lexer.read_token()?;
        Ok(lexer)
    }

    /// The most recently produced token. Idempotent.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Advances the stream and returns the new current token.
    ///
    /// After `Eof` has been reached, further calls keep returning `Eof`.
    pub fn next_token(&mut self) -> LexResult<Token> {
        self.current = self.read_token()?;
        Ok(self.current.clone())
    }

    fn read_token(&mut self) -> LexResult<Token> {
        loop {
            if let Some(token) = self.pending_tokens.pop() {
                return Ok(token);
            }

            match self.step_state()? {
                StepOutcome::Emit(token) => return Ok(token),
                StepOutcome::Continue => continue,
            }
        }
    }

    fn step_state(&mut self) -> LexResult<StepOutcome> {
        match self.state {
            LexerState::LineBegin => self.frame_line_start(),
            LexerState::TokenStart => self.scan_token(),
        }
    }

    /// Consumes the leading whitespace of a logical line and queues the
    /// `Indent`/`Dedent` tokens implied by its depth.
    fn frame_line_start(&mut self) -> LexResult<StepOutcome> {
        let line_indent = loop {
            let spaces = self.count_spaces_ahead();
            match self.char_at(self.pos + spaces) {
                Some('\n') => {
                    // Blank line: discard it, no indent change.
                    self.pos += spaces + 1;
                }
                None => {
                    self.pos += spaces;
                    break None;
                }
                Some(_) => {
                    if spaces % 2 == 1 {
                        return Err(LexError::IndentIncorrect {
                            position: self.pos + spaces,
                        });
                    }
                    self.pos += spaces;
                    break Some(spaces / 2);
                }
            }
        };

        self.state = LexerState::TokenStart;
        // End of input closes every open block.
        let level = line_indent.unwrap_or(0);
        if level > self.indent_level {
            for _ in self.indent_level..level {
                self.pending_tokens.push(Token::Indent);
            }
        } else {
            for _ in level..self.indent_level {
                self.pending_tokens.push(Token::Dedent);
            }
        }
        self.indent_level = level;
        Ok(StepOutcome::Continue)
    }

    fn scan_token(&mut self) -> LexResult<StepOutcome> {
        self.skip_spaces();

        let Some(c) = self.peek_char() else {
            // Implicit newline at end of input, then Eof.
            if self.line_has_tokens {
                self.line_has_tokens = false;
                self.state = LexerState::LineBegin;
                return Ok(StepOutcome::Emit(Token::Newline));
            }
            return Ok(StepOutcome::Emit(Token::Eof));
        };

        let start = self.pos;
        let token = match c {
            '\n' => {
                self.consume_char();
                self.state = LexerState::LineBegin;
                if !self.line_has_tokens {
                    // Blank or comment-only line: no Newline token.
                    return Ok(StepOutcome::Continue);
                }
                self.line_has_tokens = false;
                return Ok(StepOutcome::Emit(Token::Newline));
            }
            '#' => {
                // Discard up to, not including, the terminating newline.
                self.consume_while(|c| c != '\n');
                return Ok(StepOutcome::Continue);
            }
            c if c.is_ascii_digit() => self.read_number(start)?,
            '\'' | '"' => self.read_string(c, start)?,
            '=' | '!' | '<' | '>' => {
                if self.char_at(self.pos + 1) == Some('=') {
                    self.pos += 2;
                    match c {
                        '=' => Token::Eq,
                        '!' => Token::NotEq,
                        '<' => Token::LessOrEq,
                        _ => Token::GreaterOrEq,
                    }
                } else if c == '!' {
                    // A lone `!` is not a punctuator; it opens an identifier
                    // run, matching the reference lexer.
                    self.read_identifier()
                } else {
                    self.consume_char();
                    Token::Char(c)
                }
            }
            '+' | '-' | '*' | '/' | '.' | ',' | '(' | ')' | ':' => {
                self.consume_char();
                Token::Char(c)
            }
            _ => self.read_identifier(),
        };

        self.line_has_tokens = true;
        Ok(StepOutcome::Emit(token))
    }

    fn read_number(&mut self, start: usize) -> LexResult<Token> {
        self.consume_while(|c| c.is_ascii_digit());
        let literal = &self.input[start..self.pos];
        let value = literal
            .parse::<i64>()
            .map_err(|_| LexError::InvalidNumberLiteral {
                literal: literal.to_string(),
                position: start,
            })?;
        Ok(Token::Number(value))
    }

    /// Reads a string literal delimited by the quote that opened it.
    ///
    /// `\t` and `\n` escapes are translated; any other escaped character
    /// stands for itself. A newline inside the literal is ordinary content;
    /// only end of input makes the string unterminated.
    fn read_string(&mut self, quote: char, start: usize) -> LexResult<Token> {
        self.consume_char();
        let mut text = String::new();
        loop {
            let Some(c) = self.consume_char() else {
                return Err(LexError::UnterminatedString { position: start });
            };
            if c == quote {
                return Ok(Token::String(text));
            }
            if c == '\\' {
                let Some(escaped) = self.consume_char() else {
                    return Err(LexError::UnterminatedString { position: start });
                };
                match escaped {
                    't' => text.push('\t'),
                    'n' => text.push('\n'),
                    other => text.push(other),
                }
            } else {
                text.push(c);
            }
        }
    }

    /// Reads a maximal identifier run and resolves reserved words.
    ///
    /// The first character is always taken; the run then extends until a
    /// punctuator, space, `#`, newline, or end of input. `-`, `*`, `/` and
    /// quotes do not terminate a run.
    fn read_identifier(&mut self) -> Token {
        let start = self.pos;
        self.consume_char();
        self.consume_while(|c| !is_identifier_stop(c));
        let word = &self.input[start..self.pos];
        Token::keyword(word).unwrap_or_else(|| Token::Id(word.to_string()))
    }

    fn skip_spaces(&mut self) {
        self.consume_while(|c| c == ' ');
    }

    fn count_spaces_ahead(&self) -> usize {
        self.input[self.pos..]
            .chars()
            .take_while(|&c| c == ' ')
            .count()
    }

    fn consume_while<P>(&mut self, keep_predicate: P) -> usize
    where
        P: Fn(char) -> bool,
    {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if !keep_predicate(c) {
                break;
            }
            self.consume_char();
        }
        self.pos - start
    }

    fn char_at(&self, index: usize) -> Option<char> {
        if index >= self.input.len() {
            None
        } else {
            self.input[index..].chars().next()
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.char_at(self.pos)
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}

fn is_identifier_stop(c: char) -> bool {
    matches!(
        c,
        '=' | '.' | ',' | '(' | ')' | '+' | '<' | '>' | '!' | ':' | ' ' | '#' | '\n'
    )
}

/// Tokenizes the whole input, including the final `Eof`.
pub fn tokenize(input: &str) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(input)?;
    let mut tokens = vec![lexer.current_token().clone()];
    while tokens.last() != Some(&Token::Eof) {
        tokens.push(lexer.next_token()?);
    }
    Ok(tokens)
}
