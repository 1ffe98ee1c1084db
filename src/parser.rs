//! Low-level text cursor for object path decoding.
//!
//! This module provides the [`crate::parser::Parser`] type, a cursor over a string slice used by
//! the object path codec. It tracks a byte position that always sits on a character boundary,
//! offers bounds-checked single character access and the few token readers the path grammar
//! needs: identifiers delimited by a character set, and double-quoted strings with backslash
//! escapes.
//!
//! # Examples
//!
//! ```rust
//! use cimscope::Parser;
//!
//! let mut parser = Parser::new(r#"Name="a \"b\"""#);
//! let name = parser.read_until(|c| c == '=');
//! parser.expect('=')?;
//! let value = parser.read_quoted_string()?;
//!
//! assert_eq!(name, "Name");
//! assert_eq!(value, r#"a "b""#);
//! assert!(!parser.has_more_data());
//! # Ok::<(), cimscope::Error>(())
//! ```

use crate::Result;

/// A cursor-based text parser.
///
/// Errors produced by the readers are [`crate::Error::MalformedPath`] and name the position
/// within the input at which parsing failed.
pub struct Parser<'a> {
    /// The text being parsed
    data: &'a str,
    /// Current byte position within the text, always on a char boundary
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::parser::Parser`] over a string slice.
    ///
    /// # Arguments
    /// * `data` - The text to read from
    #[must_use]
    pub fn new(data: &'a str) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more text available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current byte position of the parser.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// The unparsed remainder of the text.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.data[self.position..]
    }

    /// Peek at the current character without advancing.
    #[must_use]
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Returns `true` if the remainder starts with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.remaining().starts_with(prefix)
    }

    /// Move the position forward by one character.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedPath`] if the text is exhausted.
    pub fn advance(&mut self) -> Result<char> {
        match self.peek_char() {
            Some(c) => {
                self.position += c.len_utf8();
                Ok(c)
            }
            None => Err(malformed_path!(
                "unexpected end of input at offset {}",
                self.position
            )),
        }
    }

    /// Move the position forward over `prefix` if the remainder starts with it.
    ///
    /// Returns `true` if the prefix was consumed.
    pub fn eat_str(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.position += prefix.len();
            true
        } else {
            false
        }
    }

    /// Consume `expected` if it is the current character.
    ///
    /// Returns `true` if the character was consumed.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume `expected`, failing if a different character (or nothing) follows.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedPath`] if the current character is not `expected`.
    pub fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            return Ok(());
        }

        match self.peek_char() {
            Some(found) => Err(malformed_path!(
                "expected '{}' at offset {}, found '{}'",
                expected,
                self.position,
                found
            )),
            None => Err(malformed_path!(
                "expected '{}' at offset {}, found end of input",
                expected,
                self.position
            )),
        }
    }

    /// Read up to, not including, the first character matching `stop`.
    ///
    /// Reads to the end of the text if no character matches. Never fails, the result may be
    /// empty.
    pub fn read_until<F>(&mut self, stop: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let rest = self.remaining();
        let end = rest.find(stop).unwrap_or(rest.len());
        self.position += end;
        &rest[..end]
    }

    /// Read a double-quoted string, resolving backslash escapes.
    ///
    /// A backslash makes the following character literal, so `\"` yields `"` and `\\` yields
    /// `\`.
    ///
    /// # Errors
    /// Returns [`crate::Error::MalformedPath`] if no opening quote is present or the string is
    /// not terminated.
    pub fn read_quoted_string(&mut self) -> Result<String> {
        let start = self.position;
        self.expect('"')?;

        let mut value = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.position += 1;
                    return Ok(value);
                }
                Some('\\') => {
                    self.position += 1;
                    match self.peek_char() {
                        Some(escaped) => {
                            self.position += escaped.len_utf8();
                            value.push(escaped);
                        }
                        None => break,
                    }
                }
                Some(c) => {
                    self.position += c.len_utf8();
                    value.push(c);
                }
                None => break,
            }
        }

        Err(malformed_path!(
            "unterminated string starting at offset {}",
            start
        ))
    }
}
