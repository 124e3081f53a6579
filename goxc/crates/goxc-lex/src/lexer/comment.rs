//! Whitespace and comment skipping.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace, `//` line comments, and `/* ... */` block
    /// comments. Newlines advance the cursor's line counter.
    ///
    /// An unterminated block comment is reported at the line it opened on
    /// and consumes the rest of the input.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '/' => match self.cursor.peek_next() {
                    '/' => self.skip_line_comment(),
                    '*' => self.skip_block_comment(),
                    _ => return,
                },
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        let open_line = self.cursor.line();
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'

        while !self.cursor.is_at_end() {
            if self.cursor.current_char() == '*' && self.cursor.peek_next() == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return;
            }
            self.cursor.advance();
        }

        self.handler
            .error_at(open_line, "unterminated multi-line comment");
    }
}
