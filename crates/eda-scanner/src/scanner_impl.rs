//! Scanner state machine.
//!
//! Produces one token per `scan()` call. Positions are byte offsets into the
//! source text. Template continuations and regular expressions depend on
//! parser context, so the parser asks for them with `re_scan_template_token`
//! and `re_scan_slash_token`.

use crate::syntax_kind::{PUNCTUATION, SyntaxKind, text_to_keyword};

/// Bit flags describing the current token.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenFlags {
    None = 0,
    PrecedingLineBreak = 1 << 0,
    Unterminated = 1 << 1,
    UnicodeEscape = 1 << 2,
    Scientific = 1 << 3,
    HexSpecifier = 1 << 4,
    BinarySpecifier = 1 << 5,
    OctalSpecifier = 1 << 6,
    ContainsSeparator = 1 << 7,
}

/// Saved scanner position for speculative parsing.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    full_start_pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
}

pub struct ScannerState {
    text: String,
    pos: usize,
    full_start_pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
    skip_trivia: bool,
}

impl ScannerState {
    pub fn new(text: String, skip_trivia: bool) -> Self {
        ScannerState {
            text,
            pos: 0,
            full_start_pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::None as u32,
            skip_trivia,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the current token, after leading trivia.
    #[inline]
    pub fn get_token_pos(&self) -> u32 {
        self.token_start as u32
    }

    #[inline]
    pub fn get_token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Start of the current token including leading trivia.
    #[inline]
    pub fn get_token_full_start(&self) -> u32 {
        self.full_start_pos as u32
    }

    /// Cooked value of the current token: identifier name, unescaped string
    /// contents, numeric text without separators, or template chunk.
    #[inline]
    pub fn get_token_value_ref(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn get_token_text(&self) -> &str {
        self.text.get(self.token_start..self.pos).unwrap_or("")
    }

    #[inline]
    pub fn get_token_flags(&self) -> u32 {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags & TokenFlags::PrecedingLineBreak as u32 != 0
    }

    #[inline]
    pub fn is_unterminated(&self) -> bool {
        self.token_flags & TokenFlags::Unterminated as u32 != 0
    }

    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            full_start_pos: self.full_start_pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.full_start_pos = snapshot.full_start_pos;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
    }

    // =========================================================================
    // Character helpers
    // =========================================================================

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.text.as_bytes().get(pos).copied()
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.char_at(self.pos)
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.current_char() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    #[inline]
    fn finish(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.token = kind;
        kind
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Advance to the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start_pos = self.pos;
        self.token_flags = TokenFlags::None as u32;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;

            if self.pos == 0 && self.text.starts_with("#!") {
                self.skip_line_comment();
                if self.skip_trivia {
                    continue;
                }
                return self.finish(SyntaxKind::SingleLineCommentTrivia);
            }

            let Some(ch) = self.current_char() else {
                return self.finish(SyntaxKind::EndOfFileToken);
            };

            match ch {
                '\n' | '\r' | '\u{2028}' | '\u{2029}' => {
                    self.token_flags |= TokenFlags::PrecedingLineBreak as u32;
                    if ch == '\r' && self.byte_at(self.pos + 1) == Some(b'\n') {
                        self.pos += 2;
                    } else {
                        self.pos += ch.len_utf8();
                    }
                    if self.skip_trivia {
                        continue;
                    }
                    return self.finish(SyntaxKind::NewLineTrivia);
                }
                c if is_white_space_single_line(c) => {
                    self.skip_while(is_white_space_single_line);
                    if self.skip_trivia {
                        continue;
                    }
                    return self.finish(SyntaxKind::WhitespaceTrivia);
                }
                '/' if self.byte_at(self.pos + 1) == Some(b'/') => {
                    self.skip_line_comment();
                    if self.skip_trivia {
                        continue;
                    }
                    return self.finish(SyntaxKind::SingleLineCommentTrivia);
                }
                '/' if self.byte_at(self.pos + 1) == Some(b'*') => {
                    self.skip_block_comment();
                    if self.skip_trivia {
                        continue;
                    }
                    return self.finish(SyntaxKind::MultiLineCommentTrivia);
                }
                '"' | '\'' => {
                    let kind = self.scan_string(ch);
                    return self.finish(kind);
                }
                '`' => {
                    self.pos += 1;
                    let kind = self.scan_template_and_set_token(true);
                    return self.finish(kind);
                }
                '0'..='9' => {
                    let kind = self.scan_number();
                    return self.finish(kind);
                }
                '.' if self
                    .byte_at(self.pos + 1)
                    .is_some_and(|b| b.is_ascii_digit()) =>
                {
                    let kind = self.scan_number();
                    return self.finish(kind);
                }
                '#' => {
                    self.pos += 1;
                    if self.current_char().is_some_and(is_identifier_start) {
                        self.scan_identifier_parts();
                        return self.finish(SyntaxKind::PrivateIdentifier);
                    }
                    return self.finish(SyntaxKind::Unknown);
                }
                c if is_identifier_start(c) || self.at_unicode_escape() => {
                    let kind = self.scan_identifier();
                    return self.finish(kind);
                }
                _ => {
                    if let Some(kind) = self.scan_punctuation() {
                        return self.finish(kind);
                    }
                    self.pos += ch.len_utf8();
                    return self.finish(SyntaxKind::Unknown);
                }
            }
        }
    }

    fn skip_line_comment(&mut self) {
        let rest = &self.text.as_bytes()[self.pos..];
        let len = memchr::memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
        self.pos += len;
    }

    fn skip_block_comment(&mut self) {
        let body_start = self.pos + 2;
        let body = self.text.as_bytes().get(body_start..).unwrap_or(&[]);
        let body_len = match memchr::memmem::find(body, b"*/") {
            Some(i) => i,
            None => {
                self.token_flags |= TokenFlags::Unterminated as u32;
                body.len()
            }
        };
        if memchr::memchr2(b'\n', b'\r', &body[..body_len]).is_some() {
            self.token_flags |= TokenFlags::PrecedingLineBreak as u32;
        }
        self.pos = (body_start + body_len + 2).min(self.text.len());
    }

    /// Longest punctuator at the current position.
    fn scan_punctuation(&mut self) -> Option<SyntaxKind> {
        let rest = &self.text.as_bytes()[self.pos..];
        let mut best: Option<(usize, SyntaxKind)> = None;
        for &(text, kind) in PUNCTUATION {
            if !rest.starts_with(text.as_bytes()) {
                continue;
            }
            // `a?.5:b` is a conditional, not an optional chain
            if kind == SyntaxKind::QuestionDotToken
                && rest.get(2).is_some_and(|b| b.is_ascii_digit())
            {
                continue;
            }
            if best.is_none_or(|(len, _)| text.len() > len) {
                best = Some((text.len(), kind));
            }
        }
        let (len, kind) = best?;
        self.pos += len;
        Some(kind)
    }

    fn at_unicode_escape(&self) -> bool {
        self.byte_at(self.pos) == Some(b'\\') && self.byte_at(self.pos + 1) == Some(b'u')
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let had_escape = self.scan_identifier_parts();
        if had_escape {
            return SyntaxKind::Identifier;
        }
        text_to_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier)
    }

    /// Collect identifier characters into `token_value`. Returns true when a
    /// unicode escape was decoded.
    fn scan_identifier_parts(&mut self) -> bool {
        let mut had_escape = false;
        loop {
            match self.current_char() {
                Some(c) if is_identifier_part(c) => {
                    self.token_value.push(c);
                    self.pos += c.len_utf8();
                }
                Some('\\') if self.at_unicode_escape() => {
                    self.pos += 2;
                    match self.scan_unicode_escape() {
                        Some(c) => {
                            self.token_value.push(c);
                            had_escape = true;
                            self.token_flags |= TokenFlags::UnicodeEscape as u32;
                        }
                        None => break,
                    }
                }
                _ => break,
            }
        }
        had_escape
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.current_char() {
                None | Some('\n' | '\r') => {
                    self.token_flags |= TokenFlags::Unterminated as u32;
                    break;
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    self.scan_escape_sequence(&mut value);
                }
                Some(c) => {
                    value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    /// Template chunk after a backtick (`starts_template`) or after the `}`
    /// closing a substitution.
    fn scan_template_and_set_token(&mut self, starts_template: bool) -> SyntaxKind {
        let mut value = String::new();
        let kind = loop {
            match self.current_char() {
                None => {
                    self.token_flags |= TokenFlags::Unterminated as u32;
                    break if starts_template {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                Some('`') => {
                    self.pos += 1;
                    break if starts_template {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                Some('$') if self.byte_at(self.pos + 1) == Some(b'{') => {
                    self.pos += 2;
                    break if starts_template {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                Some('\\') => {
                    self.pos += 1;
                    self.scan_escape_sequence(&mut value);
                }
                Some('\r') => {
                    self.pos += 1;
                    if self.byte_at(self.pos) == Some(b'\n') {
                        self.pos += 1;
                    }
                    value.push('\n');
                }
                Some(c) => {
                    value.push(c);
                    self.pos += c.len_utf8();
                }
            }
        };
        self.token_value = value;
        kind
    }

    /// Rescan a `}` token as the continuation of a template literal.
    pub fn re_scan_template_token(&mut self) -> SyntaxKind {
        self.pos = self.token_start + 1;
        self.token_value.clear();
        let kind = self.scan_template_and_set_token(false);
        self.finish(kind)
    }

    /// Rescan a `/` or `/=` token as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(
            self.token,
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken
        ) {
            return self.token;
        }

        let mut p = self.token_start + 1;
        let mut in_class = false;
        loop {
            let Some(ch) = self.char_at(p) else {
                self.token_flags |= TokenFlags::Unterminated as u32;
                break;
            };
            if is_line_terminator(ch) {
                self.token_flags |= TokenFlags::Unterminated as u32;
                break;
            }
            p += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(next) = self.char_at(p) {
                        if !is_line_terminator(next) {
                            p += next.len_utf8();
                        }
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }

        self.pos = p;
        self.skip_while(is_identifier_part);
        self.token_value = self.get_token_text().to_string();
        self.finish(SyntaxKind::RegularExpressionLiteral)
    }

    /// Decode an escape sequence; `pos` is just past the backslash.
    fn scan_escape_sequence(&mut self, value: &mut String) {
        let Some(ch) = self.current_char() else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => value.push('\n'),
            't' => value.push('\t'),
            'r' => value.push('\r'),
            'b' => value.push('\u{8}'),
            'f' => value.push('\u{c}'),
            'v' => value.push('\u{b}'),
            '0' if !self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit()) => {
                value.push('\0')
            }
            'x' => match self.scan_hex_digits(2, 2) {
                Some(code) => value.extend(char::from_u32(code)),
                None => value.push('x'),
            },
            'u' => {
                if let Some(c) = self.scan_unicode_escape() {
                    value.push(c);
                }
            }
            '\r' => {
                if self.byte_at(self.pos) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => value.push(other),
        }
    }

    /// `\u` has been consumed; read `XXXX` or `{X...}`.
    fn scan_unicode_escape(&mut self) -> Option<char> {
        if self.byte_at(self.pos) == Some(b'{') {
            let snapshot = self.pos;
            self.pos += 1;
            let code = self.scan_hex_digits(1, 6);
            if code.is_some() && self.byte_at(self.pos) == Some(b'}') {
                self.pos += 1;
                return code.and_then(char::from_u32);
            }
            self.pos = snapshot;
            self.token_flags |= TokenFlags::Unterminated as u32;
            return None;
        }
        self.scan_hex_digits(4, 4).and_then(char::from_u32)
    }

    fn scan_hex_digits(&mut self, min: usize, max: usize) -> Option<u32> {
        let mut value = 0u32;
        let mut count = 0;
        while count < max {
            let Some(digit) = self.byte_at(self.pos).and_then(|b| (b as char).to_digit(16)) else {
                break;
            };
            value = value * 16 + digit;
            self.pos += 1;
            count += 1;
        }
        (count >= min).then_some(value)
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let radix_flag = match (self.byte_at(self.pos), self.byte_at(self.pos + 1)) {
            (Some(b'0'), Some(b'x' | b'X')) => Some((TokenFlags::HexSpecifier, 16)),
            (Some(b'0'), Some(b'b' | b'B')) => Some((TokenFlags::BinarySpecifier, 2)),
            (Some(b'0'), Some(b'o' | b'O')) => Some((TokenFlags::OctalSpecifier, 8)),
            _ => None,
        };

        if let Some((flag, radix)) = radix_flag {
            self.token_flags |= flag as u32;
            self.pos += 2;
            self.scan_digits(radix);
        } else {
            self.scan_digits(10);
            if self.byte_at(self.pos) == Some(b'.') {
                self.pos += 1;
                self.scan_digits(10);
            }
            if matches!(self.byte_at(self.pos), Some(b'e' | b'E')) {
                let sign = usize::from(matches!(self.byte_at(self.pos + 1), Some(b'+' | b'-')));
                if self
                    .byte_at(self.pos + 1 + sign)
                    .is_some_and(|b| b.is_ascii_digit())
                {
                    self.token_flags |= TokenFlags::Scientific as u32;
                    self.pos += 1 + sign;
                    self.scan_digits(10);
                }
            }
        }

        let mut kind = SyntaxKind::NumericLiteral;
        if self.byte_at(self.pos) == Some(b'n') {
            self.pos += 1;
            kind = SyntaxKind::BigIntLiteral;
        }

        self.token_value = self.text[start..self.pos].replace('_', "");
        kind
    }

    fn scan_digits(&mut self, radix: u32) {
        while let Some(b) = self.byte_at(self.pos) {
            if b == b'_' {
                self.token_flags |= TokenFlags::ContainsSeparator as u32;
            } else if !(b as char).is_digit(radix) {
                break;
            }
            self.pos += 1;
        }
    }
}

#[inline]
pub fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t' | '\u{b}' | '\u{c}' | '\u{a0}' | '\u{feff}' | '\u{1680}' | '\u{202f}'
            | '\u{205f}' | '\u{3000}'
    ) || ('\u{2000}'..='\u{200a}').contains(&ch)
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '$' || ch == '_' || (!ch.is_ascii() && ch.is_alphabetic())
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch)
        || ch.is_ascii_digit()
        || (!ch.is_ascii() && ch.is_alphanumeric())
        || matches!(ch, '\u{200c}' | '\u{200d}')
}
