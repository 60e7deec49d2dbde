//! Doc-comment parsing: tags and the Closure type-expression grammar.
//!
//! A `/** … */` block yields a `DocInfo` whose type expressions are trees in
//! the node arena, built from the doc tokens (`Pipe`, `Bang`, `Qmark`,
//! `Star`, `Lc`, `Ellipsis`, `Equals`, `Function`, `String`, …). The
//! type-annotation pass later converts these trees into the
//! typed-declaration sub-grammar the emitter understands.
//!
//! Unknown tags are ignored (doc blocks contain prose); an expression the
//! grammar does not cover is a hard error for the file.

use typeshift_common::{Diagnostic, comments};

use crate::node::{DocInfo, NodeArena, NodeIndex, Visibility};
use crate::token::Token;

/// Parse the full text of a doc block (including delimiters).
pub fn parse(text: &str, file: &str, arena: &mut NodeArena) -> Result<DocInfo, Diagnostic> {
    let content = comments::jsdoc_content(text);
    let bytes = content.as_bytes();
    let mut info = DocInfo::default();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'@' {
            pos += 1;
            continue;
        }
        pos += 1;
        let tag_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        match &content[tag_start..pos] {
            "type" => {
                if let Some((ty, next)) = parse_braced_type(&content, pos, file, arena)? {
                    info.ty = Some(ty);
                    pos = next;
                }
            }
            "param" => {
                if let Some((ty, next)) = parse_braced_type(&content, pos, file, arena)? {
                    let (name, next) = scan_ident(&content, next);
                    if !name.is_empty() {
                        info.params.insert(name, ty);
                    }
                    pos = next;
                }
            }
            "return" | "returns" => {
                if let Some((ty, next)) = parse_braced_type(&content, pos, file, arena)? {
                    info.return_ty = Some(ty);
                    pos = next;
                }
            }
            "const" => {
                // `@const {T}` declares a type; only the bare form marks
                // constancy for binding promotion.
                if let Some((ty, next)) = parse_braced_type(&content, pos, file, arena)? {
                    info.ty = Some(ty);
                    pos = next;
                } else {
                    info.is_const = true;
                }
            }
            "private" => info.visibility = Some(Visibility::Private),
            "protected" => info.visibility = Some(Visibility::Protected),
            "public" => info.visibility = Some(Visibility::Public),
            "externs" => info.is_externs = true,
            _ => {}
        }
    }

    Ok(info)
}

/// Parse a `{…}` type expression starting at or after `pos`.
///
/// Returns the parsed tree and the index just past the closing brace, or
/// `None` when the tag carries no braced expression.
fn parse_braced_type(
    content: &str,
    pos: usize,
    file: &str,
    arena: &mut NodeArena,
) -> Result<Option<(NodeIndex, usize)>, Diagnostic> {
    let bytes = content.as_bytes();
    let mut start = pos;
    while start < bytes.len() && (bytes[start] == b' ' || bytes[start] == b'\t') {
        start += 1;
    }
    if start >= bytes.len() || bytes[start] != b'{' {
        return Ok(None);
    }

    // Braces nest inside records and never appear unbalanced in the grammar.
    let mut depth = 0;
    let mut end = start;
    while end < bytes.len() {
        match bytes[end] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        end += 1;
    }
    if depth != 0 {
        return Err(Diagnostic::file_error(
            file,
            format!("unterminated type expression in doc comment: {content}"),
        ));
    }

    let inner = &content[start + 1..end];
    let node = TypeExprParser::parse(inner, file, arena)?;
    Ok(Some((node, end + 1)))
}

fn scan_ident(content: &str, pos: usize) -> (String, usize) {
    let bytes = content.as_bytes();
    let mut start = pos;
    while start < bytes.len() && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    let mut end = start;
    while end < bytes.len()
        && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_' || bytes[end] == b'$')
    {
        end += 1;
    }
    (content[start..end].to_string(), end)
}

/// Recursive-descent parser for the Closure type-expression grammar.
struct TypeExprParser<'a, 'b> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    file: &'a str,
    arena: &'b mut NodeArena,
}

impl<'a, 'b> TypeExprParser<'a, 'b> {
    fn parse(text: &'a str, file: &'a str, arena: &'b mut NodeArena) -> Result<NodeIndex, Diagnostic> {
        let mut parser = TypeExprParser {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            file,
            arena,
        };
        let root = parser.parse_root()?;
        parser.skip_ws();
        if parser.pos < parser.bytes.len() {
            return Err(parser.unsupported());
        }
        Ok(root)
    }

    fn parse_root(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.skip_ws();
        if self.eat_str("...") {
            let node = self.arena.alloc(Token::Ellipsis);
            self.skip_ws();
            if self.pos < self.bytes.len() {
                let inner = self.parse_union()?;
                self.arena.get_mut(node).children.push(inner);
            }
            return Ok(node);
        }
        let ty = self.parse_union()?;
        self.skip_ws();
        if self.peek_is(b'=') {
            self.pos += 1;
            let node = self.arena.alloc(Token::Equals);
            self.arena.get_mut(node).children.push(ty);
            return Ok(node);
        }
        Ok(ty)
    }

    fn parse_union(&mut self) -> Result<NodeIndex, Diagnostic> {
        let first = self.parse_prefix()?;
        self.skip_ws();
        if !self.peek_is(b'|') {
            return Ok(first);
        }
        let mut parts = vec![first];
        loop {
            self.skip_ws();
            if !self.peek_is(b'|') {
                break;
            }
            self.pos += 1;
            parts.push(self.parse_prefix()?);
        }
        Ok(self.arena.alloc_with_children(Token::Pipe, parts))
    }

    fn parse_prefix(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.skip_ws();
        match self.peek_byte() {
            Some(b'!') => {
                self.pos += 1;
                let inner = self.parse_prefix()?;
                Ok(self.arena.alloc_with_children(Token::Bang, vec![inner]))
            }
            Some(b'?') => {
                self.pos += 1;
                self.skip_ws();
                if self.at_type_end() {
                    Ok(self.arena.alloc(Token::Qmark))
                } else {
                    let inner = self.parse_prefix()?;
                    Ok(self.arena.alloc_with_children(Token::Qmark, vec![inner]))
                }
            }
            Some(b'*') => {
                self.pos += 1;
                Ok(self.arena.alloc(Token::Star))
            }
            Some(b'(') => {
                self.pos += 1;
                let inner = self.parse_union()?;
                self.expect(b')')?;
                Ok(inner)
            }
            Some(b'{') => self.parse_record(),
            Some(_) => self.parse_named(),
            None => Err(self.unsupported()),
        }
    }

    /// Whether the current position ends a type (used for bare `?`).
    fn at_type_end(&self) -> bool {
        match self.peek_byte() {
            None => true,
            Some(b) => matches!(b, b',' | b'}' | b')' | b'=' | b'|' | b'>'),
        }
    }

    fn parse_record(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.expect(b'{')?;
        let mut fields = Vec::new();
        self.skip_ws();
        while !self.peek_is(b'}') {
            let key = self.parse_record_key()?;
            let field = self.arena.alloc_string(Token::Colon, key);
            self.skip_ws();
            if self.peek_is(b':') {
                self.pos += 1;
                let ty = self.parse_union()?;
                self.arena.get_mut(field).children.push(ty);
            }
            fields.push(field);
            self.skip_ws();
            if self.peek_is(b',') {
                self.pos += 1;
                self.skip_ws();
            } else {
                break;
            }
        }
        self.expect(b'}')?;
        Ok(self.arena.alloc_with_children(Token::Lc, fields))
    }

    /// A record key: identifier, number, or quoted string (quotes stripped).
    fn parse_record_key(&mut self) -> Result<String, Diagnostic> {
        self.skip_ws();
        match self.peek_byte() {
            Some(q @ (b'\'' | b'"')) => {
                self.pos += 1;
                let start = self.pos;
                while self.pos < self.bytes.len() && self.bytes[self.pos] != q {
                    self.pos += 1;
                }
                let key = self.text[start..self.pos].to_string();
                self.expect(q)?;
                Ok(key)
            }
            Some(b) if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' => {
                let start = self.pos;
                while self.pos < self.bytes.len() && is_name_part(self.bytes[self.pos]) {
                    self.pos += 1;
                }
                Ok(self.text[start..self.pos].to_string())
            }
            _ => Err(self.unsupported()),
        }
    }

    fn parse_named(&mut self) -> Result<NodeIndex, Diagnostic> {
        let name = self.scan_dotted_name();
        if name.is_empty() {
            return Err(self.unsupported());
        }
        if name == "function" {
            self.skip_ws();
            if self.peek_is(b'(') {
                return self.parse_function();
            }
        }
        if name == "void" {
            return Ok(self.arena.alloc(Token::Void));
        }

        // Type arguments: `Name<T>` or the legacy `Name.<T>` form.
        if self.eat_generic_open() {
            let mut args = Vec::new();
            loop {
                args.push(self.parse_union()?);
                self.skip_ws();
                if self.peek_is(b',') {
                    self.pos += 1;
                } else {
                    break;
                }
            }
            self.expect(b'>')?;
            let node = self.arena.alloc_string(Token::String, name);
            let block = self.arena.alloc_with_children(Token::Block, args);
            self.arena.get_mut(node).children.push(block);
            return Ok(node);
        }

        Ok(self.arena.alloc_string(Token::String, name))
    }

    fn parse_function(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.expect(b'(')?;
        let mut params = Vec::new();
        self.skip_ws();
        while !self.peek_is(b')') {
            params.push(self.parse_function_param()?);
            self.skip_ws();
            if self.peek_is(b',') {
                self.pos += 1;
                self.skip_ws();
            } else {
                break;
            }
        }
        self.expect(b')')?;
        let param_list = self.arena.alloc_with_children(Token::ParamList, params);
        let mut children = vec![param_list];
        self.skip_ws();
        if self.peek_is(b':') {
            self.pos += 1;
            children.push(self.parse_union()?);
        }
        Ok(self.arena.alloc_with_children(Token::Function, children))
    }

    fn parse_function_param(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.skip_ws();

        // `new:` and `this:` context markers occupy parameter positions.
        let save = self.pos;
        let word = self.scan_word();
        if word == "new" || word == "this" {
            self.skip_ws();
            if self.peek_is(b':') {
                self.pos += 1;
                let ty = self.parse_union()?;
                let tok = if word == "new" { Token::New } else { Token::This };
                return Ok(self.arena.alloc_with_children(tok, vec![ty]));
            }
        }
        self.pos = save;

        if self.eat_str("...") {
            let node = self.arena.alloc(Token::Ellipsis);
            self.skip_ws();
            if !self.peek_is(b')') && !self.peek_is(b',') {
                let inner = self.parse_union()?;
                self.arena.get_mut(node).children.push(inner);
            }
            return Ok(node);
        }

        let ty = self.parse_union()?;
        self.skip_ws();
        if self.peek_is(b'=') {
            self.pos += 1;
            return Ok(self.arena.alloc_with_children(Token::Equals, vec![ty]));
        }
        Ok(ty)
    }

    // ==================== Scanning helpers ====================

    fn scan_dotted_name(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_name_part(self.bytes[self.pos]) {
            self.pos += 1;
        }
        // Dotted segments; stop before the legacy generic marker `.<`.
        while self.pos + 1 < self.bytes.len()
            && self.bytes[self.pos] == b'.'
            && is_name_start(self.bytes[self.pos + 1])
        {
            self.pos += 1;
            while self.pos < self.bytes.len() && is_name_part(self.bytes[self.pos]) {
                self.pos += 1;
            }
        }
        self.text[start..self.pos].to_string()
    }

    fn scan_word(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_name_part(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.text[start..self.pos].to_string()
    }

    fn eat_generic_open(&mut self) -> bool {
        if self.peek_is(b'<') {
            self.pos += 1;
            return true;
        }
        if self.peek_byte() == Some(b'.') && self.bytes.get(self.pos + 1) == Some(&b'<') {
            self.pos += 2;
            return true;
        }
        false
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_is(&self, b: u8) -> bool {
        self.peek_byte() == Some(b)
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.text[self.pos..].starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<(), Diagnostic> {
        self.skip_ws();
        if self.peek_is(b) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unsupported())
        }
    }

    fn unsupported(&self) -> Diagnostic {
        Diagnostic::file_error(
            self.file,
            format!(
                "unsupported type expression '{}' at offset {}",
                self.text, self.pos
            ),
        )
    }
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_name_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
