//! Recursive-descent parser for the annotated-JavaScript subset.
//!
//! The parser produces the arena tree the passes transform. Doc blocks
//! immediately preceding a statement or class member are parsed into
//! `DocInfo` on that node and consumed; all other comments land in the
//! comment registry keyed by the following statement, for verbatim
//! re-emission.

use typeshift_common::Diagnostic;

use crate::jsdoc;
use crate::node::{CommentRegistry, DocInfo, NodeArena, NodeIndex, NodeProps};
use crate::scanner::{Lexed, RawToken, Scanner};
use crate::token::Token;

/// Doc info and comment text collected ahead of a statement, captured
/// before any sub-structure is parsed so nested statements cannot claim it.
#[derive(Default)]
struct Pending {
    doc: Option<DocInfo>,
    comments: Option<String>,
}

pub struct ParserState<'a> {
    file: String,
    source: &'a str,
    scanner: Scanner<'a>,
    pub arena: NodeArena,
    pub comments: CommentRegistry,
    /// Set when any doc block in the file carries `@externs`.
    pub is_externs: bool,
    pending_doc: Option<DocInfo>,
    comment_buffer: Vec<String>,
}

impl<'a> ParserState<'a> {
    pub fn new(file: impl Into<String>, source: &'a str) -> Self {
        ParserState {
            file: file.into(),
            source,
            scanner: Scanner::new(source),
            arena: NodeArena::new(),
            comments: CommentRegistry::new(),
            is_externs: false,
            pending_doc: None,
            comment_buffer: Vec::new(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Parse the whole source into a `Script` node.
    ///
    /// When the top level contains import or export syntax, the statements
    /// are wrapped in a `ModuleBody` child.
    pub fn parse_script(&mut self) -> Result<NodeIndex, Diagnostic> {
        let mut stmts = Vec::new();
        loop {
            self.collect_leading_comments()?;
            if matches!(self.scanner.peek().token, RawToken::Eof) {
                break;
            }
            if let Some(stmt) = self.parse_statement()? {
                stmts.push(stmt);
            }
        }

        let is_module = stmts.iter().any(|&s| {
            self.arena.token(s) == Token::Import
                || self.arena.get(s).props.contains(NodeProps::EXPORT)
        });

        let script = self.arena.alloc(Token::Script);
        if is_module {
            let body = self.arena.alloc_with_children(Token::ModuleBody, stmts);
            self.arena.get_mut(script).children.push(body);
        } else {
            self.arena.get_mut(script).children = stmts;
        }
        Ok(script)
    }

    // ==================== Statements ====================

    fn parse_statement(&mut self) -> Result<Option<NodeIndex>, Diagnostic> {
        self.collect_leading_comments()?;
        let pending = self.take_pending();
        let parsed = self.parse_statement_inner()?;
        match parsed {
            Some(idx) => self.apply_pending(idx, pending),
            None => self.restore_pending(pending),
        }
        Ok(parsed)
    }

    fn parse_statement_inner(&mut self) -> Result<Option<NodeIndex>, Diagnostic> {
        let lexed = self.scanner.peek().clone();
        match &lexed.token {
            RawToken::Eof => Ok(None),
            RawToken::Punct(";") => {
                self.scanner.bump();
                Ok(None)
            }
            RawToken::Punct("{") => Ok(Some(self.parse_block()?)),
            RawToken::Ident(word) => match word.as_str() {
                "var" => self.parse_binding(Token::Var).map(Some),
                "let" => self.parse_binding(Token::Let).map(Some),
                "const" => self.parse_binding(Token::Const).map(Some),
                "function" => {
                    self.scanner.bump();
                    self.parse_function_tail(lexed.pos).map(Some)
                }
                "class" => {
                    self.scanner.bump();
                    self.parse_class_tail(lexed.pos).map(Some)
                }
                "return" => self.parse_return().map(Some),
                "if" => self.parse_if().map(Some),
                "while" => self.parse_while().map(Some),
                "import" => self.parse_import().map(Some),
                "export" => {
                    self.scanner.bump();
                    match self.parse_statement_inner()? {
                        Some(inner) => {
                            self.arena.get_mut(inner).props.insert(NodeProps::EXPORT);
                            Ok(Some(inner))
                        }
                        None => Err(self.error_at(&lexed, "expected declaration after 'export'")),
                    }
                }
                _ => self.parse_expression_statement().map(Some),
            },
            _ => self.parse_expression_statement().map(Some),
        }
    }

    fn parse_binding(&mut self, kind: Token) -> Result<NodeIndex, Diagnostic> {
        let start = self.scanner.bump();
        let mut names = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let name_node = self.arena.alloc_string(Token::Name, name);
            if self.eat_punct("=") {
                let init = self.parse_assign()?;
                self.arena.get_mut(name_node).children.push(init);
            }
            names.push(name_node);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_semi()?;
        let node = self.arena.alloc_with_children(kind, names);
        self.arena.get_mut(node).pos = start.pos;
        Ok(node)
    }

    /// Parse a function after the `function` keyword has been consumed.
    fn parse_function_tail(&mut self, pos: u32) -> Result<NodeIndex, Diagnostic> {
        let name = match &self.scanner.peek().token {
            RawToken::Ident(word) => {
                let word = word.clone();
                self.scanner.bump();
                word
            }
            _ => String::new(),
        };
        let name_node = self.arena.alloc_string(Token::Name, name);
        let params = self.parse_param_list()?;
        let body = self.parse_block()?;
        let func = self
            .arena
            .alloc_with_children(Token::Function, vec![name_node, params, body]);
        self.arena.get_mut(func).pos = pos;
        Ok(func)
    }

    fn parse_param_list(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.expect_punct("(")?;
        let mut params = Vec::new();
        while !self.peek_punct(")") {
            if self.eat_punct("...") {
                let name = self.expect_ident()?;
                params.push(self.arena.alloc_string(Token::Rest, name));
            } else {
                let name = self.expect_ident()?;
                params.push(self.arena.alloc_string(Token::Name, name));
            }
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(self.arena.alloc_with_children(Token::ParamList, params))
    }

    /// Parse a class after the `class` keyword has been consumed.
    fn parse_class_tail(&mut self, pos: u32) -> Result<NodeIndex, Diagnostic> {
        let name = match &self.scanner.peek().token {
            RawToken::Ident(word) if word != "extends" => {
                let word = word.clone();
                self.scanner.bump();
                word
            }
            _ => String::new(),
        };
        let name_node = self.arena.alloc_string(Token::Name, name);

        let heritage = if self.eat_ident("extends") {
            self.parse_postfix()?
        } else {
            self.arena.alloc(Token::Empty)
        };

        self.expect_punct("{")?;
        let mut members = Vec::new();
        loop {
            self.collect_leading_comments()?;
            if self.peek_punct("}") {
                break;
            }
            if self.eat_punct(";") {
                continue;
            }
            let pending = self.take_pending();
            let member = self.parse_class_member()?;
            self.apply_pending(member, pending);
            members.push(member);
        }
        self.expect_punct("}")?;

        let body = self.arena.alloc_with_children(Token::Block, members);
        let class = self
            .arena
            .alloc_with_children(Token::Class, vec![name_node, heritage, body]);
        self.arena.get_mut(class).pos = pos;
        Ok(class)
    }

    fn parse_class_member(&mut self) -> Result<NodeIndex, Diagnostic> {
        let mut is_static = false;
        let mut name = self.expect_ident()?;
        if name == "static" && matches!(self.scanner.peek().token, RawToken::Ident(_)) {
            is_static = true;
            name = self.expect_ident()?;
        }

        let member = if self.peek_punct("(") {
            let name_node = self.arena.alloc_string(Token::Name, "");
            let params = self.parse_param_list()?;
            let body = self.parse_block()?;
            let func = self
                .arena
                .alloc_with_children(Token::Function, vec![name_node, params, body]);
            let member = self
                .arena
                .alloc_with_children(Token::MemberFunctionDef, vec![func]);
            self.arena.get_mut(member).string = Some(name);
            member
        } else {
            let member = self.arena.alloc_string(Token::MemberVariableDef, name);
            if self.eat_punct("=") {
                let init = self.parse_assign()?;
                self.arena.get_mut(member).children.push(init);
            }
            self.expect_semi()?;
            member
        };

        if is_static {
            self.arena.get_mut(member).props.insert(NodeProps::STATIC);
        }
        Ok(member)
    }

    fn parse_return(&mut self) -> Result<NodeIndex, Diagnostic> {
        let start = self.scanner.bump();
        let node = self.arena.alloc(Token::Return);
        self.arena.get_mut(node).pos = start.pos;
        if !self.peek_punct(";") && !self.peek_punct("}") {
            let expr = self.parse_expression()?;
            self.arena.get_mut(node).children.push(expr);
        }
        self.expect_semi()?;
        Ok(node)
    }

    fn parse_if(&mut self) -> Result<NodeIndex, Diagnostic> {
        let start = self.scanner.bump();
        self.expect_punct("(")?;
        let cond = self.parse_expression()?;
        self.expect_punct(")")?;
        let then = self.parse_block_or_statement()?;
        let mut children = vec![cond, then];
        if self.eat_ident("else") {
            children.push(self.parse_block_or_statement()?);
        }
        let node = self.arena.alloc_with_children(Token::If, children);
        self.arena.get_mut(node).pos = start.pos;
        Ok(node)
    }

    fn parse_while(&mut self) -> Result<NodeIndex, Diagnostic> {
        let start = self.scanner.bump();
        self.expect_punct("(")?;
        let cond = self.parse_expression()?;
        self.expect_punct(")")?;
        let body = self.parse_block_or_statement()?;
        let node = self.arena.alloc_with_children(Token::While, vec![cond, body]);
        self.arena.get_mut(node).pos = start.pos;
        Ok(node)
    }

    fn parse_block_or_statement(&mut self) -> Result<NodeIndex, Diagnostic> {
        if self.peek_punct("{") {
            self.parse_block()
        } else {
            match self.parse_statement()? {
                Some(stmt) => Ok(stmt),
                None => Ok(self.arena.alloc(Token::Empty)),
            }
        }
    }

    fn parse_block(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.expect_punct("{")?;
        let mut stmts = Vec::new();
        loop {
            self.collect_leading_comments()?;
            if self.peek_punct("}") || matches!(self.scanner.peek().token, RawToken::Eof) {
                break;
            }
            if let Some(stmt) = self.parse_statement()? {
                stmts.push(stmt);
            }
        }
        self.expect_punct("}")?;
        Ok(self.arena.alloc_with_children(Token::Block, stmts))
    }

    fn parse_import(&mut self) -> Result<NodeIndex, Diagnostic> {
        let start = self.scanner.bump();
        self.expect_punct("{")?;
        let mut specs = Vec::new();
        while !self.peek_punct("}") {
            let local = self.expect_ident()?;
            let local_node = self.arena.alloc_string(Token::Name, local);
            let mut children = vec![local_node];
            if self.eat_ident("as") {
                let alias = self.expect_ident()?;
                children.push(self.arena.alloc_string(Token::Name, alias));
            }
            specs.push(self.arena.alloc_with_children(Token::ImportSpec, children));
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct("}")?;
        if !self.eat_ident("from") {
            let lexed = self.scanner.peek().clone();
            return Err(self.error_at(&lexed, "expected 'from' in import statement"));
        }
        let module = match self.scanner.bump() {
            Lexed {
                token: RawToken::Str { value, double },
                ..
            } => {
                let node = self.arena.alloc_string(Token::String, value);
                if double {
                    self.arena
                        .get_mut(node)
                        .props
                        .insert(NodeProps::DOUBLE_QUOTED);
                }
                node
            }
            other => return Err(self.error_at(&other, "expected module specifier string")),
        };
        self.expect_semi()?;

        let default_slot = self.arena.alloc(Token::Empty);
        let spec_list = self.arena.alloc_with_children(Token::ImportSpecs, specs);
        let node = self
            .arena
            .alloc_with_children(Token::Import, vec![default_slot, spec_list, module]);
        self.arena.get_mut(node).pos = start.pos;
        Ok(node)
    }

    fn parse_expression_statement(&mut self) -> Result<NodeIndex, Diagnostic> {
        let expr = self.parse_expression()?;
        self.expect_semi()?;
        Ok(self.arena.alloc_with_children(Token::ExprResult, vec![expr]))
    }

    // ==================== Expressions ====================

    fn parse_expression(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.parse_assign()
    }

    fn parse_assign(&mut self) -> Result<NodeIndex, Diagnostic> {
        let lhs = self.parse_or()?;
        if self.eat_punct("=") {
            let rhs = self.parse_assign()?;
            return Ok(self.arena.alloc_with_children(Token::Assign, vec![lhs, rhs]));
        }
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.parse_binary_level(&["||"], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.parse_binary_level(&["&&"], Self::parse_equality)
    }

    fn parse_equality(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.parse_binary_level(&["===", "!==", "==", "!="], Self::parse_relational)
    }

    fn parse_relational(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.parse_binary_level(&["<=", ">=", "<", ">"], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.parse_binary_level(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.parse_binary_level(&["*", "/"], Self::parse_unary)
    }

    fn parse_binary_level(
        &mut self,
        ops: &[&'static str],
        next: fn(&mut Self) -> Result<NodeIndex, Diagnostic>,
    ) -> Result<NodeIndex, Diagnostic> {
        let mut lhs = next(self)?;
        loop {
            let op = match &self.scanner.peek().token {
                RawToken::Punct(p) if ops.contains(p) => *p,
                _ => break,
            };
            self.scanner.bump();
            let rhs = next(self)?;
            let node = self.arena.alloc_with_children(Token::Binary, vec![lhs, rhs]);
            self.arena.get_mut(node).string = Some(op.to_string());
            lhs = node;
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<NodeIndex, Diagnostic> {
        let lexed = self.scanner.peek().clone();
        match &lexed.token {
            RawToken::Punct("!") => {
                self.scanner.bump();
                let inner = self.parse_unary()?;
                Ok(self.arena.alloc_with_children(Token::Not, vec![inner]))
            }
            RawToken::Punct("-") => {
                self.scanner.bump();
                let inner = self.parse_unary()?;
                Ok(self.arena.alloc_with_children(Token::Neg, vec![inner]))
            }
            RawToken::Ident(word) if word == "typeof" => {
                self.scanner.bump();
                let inner = self.parse_unary()?;
                Ok(self.arena.alloc_with_children(Token::TypeOf, vec![inner]))
            }
            RawToken::Ident(word) if word == "new" => self.parse_new(),
            _ => self.parse_postfix(),
        }
    }

    fn parse_new(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.scanner.bump();
        let mut callee = self.parse_primary()?;
        while self.eat_punct(".") {
            let prop = self.expect_ident()?;
            let node = self.arena.alloc_with_children(Token::GetProp, vec![callee]);
            self.arena.get_mut(node).string = Some(prop);
            callee = node;
        }
        let mut children = vec![callee];
        if self.eat_punct("(") {
            while !self.peek_punct(")") {
                children.push(self.parse_assign()?);
                if !self.eat_punct(",") {
                    break;
                }
            }
            self.expect_punct(")")?;
        }
        Ok(self.arena.alloc_with_children(Token::New, children))
    }

    fn parse_postfix(&mut self) -> Result<NodeIndex, Diagnostic> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat_punct(".") {
                let prop = self.expect_ident()?;
                let node = self.arena.alloc_with_children(Token::GetProp, vec![expr]);
                self.arena.get_mut(node).string = Some(prop);
                expr = node;
            } else if self.eat_punct("[") {
                let index = self.parse_expression()?;
                self.expect_punct("]")?;
                expr = self
                    .arena
                    .alloc_with_children(Token::GetElem, vec![expr, index]);
            } else if self.eat_punct("(") {
                let mut children = vec![expr];
                while !self.peek_punct(")") {
                    children.push(self.parse_assign()?);
                    if !self.eat_punct(",") {
                        break;
                    }
                }
                self.expect_punct(")")?;
                expr = self.arena.alloc_with_children(Token::Call, children);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<NodeIndex, Diagnostic> {
        let lexed = self.scanner.peek().clone();

        // A doc block in expression position followed by a parenthesized
        // expression is a cast.
        let interior = self.scanner.take_comments();
        let mut cast_doc: Option<DocInfo> = None;
        for range in &interior {
            if range.is_jsdoc(self.source) {
                let doc = jsdoc::parse(range.get_text(self.source), &self.file, &mut self.arena)?;
                if doc.is_externs {
                    self.is_externs = true;
                }
                if doc.ty.is_some() {
                    cast_doc = Some(doc);
                }
            }
        }
        if let Some(doc) = cast_doc {
            if lexed.token.is_punct("(") {
                self.scanner.bump();
                let inner = self.parse_expression()?;
                self.expect_punct(")")?;
                let cast = self.arena.alloc_with_children(Token::Cast, vec![inner]);
                self.arena.get_mut(cast).doc = Some(doc);
                return Ok(cast);
            }
        }

        match lexed.token.clone() {
            RawToken::Number(text) => {
                self.scanner.bump();
                Ok(self.arena.alloc_string(Token::Number, text))
            }
            RawToken::Str { value, double } => {
                self.scanner.bump();
                let node = self.arena.alloc_string(Token::String, value);
                if double {
                    self.arena
                        .get_mut(node)
                        .props
                        .insert(NodeProps::DOUBLE_QUOTED);
                }
                Ok(node)
            }
            RawToken::Punct("(") => {
                self.scanner.bump();
                let inner = self.parse_expression()?;
                self.expect_punct(")")?;
                Ok(inner)
            }
            RawToken::Punct("[") => {
                self.scanner.bump();
                let mut elements = Vec::new();
                while !self.peek_punct("]") {
                    elements.push(self.parse_assign()?);
                    if !self.eat_punct(",") {
                        break;
                    }
                }
                self.expect_punct("]")?;
                Ok(self.arena.alloc_with_children(Token::ArrayLit, elements))
            }
            RawToken::Punct("{") => self.parse_object_literal(),
            RawToken::Ident(word) => match word.as_str() {
                "true" => {
                    self.scanner.bump();
                    Ok(self.arena.alloc(Token::True))
                }
                "false" => {
                    self.scanner.bump();
                    Ok(self.arena.alloc(Token::False))
                }
                "null" => {
                    self.scanner.bump();
                    Ok(self.arena.alloc(Token::Null))
                }
                "this" => {
                    self.scanner.bump();
                    Ok(self.arena.alloc(Token::This))
                }
                "function" => {
                    self.scanner.bump();
                    self.parse_function_tail(lexed.pos)
                }
                "class" => {
                    self.scanner.bump();
                    self.parse_class_tail(lexed.pos)
                }
                _ => {
                    self.scanner.bump();
                    Ok(self.arena.alloc_string(Token::Name, word))
                }
            },
            _ => Err(self.error_at(&lexed, "expected expression")),
        }
    }

    fn parse_object_literal(&mut self) -> Result<NodeIndex, Diagnostic> {
        self.expect_punct("{")?;
        let mut entries = Vec::new();
        while !self.peek_punct("}") {
            let key = match self.scanner.bump() {
                Lexed {
                    token: RawToken::Ident(word),
                    ..
                } => word,
                Lexed {
                    token: RawToken::Str { value, .. },
                    ..
                } => value,
                Lexed {
                    token: RawToken::Number(text),
                    ..
                } => text,
                other => return Err(self.error_at(&other, "expected object key")),
            };
            let entry = self.arena.alloc_string(Token::StringKey, key);
            if self.eat_punct(":") {
                let value = self.parse_assign()?;
                self.arena.get_mut(entry).children.push(value);
            }
            entries.push(entry);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct("}")?;
        Ok(self.arena.alloc_with_children(Token::ObjectLit, entries))
    }

    // ==================== Comments & doc info ====================

    /// Drain comments pending before the next token. The last doc block
    /// becomes the pending doc for the upcoming statement; other comments
    /// are buffered for the registry.
    fn collect_leading_comments(&mut self) -> Result<(), Diagnostic> {
        self.scanner.peek();
        let ranges = self.scanner.take_comments();
        if ranges.is_empty() {
            return Ok(());
        }
        let last = ranges.len() - 1;
        for (i, range) in ranges.iter().enumerate() {
            let text = range.get_text(self.source);
            if range.is_jsdoc(self.source) {
                let doc = jsdoc::parse(text, &self.file, &mut self.arena)?;
                if doc.is_externs {
                    self.is_externs = true;
                }
                if i == last {
                    self.pending_doc = Some(doc);
                }
                // Earlier doc blocks (file overviews) are consumed.
            } else {
                self.comment_buffer.push(text.to_string());
            }
        }
        Ok(())
    }

    fn take_pending(&mut self) -> Pending {
        let comments = if self.comment_buffer.is_empty() {
            None
        } else {
            let text = self.comment_buffer.join("\n");
            self.comment_buffer.clear();
            Some(text)
        };
        Pending {
            doc: self.pending_doc.take(),
            comments,
        }
    }

    fn apply_pending(&mut self, idx: NodeIndex, pending: Pending) {
        if let Some(text) = pending.comments {
            self.comments.attach(idx, text);
        }
        if let Some(doc) = pending.doc {
            if self.arena.get(idx).doc.is_none() {
                self.arena.get_mut(idx).doc = Some(doc);
            }
        }
    }

    /// Put captured pending state back (the "statement" was a stray `;`).
    fn restore_pending(&mut self, pending: Pending) {
        if let Some(text) = pending.comments {
            self.comment_buffer.insert(0, text);
        }
        if self.pending_doc.is_none() {
            self.pending_doc = pending.doc;
        }
    }

    // ==================== Token helpers ====================

    fn peek_punct(&mut self, p: &str) -> bool {
        self.scanner.peek().token.is_punct(p)
    }

    fn eat_punct(&mut self, p: &str) -> bool {
        if self.peek_punct(p) {
            self.scanner.bump();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, p: &str) -> Result<(), Diagnostic> {
        if self.eat_punct(p) {
            Ok(())
        } else {
            let lexed = self.scanner.peek().clone();
            Err(self.error_at(&lexed, format!("expected '{p}'")))
        }
    }

    fn eat_ident(&mut self, word: &str) -> bool {
        if self.scanner.peek().token.is_ident(word) {
            self.scanner.bump();
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Result<String, Diagnostic> {
        match self.scanner.bump() {
            Lexed {
                token: RawToken::Ident(word),
                ..
            } => Ok(word),
            other => Err(self.error_at(&other, "expected identifier")),
        }
    }

    /// Consume a statement-terminating semicolon; tolerate its absence at a
    /// block or file boundary.
    fn expect_semi(&mut self) -> Result<(), Diagnostic> {
        if self.eat_punct(";") {
            return Ok(());
        }
        let lexed = self.scanner.peek().clone();
        if matches!(lexed.token, RawToken::Eof) || lexed.token.is_punct("}") {
            return Ok(());
        }
        Err(self.error_at(&lexed, "expected ';'"))
    }

    fn error_at(&self, lexed: &Lexed, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(&self.file, lexed.pos, lexed.end, message)
    }
}
