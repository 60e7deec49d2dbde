//! Statement and declaration emission.

use typeshift_parser::node::{NodeIndex, NodeProps, Visibility};
use typeshift_parser::token::Token;

use crate::printer::Printer;

impl<'a> Printer<'a> {
    pub(crate) fn emit_statement(&mut self, idx: NodeIndex) {
        self.emit_leading_comment(idx);
        match self.arena.token(idx) {
            Token::Var => self.emit_binding(idx, "var"),
            Token::Let => self.emit_binding(idx, "let"),
            Token::Const => self.emit_binding(idx, "const"),
            Token::Function => {
                self.emit_export_prefix(idx);
                self.emit_function_core(idx);
                self.write_line();
            }
            Token::Class => {
                self.emit_export_prefix(idx);
                self.emit_class_core(idx);
                self.write_line();
            }
            Token::Import => self.emit_import(idx),
            Token::Return => {
                self.write("return");
                if let Some(&expr) = self.arena.children(idx).first() {
                    self.write_space();
                    self.emit_expr(expr, 0);
                }
                self.write(";");
                self.write_line();
            }
            Token::ExprResult => {
                let expr = self.arena.children(idx)[0];
                self.emit_expr(expr, 0);
                self.write(";");
                self.write_line();
            }
            Token::If => self.emit_if(idx),
            Token::While => {
                let children = self.arena.children(idx);
                let (cond, body) = (children[0], children[1]);
                self.write("while (");
                self.emit_expr(cond, 0);
                self.write(") ");
                self.emit_branch(body);
                self.write_line();
            }
            Token::Block => {
                self.emit_block(idx);
                self.write_line();
            }
            Token::Empty => {}
            _ => {
                // An expression hoisted to statement position.
                self.emit_expr(idx, 0);
                self.write(";");
                self.write_line();
            }
        }
    }

    fn emit_export_prefix(&mut self, idx: NodeIndex) {
        if self.arena.get(idx).props.contains(NodeProps::EXPORT) {
            self.write("export ");
        }
    }

    fn emit_binding(&mut self, idx: NodeIndex, keyword: &str) {
        self.emit_export_prefix(idx);
        self.write(keyword);
        self.write_space();
        let names = self.arena.children(idx).to_vec();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_declarator(*name);
        }
        self.write(";");
        self.write_line();
    }

    fn emit_declarator(&mut self, name: NodeIndex) {
        self.write(&self.arena.string(name).to_string());
        if let Some(ty) = self.arena.get(name).declared_type {
            self.write(": ");
            self.emit_type(ty);
        }
        if let Some(&init) = self.arena.children(name).first() {
            self.write(" = ");
            self.emit_expr(init, 0);
        }
    }

    fn emit_if(&mut self, idx: NodeIndex) {
        let children = self.arena.children(idx).to_vec();
        self.write("if (");
        self.emit_expr(children[0], 0);
        self.write(") ");
        self.emit_branch(children[1]);
        if let Some(&alt) = children.get(2) {
            self.write(" else ");
            self.emit_branch(alt);
        }
        self.write_line();
    }

    /// An `if`/`while` branch: a block inline, anything else on its own line.
    fn emit_branch(&mut self, idx: NodeIndex) {
        if self.arena.token(idx) == Token::Block {
            self.emit_block(idx);
        } else {
            self.write_line();
            self.writer.increase_indent();
            self.emit_statement(idx);
            self.writer.decrease_indent();
        }
    }

    /// Emit a block without a trailing newline.
    pub(crate) fn emit_block(&mut self, idx: NodeIndex) {
        let stmts = self.arena.children(idx).to_vec();
        if stmts.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.write_line();
        self.writer.increase_indent();
        for stmt in stmts {
            self.emit_statement(stmt);
        }
        self.writer.decrease_indent();
        self.write("}");
    }

    // ==================== Functions ====================

    /// Emit `function name(params): R { … }` without a trailing newline.
    pub(crate) fn emit_function_core(&mut self, idx: NodeIndex) {
        let children = self.arena.children(idx).to_vec();
        let (name, params, body) = (children[0], children[1], children[2]);
        self.write("function");
        let name_text = self.arena.string(name).to_string();
        if !name_text.is_empty() {
            self.write_space();
            self.write(&name_text);
        }
        self.emit_param_list(params);
        if let Some(ret) = self.arena.get(idx).declared_type {
            self.write(": ");
            self.emit_type(ret);
        }
        self.write_space();
        self.emit_block(body);
    }

    pub(crate) fn emit_param_list(&mut self, params: NodeIndex) {
        self.write("(");
        let list = self.arena.children(params).to_vec();
        for (i, param) in list.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_param(*param);
        }
        self.write(")");
    }

    /// A parameter in a function or function-type position.
    pub(crate) fn emit_param(&mut self, param: NodeIndex) {
        let node = self.arena.get(param);
        match node.token {
            Token::Rest => {
                self.write("...");
                self.write(&self.arena.string(param).to_string());
                self.write(": ");
                match self.arena.get(param).declared_type {
                    Some(ty) => self.emit_type(ty),
                    None => self.write("any[]"),
                }
            }
            _ => {
                self.write(&self.arena.string(param).to_string());
                if node.props.contains(NodeProps::OPT_ES6_TYPED) {
                    self.write("?");
                }
                if let Some(ty) = self.arena.get(param).declared_type {
                    self.write(": ");
                    self.emit_type(ty);
                }
            }
        }
    }

    // ==================== Classes ====================

    /// Emit `class Name extends H { … }` without a trailing newline.
    pub(crate) fn emit_class_core(&mut self, idx: NodeIndex) {
        let children = self.arena.children(idx).to_vec();
        let (name, heritage, body) = (children[0], children[1], children[2]);
        self.write("class");
        let name_text = self.arena.string(name).to_string();
        if !name_text.is_empty() {
            self.write_space();
            self.write(&name_text);
        }
        if self.arena.token(heritage) != Token::Empty {
            self.write(" extends ");
            self.emit_expr(heritage, 9);
        }
        self.write_space();

        let members = self.arena.children(body).to_vec();
        if members.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.write_line();
        self.writer.increase_indent();
        for member in members {
            self.emit_class_member(member);
        }
        self.writer.decrease_indent();
        self.write("}");
    }

    fn emit_class_member(&mut self, member: NodeIndex) {
        self.emit_leading_comment(member);
        match self.arena.get(member).access {
            Some(Visibility::Private) => self.write("private "),
            Some(Visibility::Protected) => self.write("protected "),
            _ => {}
        }
        if self.arena.get(member).props.contains(NodeProps::STATIC) {
            self.write("static ");
        }
        let name = self.arena.string(member).to_string();
        match self.arena.token(member) {
            Token::MemberVariableDef => {
                self.write(&name);
                if let Some(ty) = self.arena.get(member).declared_type {
                    self.write(": ");
                    self.emit_type(ty);
                }
                // Post-hook: the base member form drops the initializer.
                if let Some(&init) = self.arena.children(member).first() {
                    self.write(" = ");
                    self.emit_expr(init, 0);
                }
                self.write(";");
                self.write_line();
            }
            Token::MemberFunctionDef => {
                let func = self.arena.children(member)[0];
                let func_children = self.arena.children(func).to_vec();
                self.write(&name);
                self.emit_param_list(func_children[1]);
                if let Some(ret) = self.arena.get(func).declared_type {
                    self.write(": ");
                    self.emit_type(ret);
                }
                self.write_space();
                self.emit_block(func_children[2]);
                self.write_line();
            }
            _ => {}
        }
    }

    // ==================== Imports ====================

    fn emit_import(&mut self, idx: NodeIndex) {
        let children = self.arena.children(idx).to_vec();
        let specs = self.arena.children(children[1]).to_vec();
        self.write("import {");
        for (i, spec) in specs.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            let spec_children = self.arena.children(*spec).to_vec();
            self.write(&self.arena.string(spec_children[0]).to_string());
            if let Some(&alias) = spec_children.get(1) {
                self.write(" as ");
                self.write(&self.arena.string(alias).to_string());
            }
        }
        self.write("} from '");
        self.write(&self.arena.string(children[2]).to_string());
        self.write("';");
        self.write_line();
    }
}
