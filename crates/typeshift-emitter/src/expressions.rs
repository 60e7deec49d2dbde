//! Expression emission.
//!
//! `min_prec` is the binding power required by the context; an expression
//! whose own precedence is lower is parenthesized. Casts carry mandatory
//! parens and ignore precedence.

use typeshift_parser::node::{NodeIndex, NodeProps};
use typeshift_parser::token::Token;

use crate::printer::Printer;

const PREC_ASSIGN: u8 = 1;
const PREC_UNARY: u8 = 8;
const PREC_POSTFIX: u8 = 9;

fn binary_prec(op: &str) -> u8 {
    match op {
        "||" => 2,
        "&&" => 3,
        "==" | "!=" | "===" | "!==" => 4,
        "<" | ">" | "<=" | ">=" => 5,
        "+" | "-" => 6,
        _ => 7,
    }
}

impl<'a> Printer<'a> {
    pub(crate) fn emit_expr(&mut self, idx: NodeIndex, min_prec: u8) {
        match self.arena.token(idx) {
            // Pre-hook: casts short-circuit with mandatory parens.
            Token::Cast => {
                let inner = self.arena.children(idx)[0];
                self.write("(");
                self.emit_expr(inner, 0);
                match self.arena.get(idx).declared_type {
                    Some(ty) => {
                        self.write(" as ");
                        self.emit_type(ty);
                    }
                    None => {}
                }
                self.write(")");
            }
            // Synthetic token the base grammar does not know.
            Token::UndefinedType => self.write("undefined"),

            Token::Name => {
                let text = self.arena.string(idx).to_string();
                self.write(&text);
            }
            Token::Number => {
                let text = self.arena.string(idx).to_string();
                self.write(&text);
            }
            Token::String => self.emit_string_literal(idx),
            Token::True => self.write("true"),
            Token::False => self.write("false"),
            Token::Null => self.write("null"),
            Token::This => self.write("this"),

            Token::Assign => self.parenthesized(min_prec, PREC_ASSIGN, |p| {
                let children = p.arena.children(idx).to_vec();
                p.emit_expr(children[0], PREC_POSTFIX);
                p.write(" = ");
                p.emit_expr(children[1], PREC_ASSIGN);
            }),
            Token::Binary => {
                let op = self.arena.string(idx).to_string();
                let prec = binary_prec(&op);
                self.parenthesized(min_prec, prec, |p| {
                    let children = p.arena.children(idx).to_vec();
                    p.emit_expr(children[0], prec);
                    p.write(" ");
                    p.write(&op);
                    p.write(" ");
                    p.emit_expr(children[1], prec + 1);
                });
            }
            Token::Not => self.parenthesized(min_prec, PREC_UNARY, |p| {
                p.write("!");
                p.emit_expr(p.arena.children(idx)[0], PREC_UNARY);
            }),
            Token::Neg => self.parenthesized(min_prec, PREC_UNARY, |p| {
                p.write("-");
                p.emit_expr(p.arena.children(idx)[0], PREC_UNARY);
            }),
            Token::TypeOf => self.parenthesized(min_prec, PREC_UNARY, |p| {
                p.write("typeof ");
                p.emit_expr(p.arena.children(idx)[0], PREC_UNARY);
            }),

            Token::New => {
                let children = self.arena.children(idx).to_vec();
                self.write("new ");
                self.emit_expr(children[0], PREC_POSTFIX + 1);
                if children.len() > 1 {
                    self.write("(");
                    for (i, &arg) in children[1..].iter().enumerate() {
                        if i > 0 {
                            self.write(", ");
                        }
                        self.emit_expr(arg, PREC_ASSIGN);
                    }
                    self.write(")");
                } else {
                    // Post-hook: restore the parens the source omitted.
                    self.write("()");
                }
            }
            Token::Call => {
                let children = self.arena.children(idx).to_vec();
                self.emit_expr(children[0], PREC_POSTFIX);
                self.write("(");
                for (i, &arg) in children[1..].iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(arg, PREC_ASSIGN);
                }
                self.write(")");
            }
            Token::GetProp => {
                let obj = self.arena.children(idx)[0];
                let prop = self.arena.string(idx).to_string();
                self.emit_expr(obj, PREC_POSTFIX);
                self.write(".");
                self.write(&prop);
            }
            Token::GetElem => {
                let children = self.arena.children(idx).to_vec();
                self.emit_expr(children[0], PREC_POSTFIX);
                self.write("[");
                self.emit_expr(children[1], 0);
                self.write("]");
            }

            Token::ArrayLit => {
                let children = self.arena.children(idx).to_vec();
                self.write("[");
                for (i, &element) in children.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(element, PREC_ASSIGN);
                }
                self.write("]");
            }
            Token::ObjectLit => self.emit_object_literal(idx),
            Token::Function => self.emit_function_core(idx),
            Token::Class => self.emit_class_core(idx),

            other => {
                tracing::debug!(?other, "no expression rule for token");
            }
        }
    }

    fn parenthesized(&mut self, min_prec: u8, prec: u8, body: impl FnOnce(&mut Self)) {
        if prec < min_prec {
            self.write("(");
            body(self);
            self.write(")");
        } else {
            body(self);
        }
    }

    fn emit_string_literal(&mut self, idx: NodeIndex) {
        let quote = if self.arena.get(idx).props.contains(NodeProps::DOUBLE_QUOTED) {
            '"'
        } else {
            '\''
        };
        let value = self.arena.string(idx).to_string();
        let mut text = String::with_capacity(value.len() + 2);
        text.push(quote);
        text.push_str(&value);
        text.push(quote);
        self.write(&text);
    }

    fn emit_object_literal(&mut self, idx: NodeIndex) {
        let entries = self.arena.children(idx).to_vec();
        if entries.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        for (i, &entry) in entries.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            let key = self.arena.string(entry).to_string();
            if is_valid_ident(&key) {
                self.write(&key);
            } else {
                self.write("'");
                self.write(&key);
                self.write("'");
            }
            if let Some(&value) = self.arena.children(entry).first() {
                self.write(": ");
                self.emit_expr(value, PREC_ASSIGN);
            }
        }
        self.write("}");
    }
}

pub(crate) fn is_valid_ident(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
