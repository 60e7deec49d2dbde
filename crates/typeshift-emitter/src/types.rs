//! Type-annotation emission: the typed-declaration sub-grammar.

use typeshift_parser::node::NodeIndex;
use typeshift_parser::token::Token;

use crate::expressions::is_valid_ident;
use crate::printer::Printer;

impl<'a> Printer<'a> {
    pub(crate) fn emit_type(&mut self, idx: NodeIndex) {
        debug_assert!(
            self.arena.token(idx).is_declared_type(),
            "emit_type called on non-type token {:?}",
            self.arena.token(idx)
        );
        match self.arena.token(idx) {
            Token::AnyType => self.write("any"),
            Token::BooleanType => self.write("boolean"),
            Token::NumberType => self.write("number"),
            Token::StringType => self.write("string"),
            Token::VoidType => self.write("void"),
            Token::UndefinedType => self.write("undefined"),
            Token::Null => self.write("null"),
            Token::NamedType => {
                let name = self.arena.string(idx).to_string();
                self.write(&name);
            }
            Token::ParameterizedType => {
                let children = self.arena.children(idx).to_vec();
                self.emit_type(children[0]);
                self.write("<");
                for (i, &arg) in children[1..].iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_type(arg);
                }
                self.write(">");
            }
            Token::ArrayType => {
                let element = self.arena.children(idx)[0];
                if matches!(
                    self.arena.token(element),
                    Token::UnionType | Token::FunctionType
                ) {
                    self.write("(");
                    self.emit_type(element);
                    self.write(")");
                } else {
                    self.emit_type(element);
                }
                self.write("[]");
            }
            Token::RecordType => {
                let fields = self.arena.children(idx).to_vec();
                self.write("{");
                for (i, &field) in fields.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    let key = self.arena.string(field).to_string();
                    if is_valid_ident(&key) {
                        self.write(&key);
                    } else {
                        self.write("'");
                        self.write(&key);
                        self.write("'");
                    }
                    // An untyped record field has no colon.
                    if let Some(&ty) = self.arena.children(field).first() {
                        self.write(": ");
                        self.emit_type(ty);
                    }
                }
                self.write("}");
            }
            Token::FunctionType => {
                let children = self.arena.children(idx).to_vec();
                self.write("(");
                for (i, &param) in children[1..].iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_param(param);
                }
                self.write(") => ");
                self.emit_type(children[0]);
            }
            Token::UnionType => {
                let members = self.arena.children(idx).to_vec();
                for (i, &member) in members.iter().enumerate() {
                    if i > 0 {
                        self.write(" | ");
                    }
                    if self.arena.token(member) == Token::FunctionType {
                        self.write("(");
                        self.emit_type(member);
                        self.write(")");
                    } else {
                        self.emit_type(member);
                    }
                }
            }
            other => {
                tracing::debug!(?other, "no type rule for token; emitting any");
                self.write("any");
            }
        }
    }
}
