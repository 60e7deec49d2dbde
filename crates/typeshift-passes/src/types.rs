//! Doc-type to typed-declaration conversion.
//!
//! The translation is total over the doc grammar; a token outside the table
//! is a hard error naming the file. Return position changes how `void` and
//! `undefined` lower. Unions flatten recursively, keeping at most one
//! `null` at its first-seen position.

use typeshift_common::Diagnostic;
use typeshift_parser::node::{NodeArena, NodeIndex, NodeProps};
use typeshift_parser::token::Token;

use crate::annotate::AnnotationPass;

impl<'a> AnnotationPass<'a> {
    /// Convert a doc-type tree. `None` means "no annotation".
    pub(crate) fn convert(
        &mut self,
        idx: NodeIndex,
        is_return: bool,
    ) -> Result<Option<NodeIndex>, Diagnostic> {
        match self.arena.token(idx) {
            Token::Empty => Ok(None),
            Token::Star => Ok(Some(self.arena.alloc(Token::AnyType))),
            Token::Void => Ok(Some(self.void_type(is_return))),
            // Non-null is TypeScript's default.
            Token::Bang => match self.arena.children(idx).first().copied() {
                Some(inner) => self.convert(inner, is_return),
                None => Err(self.unsupported(idx)),
            },
            Token::Qmark => self.convert_nullable(idx, is_return),
            Token::String => self.convert_named(idx, is_return),
            Token::Lc => self.convert_record(idx),
            Token::Pipe => {
                let members = self.arena.children(idx).to_vec();
                self.flatten_union(&members, is_return)
            }
            Token::Function => self.convert_function(idx),
            Token::Ellipsis => {
                let element = match self.arena.children(idx).first().copied() {
                    Some(inner) => self.convert(inner, false)?,
                    None => None,
                };
                let element = element.unwrap_or_else(|| self.arena.alloc(Token::AnyType));
                Ok(Some(
                    self.arena.alloc_with_children(Token::ArrayType, vec![element]),
                ))
            }
            // Optional-ness is carried on the parameter, not the type.
            Token::Equals => match self.arena.children(idx).first().copied() {
                Some(inner) => self.convert(inner, is_return),
                None => Ok(None),
            },
            _ => Err(self.unsupported(idx)),
        }
    }

    fn void_type(&mut self, is_return: bool) -> NodeIndex {
        if is_return {
            self.arena.alloc(Token::VoidType)
        } else {
            self.arena.alloc(Token::UndefinedType)
        }
    }

    /// `?T` lowers to `null | T`; a bare `?` is `any`.
    fn convert_nullable(
        &mut self,
        idx: NodeIndex,
        is_return: bool,
    ) -> Result<Option<NodeIndex>, Diagnostic> {
        let Some(inner) = self.arena.children(idx).first().copied() else {
            return Ok(Some(self.arena.alloc(Token::AnyType)));
        };
        let converted = self.convert(inner, is_return)?;
        let null = self.arena.alloc(Token::Null);
        let mut members = vec![null];
        if let Some(c) = converted {
            self.push_union_member(&mut members, c);
        }
        Ok(Some(self.make_union(members)))
    }

    fn convert_named(
        &mut self,
        idx: NodeIndex,
        is_return: bool,
    ) -> Result<Option<NodeIndex>, Diagnostic> {
        let name = self.arena.string(idx).to_string();
        let args = self.arena.children(idx).first().copied();
        match name.as_str() {
            "boolean" => Ok(Some(self.arena.alloc(Token::BooleanType))),
            "number" => Ok(Some(self.arena.alloc(Token::NumberType))),
            "string" => Ok(Some(self.arena.alloc(Token::StringType))),
            "null" => Ok(Some(self.arena.alloc(Token::Null))),
            "undefined" | "void" => Ok(Some(self.void_type(is_return))),
            "Array" if args.is_some() => {
                let args = args.and_then(|block| self.arena.children(block).first().copied());
                let element = match args {
                    Some(first) => self.convert(first, false)?,
                    None => None,
                };
                let element = element.unwrap_or_else(|| self.arena.alloc(Token::AnyType));
                Ok(Some(
                    self.arena.alloc_with_children(Token::ArrayType, vec![element]),
                ))
            }
            _ => {
                let rewritten = self.rewrite_name(&name);
                let base = self.arena.alloc_string(Token::NamedType, rewritten);
                match args {
                    Some(block) => {
                        let mut children = vec![base];
                        for arg in self.arena.children(block).to_vec() {
                            if let Some(converted) = self.convert(arg, false)? {
                                children.push(converted);
                            }
                        }
                        Ok(Some(
                            self.arena
                                .alloc_with_children(Token::ParameterizedType, children),
                        ))
                    }
                    None => Ok(Some(base)),
                }
            }
        }
    }

    fn convert_record(&mut self, idx: NodeIndex) -> Result<Option<NodeIndex>, Diagnostic> {
        let mut fields = Vec::new();
        for field in self.arena.children(idx).to_vec() {
            let key = self.arena.string(field).to_string();
            let key_node = self.arena.alloc_string(Token::StringKey, key);
            if let Some(ty) = self.arena.children(field).first().copied() {
                if let Some(converted) = self.convert(ty, false)? {
                    self.arena.get_mut(key_node).children.push(converted);
                }
            }
            fields.push(key_node);
        }
        Ok(Some(
            self.arena.alloc_with_children(Token::RecordType, fields),
        ))
    }

    /// `function(…): R` with parameters numbered `p1, p2, …`.
    fn convert_function(&mut self, idx: NodeIndex) -> Result<Option<NodeIndex>, Diagnostic> {
        let children = self.arena.children(idx).to_vec();
        let ret = match children.get(1).copied() {
            Some(ret) => self.convert(ret, true)?,
            None => None,
        };
        let ret = ret.unwrap_or_else(|| self.arena.alloc(Token::AnyType));

        let mut converted_params = Vec::new();
        let doc_params = self.arena.children(children[0]).to_vec();
        let mut number = 0;
        for doc_param in doc_params {
            match self.arena.token(doc_param) {
                // Construction and receiver context markers are accepted
                // and discarded.
                Token::New | Token::This => continue,
                Token::Ellipsis => {
                    number += 1;
                    let element = match self.arena.children(doc_param).first().copied() {
                        Some(inner) => self.convert(inner, false)?,
                        None => None,
                    };
                    let element = element.unwrap_or_else(|| self.arena.alloc(Token::AnyType));
                    let array = self
                        .arena
                        .alloc_with_children(Token::ArrayType, vec![element]);
                    let rest = self.arena.alloc_string(Token::Rest, format!("p{number}"));
                    self.arena.get_mut(rest).declared_type = Some(array);
                    converted_params.push(rest);
                }
                Token::Equals => {
                    number += 1;
                    let inner = self.arena.children(doc_param).first().copied();
                    let converted = match inner {
                        Some(t) => self.convert(t, false)?,
                        None => None,
                    };
                    let param = self.arena.alloc_string(Token::Name, format!("p{number}"));
                    self.arena
                        .get_mut(param)
                        .props
                        .insert(NodeProps::OPT_ES6_TYPED);
                    self.arena.get_mut(param).declared_type = converted;
                    converted_params.push(param);
                }
                _ => {
                    number += 1;
                    let converted = self.convert(doc_param, false)?;
                    let param = self.arena.alloc_string(Token::Name, format!("p{number}"));
                    self.arena.get_mut(param).declared_type = converted;
                    converted_params.push(param);
                }
            }
        }

        let mut children = vec![ret];
        children.extend(converted_params);
        Ok(Some(
            self.arena.alloc_with_children(Token::FunctionType, children),
        ))
    }

    // ==================== Union flattening ====================

    pub(crate) fn flatten_union(
        &mut self,
        members: &[NodeIndex],
        is_return: bool,
    ) -> Result<Option<NodeIndex>, Diagnostic> {
        let mut out = Vec::new();
        for &member in members {
            if let Some(converted) = self.convert(member, is_return)? {
                self.push_union_member(&mut out, converted);
            }
        }
        if out.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.make_union(out)))
    }

    fn make_union(&mut self, members: Vec<NodeIndex>) -> NodeIndex {
        if members.len() == 1 {
            members[0]
        } else {
            self.arena.alloc_with_children(Token::UnionType, members)
        }
    }

    /// Append a member, splicing nested unions and dropping structural
    /// duplicates (first occurrence wins).
    fn push_union_member(&mut self, out: &mut Vec<NodeIndex>, member: NodeIndex) {
        if self.arena.token(member) == Token::UnionType {
            for child in self.arena.children(member).to_vec() {
                self.push_union_member(out, child);
            }
            return;
        }
        if out.iter().any(|&seen| types_equal(self.arena, seen, member)) {
            return;
        }
        out.push(member);
    }

    fn unsupported(&self, idx: NodeIndex) -> Diagnostic {
        let node = self.arena.get(idx);
        Diagnostic::error(
            self.file,
            node.pos,
            node.pos,
            format!("unsupported type construct: {:?}", node.token),
        )
    }
}

/// Structural equality over typed-declaration trees.
pub(crate) fn types_equal(arena: &NodeArena, a: NodeIndex, b: NodeIndex) -> bool {
    let (na, nb) = (arena.get(a), arena.get(b));
    if na.token != nb.token || na.string != nb.string || na.props != nb.props {
        return false;
    }
    match (na.declared_type, nb.declared_type) {
        (None, None) => {}
        (Some(da), Some(db)) => {
            if !types_equal(arena, da, db) {
                return false;
            }
        }
        _ => return false,
    }
    na.children.len() == nb.children.len()
        && na
            .children
            .iter()
            .zip(nb.children.iter())
            .all(|(&ca, &cb)| types_equal(arena, ca, cb))
}
