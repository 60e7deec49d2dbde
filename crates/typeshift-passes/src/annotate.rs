//! The type-annotation pass.
//!
//! A post-order walk converts doc-comment type expressions into
//! typed-declaration subtrees and attaches them to the nodes that carry
//! them; a second walk copies access modifiers and promotes doc-constant
//! bindings; queued imports are injected just before emission.
//!
//! Parameter nodes are replaced during the first walk. The walk is
//! post-order with replacement by parent position, so a replacement never
//! puts an unvisited node in the walk's path.

use typeshift_common::Diagnostic;
use typeshift_parser::node::{CommentRegistry, DocInfo, NodeArena, NodeIndex, NodeProps, Visibility};
use typeshift_parser::token::Token;

use crate::externs::ExternsMap;
use crate::modules::SymbolIndex;
use crate::rewrite::TypeRewriteTable;

pub struct AnnotationPass<'a> {
    pub(crate) file: &'a str,
    pub(crate) arena: &'a mut NodeArena,
    pub(crate) comments: &'a mut CommentRegistry,
    pub(crate) index: &'a SymbolIndex,
    pub(crate) externs: &'a ExternsMap,
    pub(crate) rewrite: &'a mut TypeRewriteTable,
    pub(crate) pending_imports: &'a mut Vec<NodeIndex>,
    parents: Vec<Option<NodeIndex>>,
}

impl<'a> AnnotationPass<'a> {
    pub fn run(
        file: &'a str,
        arena: &'a mut NodeArena,
        comments: &'a mut CommentRegistry,
        root: NodeIndex,
        index: &'a SymbolIndex,
        externs: &'a ExternsMap,
        rewrite: &'a mut TypeRewriteTable,
        pending_imports: &'a mut Vec<NodeIndex>,
    ) -> Result<(), Diagnostic> {
        tracing::debug!(%file, "running type-annotation pass");
        let parents = build_parent_map(arena, root);
        let mut pass = AnnotationPass {
            file,
            arena,
            comments,
            index,
            externs,
            rewrite,
            pending_imports,
            parents,
        };
        pass.walk(root)?;
        pass.apply_access_modifiers(root);
        Ok(())
    }

    fn walk(&mut self, idx: NodeIndex) -> Result<(), Diagnostic> {
        let children = self.arena.children(idx).to_vec();
        for child in children {
            self.walk(child)?;
        }
        self.visit(idx)
    }

    fn visit(&mut self, idx: NodeIndex) -> Result<(), Diagnostic> {
        match self.arena.token(idx) {
            // Fields must carry an explicit type; absent annotations get
            // `any`.
            Token::MemberVariableDef => {
                let doc_ty = self.arena.get(idx).doc.as_ref().and_then(|d| d.ty);
                let converted = match doc_ty {
                    Some(t) => self.convert(t, false)?,
                    None => None,
                };
                let ty = match converted {
                    Some(ty) => ty,
                    None => self.arena.alloc(Token::AnyType),
                };
                self.arena.get_mut(idx).declared_type = Some(ty);
            }
            Token::Function => self.annotate_function(idx)?,
            Token::Name | Token::GetProp => {
                let Some(parent) = self.parent_of(idx) else {
                    return Ok(());
                };
                if !self.arena.token(parent).is_binding() {
                    return Ok(());
                }
                let doc_ty = self.arena.get(parent).doc.as_ref().and_then(|d| d.ty);
                if let Some(t) = doc_ty {
                    let converted = self.convert(t, false)?;
                    self.arena.get_mut(idx).declared_type = converted;
                }
            }
            Token::Cast => {
                let doc_ty = self.arena.get(idx).doc.as_ref().and_then(|d| d.ty);
                if let Some(t) = doc_ty {
                    let converted = self.convert(t, false)?;
                    self.arena.get_mut(idx).declared_type = converted;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Attach the doc return type and per-parameter types to a function.
    fn annotate_function(&mut self, idx: NodeIndex) -> Result<(), Diagnostic> {
        let Some(doc) = self.best_doc(idx) else {
            return Ok(());
        };

        if let Some(ret) = doc.return_ty {
            let converted = self.convert(ret, true)?;
            self.arena.get_mut(idx).declared_type = converted;
        }

        let params_idx = self.arena.children(idx)[1];
        let params = self.arena.children(params_idx).to_vec();
        for (at, param) in params.into_iter().enumerate() {
            let param_name = self.arena.string(param).to_string();
            let Some(&doc_ty) = doc.params.get(&param_name) else {
                continue;
            };
            match self.arena.token(doc_ty) {
                // Variadic parameter: promote to a rest node.
                Token::Ellipsis => {
                    let converted = self.convert(doc_ty, false)?;
                    if self.arena.token(param) == Token::Rest {
                        self.arena.get_mut(param).declared_type = converted;
                    } else {
                        let rest = self.arena.alloc_string(Token::Rest, param_name);
                        self.arena.get_mut(rest).declared_type = converted;
                        self.comments.remap(param, rest);
                        self.arena.replace_child(params_idx, at, rest);
                    }
                }
                // Optional parameter: fresh name node with the optional
                // marker carried structurally.
                Token::Equals => {
                    let inner = self.arena.children(doc_ty).first().copied();
                    let converted = match inner {
                        Some(t) => self.convert(t, false)?,
                        None => None,
                    };
                    let fresh = self.arena.alloc_string(Token::Name, param_name);
                    self.arena
                        .get_mut(fresh)
                        .props
                        .insert(NodeProps::OPT_ES6_TYPED);
                    self.arena.get_mut(fresh).declared_type = converted;
                    self.comments.remap(param, fresh);
                    self.arena.replace_child(params_idx, at, fresh);
                }
                _ => {
                    let converted = self.convert(doc_ty, false)?;
                    self.arena.get_mut(param).declared_type = converted;
                }
            }
        }
        Ok(())
    }

    /// The node's own doc info, or the nearest enclosing declaration's.
    fn best_doc(&self, idx: NodeIndex) -> Option<DocInfo> {
        let mut cur = idx;
        for _ in 0..3 {
            if let Some(doc) = &self.arena.get(cur).doc {
                return Some(doc.clone());
            }
            match self.parent_of(cur) {
                Some(parent)
                    if matches!(
                        self.arena.token(parent),
                        Token::Name
                            | Token::Var
                            | Token::Let
                            | Token::Const
                            | Token::MemberFunctionDef
                    ) =>
                {
                    cur = parent;
                }
                _ => return None,
            }
        }
        None
    }

    pub(crate) fn parent_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.parents.get(idx.0 as usize).copied().flatten()
    }

    // ==================== Access-modifier sub-pass ====================

    /// Copy doc visibility into the structural access slot, and retoken
    /// doc-constant `var`/`let` bindings to `const`.
    fn apply_access_modifiers(&mut self, root: NodeIndex) {
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            stack.extend(self.arena.children(idx).iter().copied());
            let Some(doc) = &self.arena.get(idx).doc else {
                continue;
            };
            let visibility = doc.visibility;
            let is_const = doc.is_const;
            if let Some(v @ (Visibility::Private | Visibility::Protected)) = visibility {
                self.arena.get_mut(idx).access = Some(v);
            }
            if is_const && matches!(self.arena.token(idx), Token::Var | Token::Let) {
                self.arena.get_mut(idx).token = Token::Const;
            }
        }
    }
}

/// Splice queued imports into a script, ahead of any existing imports.
pub fn inject_imports(arena: &mut NodeArena, root: NodeIndex, pending: Vec<NodeIndex>) {
    if pending.is_empty() {
        return;
    }
    let target = {
        let children = arena.children(root);
        if children.len() == 1 && arena.token(children[0]) == Token::ModuleBody {
            children[0]
        } else {
            root
        }
    };
    let at = arena
        .children(target)
        .iter()
        .position(|&c| arena.token(c) == Token::Import)
        .unwrap_or(0);
    let mut children = std::mem::take(&mut arena.get_mut(target).children);
    children.splice(at..at, pending);
    arena.get_mut(target).children = children;
}

fn build_parent_map(arena: &NodeArena, root: NodeIndex) -> Vec<Option<NodeIndex>> {
    let mut parents = vec![None; arena.len()];
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        for &child in arena.children(idx) {
            parents[child.0 as usize] = Some(idx);
            stack.push(child);
        }
    }
    parents
}
