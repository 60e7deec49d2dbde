//! The style-fix pass.
//!
//! Tightens lowered declaration forms into their natural TypeScript
//! spelling: class literals bound to a name become class declarations,
//! `const`-bound function literals become function declarations (with the
//! declared function type spliced onto the literal), and `var` relaxes to
//! `let` when a lift-shaped initializer is present.

use typeshift_parser::node::{CommentRegistry, NodeArena, NodeIndex, NodeProps};
use typeshift_parser::token::Token;

use crate::TranspileOptions;

pub struct StyleFixPass<'a> {
    arena: &'a mut NodeArena,
    comments: &'a mut CommentRegistry,
    options: &'a TranspileOptions,
}

impl<'a> StyleFixPass<'a> {
    pub fn run(
        arena: &'a mut NodeArena,
        comments: &'a mut CommentRegistry,
        options: &'a TranspileOptions,
        root: NodeIndex,
    ) {
        let mut pass = StyleFixPass {
            arena,
            comments,
            options,
        };
        pass.walk(root);
    }

    fn walk(&mut self, idx: NodeIndex) {
        let children = self.arena.children(idx).to_vec();
        for child in children {
            self.walk(child);
        }
        if matches!(
            self.arena.token(idx),
            Token::Script | Token::ModuleBody | Token::Block
        ) {
            for at in 0..self.arena.children(idx).len() {
                let stmt = self.arena.children(idx)[at];
                if self.arena.token(stmt).is_binding() {
                    if let Some(replacement) = self.fix_binding(stmt) {
                        self.arena.replace_child(idx, at, replacement);
                    }
                }
            }
        }
    }

    /// Returns the statement that replaces the binding, if any.
    fn fix_binding(&mut self, binding: NodeIndex) -> Option<NodeIndex> {
        let names = self.arena.children(binding);
        if names.len() != 1 {
            return None;
        }
        let name = names[0];
        let init = self.arena.children(name).first().copied()?;

        match self.arena.token(init) {
            Token::Class => {
                self.relax_var(binding);
                Some(self.lift(binding, name, init))
            }
            Token::Function => {
                self.relax_var(binding);
                // Functions are lifted only out of `const` bindings.
                if self.arena.token(binding) != Token::Const {
                    return None;
                }
                self.maybe_lift_function(binding, name, init)
            }
            _ => None,
        }
    }

    fn relax_var(&mut self, binding: NodeIndex) {
        if self.options.var_to_let && self.arena.token(binding) == Token::Var {
            self.arena.get_mut(binding).token = Token::Let;
        }
    }

    /// Replace the binding with the literal itself, renamed to the binding
    /// name.
    fn lift(&mut self, binding: NodeIndex, name: NodeIndex, decl: NodeIndex) -> NodeIndex {
        let binding_name = self.arena.string(name).to_string();
        let decl_name = self.arena.children(decl)[0];
        self.arena.get_mut(decl_name).string = Some(binding_name);
        if self.arena.get(binding).props.contains(NodeProps::EXPORT) {
            self.arena.get_mut(decl).props.insert(NodeProps::EXPORT);
        }
        self.comments.remap(binding, decl);
        decl
    }

    fn maybe_lift_function(
        &mut self,
        binding: NodeIndex,
        name: NodeIndex,
        func: NodeIndex,
    ) -> Option<NodeIndex> {
        let Some(declared) = self.arena.get(name).declared_type else {
            // Untyped binding: the literal already carries any annotations.
            return Some(self.lift(binding, name, func));
        };
        if self.arena.token(declared) != Token::FunctionType {
            return None;
        }

        let type_params = self.arena.children(declared)[1..].to_vec();
        let params_idx = self.arena.children(func)[1];
        let fn_params = self.arena.children(params_idx).to_vec();
        if type_params.len() != fn_params.len() {
            tracing::warn!(
                binding = %self.arena.string(name),
                declared = type_params.len(),
                actual = fn_params.len(),
                "declared function type arity differs from literal; skipping lift"
            );
            return None;
        }

        // Splice the declared function type onto the literal: return type
        // first, then per-parameter annotations in order.
        let ret = self.arena.children(declared)[0];
        self.arena.get_mut(func).declared_type = Some(ret);
        for (at, (&type_param, &fn_param)) in type_params.iter().zip(fn_params.iter()).enumerate() {
            if self.arena.token(type_param) == Token::Rest {
                let original = self.arena.string(fn_param).to_string();
                self.arena.get_mut(type_param).string = Some(original);
                if self.arena.get(type_param).declared_type.is_none() {
                    let any = self.arena.alloc(Token::AnyType);
                    let array = self.arena.alloc_with_children(Token::ArrayType, vec![any]);
                    self.arena.get_mut(type_param).declared_type = Some(array);
                }
                self.comments.remap(fn_param, type_param);
                self.arena.replace_child(params_idx, at, type_param);
            } else {
                let ty = self.arena.get(type_param).declared_type;
                self.arena.get_mut(fn_param).declared_type = ty;
                if self
                    .arena
                    .get(type_param)
                    .props
                    .contains(NodeProps::OPT_ES6_TYPED)
                {
                    self.arena
                        .get_mut(fn_param)
                        .props
                        .insert(NodeProps::OPT_ES6_TYPED);
                }
            }
        }

        // The binding's own type must not be emitted twice.
        self.arena.get_mut(name).declared_type = None;
        Some(self.lift(binding, name, func))
    }
}
