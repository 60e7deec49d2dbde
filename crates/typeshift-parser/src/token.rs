//! Token tags for the syntax tree.
//!
//! One tag set covers three node families that share the arena: JavaScript
//! syntax produced by the parser, doc-comment type expressions produced by
//! the doc parser, and the typed-declaration sub-grammar produced by the
//! type-annotation pass. Passes and the emitter dispatch with an explicit
//! `match` over this tag.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    // ==================== Structure & statements ====================
    Script,
    ModuleBody,
    Block,
    Var,
    Let,
    Const,
    Function,
    Class,
    MemberVariableDef,
    MemberFunctionDef,
    ParamList,
    Rest,
    Import,
    ImportSpecs,
    ImportSpec,
    ExprResult,
    Return,
    If,
    While,
    Empty,

    // ==================== Expressions ====================
    Name,
    GetProp,
    GetElem,
    Call,
    New,
    Assign,
    Binary,
    Not,
    Neg,
    TypeOf,
    String,
    Number,
    True,
    False,
    Null,
    This,
    ArrayLit,
    ObjectLit,
    StringKey,
    Cast,

    // ==================== Doc-comment type grammar ====================
    Pipe,
    Bang,
    Qmark,
    Star,
    Void,
    Lc,
    Colon,
    Ellipsis,
    Equals,

    // ==================== Typed declarations ====================
    AnyType,
    BooleanType,
    NumberType,
    StringType,
    VoidType,
    UndefinedType,
    NamedType,
    ParameterizedType,
    ArrayType,
    RecordType,
    FunctionType,
    UnionType,
}

impl Token {
    /// `var`, `let` or `const`.
    pub fn is_binding(self) -> bool {
        matches!(self, Token::Var | Token::Let | Token::Const)
    }

    /// Tokens belonging to the typed-declaration sub-grammar the emitter
    /// prints in type position.
    pub fn is_declared_type(self) -> bool {
        matches!(
            self,
            Token::AnyType
                | Token::BooleanType
                | Token::NumberType
                | Token::StringType
                | Token::VoidType
                | Token::UndefinedType
                | Token::NamedType
                | Token::ParameterizedType
                | Token::ArrayType
                | Token::RecordType
                | Token::FunctionType
                | Token::UnionType
                | Token::Null
        )
    }
}
