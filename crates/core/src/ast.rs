//! Typed AST produced by the parser.
//!
//! Declarations are grouped by kind, then by name. Struct-like kinds
//! (struct, union, exception) are looked up by their field list, which is
//! what code generators consume. No cross-file resolution happens here.

use indexmap::IndexMap;
use std::collections::BTreeMap;

// ──────────────────────────────────────────────
// Comments
// ──────────────────────────────────────────────

/// Comments attached to a declaration or item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comments {
    /// Comment block on the lines before the item.
    pub head: Option<String>,
    /// Comment on the item's own line(s).
    pub tail: Option<String>,
}

// ──────────────────────────────────────────────
// Types
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    List,
    Set,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Set => "set",
        }
    }
}

/// A type expression. Anything that is not a container collapses to its
/// bare name.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Scalar(String),
    Map {
        key: Box<TypeRef>,
        value: Box<TypeRef>,
    },
    ListLike {
        kind: ContainerKind,
        value: Box<TypeRef>,
    },
}

impl TypeRef {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeRef::Scalar(name.into())
    }

    /// Bare name: the scalar name, or `map` / `list` / `set`.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Scalar(name) => name,
            TypeRef::Map { .. } => "map",
            TypeRef::ListLike { kind, .. } => kind.as_str(),
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self, TypeRef::Scalar(_))
    }
}

// ──────────────────────────────────────────────
// Literals
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Plain decimal integer, e.g. `-12`.
    Int(i64),
    /// Plain decimal with a fractional part, e.g. `1.25`.
    Double(f64),
    /// Hexadecimal integer, e.g. `0x1A`.
    Hex(i64),
    /// Exponential notation, e.g. `1.5e3`.
    Exponent(f64),
    Bool(bool),
    Str(String),
    List(Vec<Literal>),
    /// Key/value pairs in source order.
    Map(Vec<(Literal, Literal)>),
    /// Dotted reference path, e.g. `Color.RED`.
    Ref(Vec<String>),
}

impl Literal {
    /// Integral value of an integer literal (decimal or hex).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Int(n) | Literal::Hex(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of any number literal.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(n) | Literal::Hex(n) => Some(*n as f64),
            Literal::Double(f) | Literal::Exponent(f) => Some(*f),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Items
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Required,
    Optional,
}

impl Qualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualifier::Required => "required",
            Qualifier::Optional => "optional",
        }
    }
}

/// A struct/union/exception field or a service function argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: Option<i64>,
    pub qualifier: Option<Qualifier>,
    pub type_: TypeRef,
    pub name: String,
    pub default: Option<Literal>,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumItem {
    pub name: String,
    /// Explicit value, or previous value + 1 (starting at 0).
    pub value: i64,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub oneway: bool,
    pub returns: TypeRef,
    pub name: String,
    pub args: Vec<Field>,
    /// Empty when the function has no `throws` clause.
    pub throws: Vec<Field>,
    pub comments: Comments,
}

// ──────────────────────────────────────────────
// Declarations
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    /// Target language scope, e.g. `java` or `*`.
    pub scope: String,
    pub path: String,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    /// Path exactly as written between the quotes.
    pub path: String,
    /// File name without directories or `.thrift` suffix.
    pub module: String,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Typedef {
    pub type_: TypeRef,
    pub name: String,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub type_: TypeRef,
    pub name: String,
    pub value: Literal,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub items: Vec<EnumItem>,
    pub comments: Comments,
}

/// Body shared by struct, union and exception declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct StructLike {
    pub name: String,
    pub fields: Vec<Field>,
    pub comments: Comments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    pub extends: Option<String>,
    /// Functions keyed by name, in declaration order.
    pub functions: IndexMap<String, Function>,
    pub comments: Comments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubjectKind {
    Namespace,
    Include,
    Typedef,
    Const,
    Enum,
    Struct,
    Union,
    Exception,
    Service,
}

impl SubjectKind {
    pub const ALL: [SubjectKind; 9] = [
        SubjectKind::Namespace,
        SubjectKind::Include,
        SubjectKind::Typedef,
        SubjectKind::Const,
        SubjectKind::Enum,
        SubjectKind::Struct,
        SubjectKind::Union,
        SubjectKind::Exception,
        SubjectKind::Service,
    ];

    /// The declaration keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::Namespace => "namespace",
            SubjectKind::Include => "include",
            SubjectKind::Typedef => "typedef",
            SubjectKind::Const => "const",
            SubjectKind::Enum => "enum",
            SubjectKind::Struct => "struct",
            SubjectKind::Union => "union",
            SubjectKind::Exception => "exception",
            SubjectKind::Service => "service",
        }
    }

    pub fn is_struct_like(&self) -> bool {
        matches!(
            self,
            SubjectKind::Struct | SubjectKind::Union | SubjectKind::Exception
        )
    }
}

/// One top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    Namespace(Namespace),
    Include(Include),
    Typedef(Typedef),
    Const(Const),
    Enum(Enum),
    Struct(StructLike),
    Union(StructLike),
    Exception(StructLike),
    Service(Service),
}

impl Subject {
    pub fn kind(&self) -> SubjectKind {
        match self {
            Subject::Namespace(_) => SubjectKind::Namespace,
            Subject::Include(_) => SubjectKind::Include,
            Subject::Typedef(_) => SubjectKind::Typedef,
            Subject::Const(_) => SubjectKind::Const,
            Subject::Enum(_) => SubjectKind::Enum,
            Subject::Struct(_) => SubjectKind::Struct,
            Subject::Union(_) => SubjectKind::Union,
            Subject::Exception(_) => SubjectKind::Exception,
            Subject::Service(_) => SubjectKind::Service,
        }
    }

    /// Key under which the declaration is stored. Namespaces are keyed by
    /// scope and includes by module name.
    pub fn name(&self) -> &str {
        match self {
            Subject::Namespace(n) => &n.scope,
            Subject::Include(i) => &i.module,
            Subject::Typedef(t) => &t.name,
            Subject::Const(c) => &c.name,
            Subject::Enum(e) => &e.name,
            Subject::Struct(s) | Subject::Union(s) | Subject::Exception(s) => &s.name,
            Subject::Service(s) => &s.name,
        }
    }

    pub fn comments(&self) -> &Comments {
        match self {
            Subject::Namespace(n) => &n.comments,
            Subject::Include(i) => &i.comments,
            Subject::Typedef(t) => &t.comments,
            Subject::Const(c) => &c.comments,
            Subject::Enum(e) => &e.comments,
            Subject::Struct(s) | Subject::Union(s) | Subject::Exception(s) => &s.comments,
            Subject::Service(s) => &s.comments,
        }
    }

    /// Field list of a struct, union or exception.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Subject::Struct(s) | Subject::Union(s) | Subject::Exception(s) => Some(&s.fields),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Document
// ──────────────────────────────────────────────

/// The parsed file: declaration kind -> name -> declaration.
///
/// A kind is present only when at least one declaration of that kind was
/// parsed. Re-declaring a name replaces the earlier declaration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThriftAst {
    subjects: BTreeMap<SubjectKind, IndexMap<String, Subject>>,
}

impl ThriftAst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, subject: Subject) {
        self.subjects
            .entry(subject.kind())
            .or_default()
            .insert(subject.name().to_owned(), subject);
    }

    pub fn contains_kind(&self, kind: SubjectKind) -> bool {
        self.subjects.contains_key(&kind)
    }

    pub fn get(&self, kind: SubjectKind) -> Option<&IndexMap<String, Subject>> {
        self.subjects.get(&kind)
    }

    pub fn subject(&self, kind: SubjectKind, name: &str) -> Option<&Subject> {
        self.subjects.get(&kind)?.get(name)
    }

    /// Field list of the named struct-like declaration.
    pub fn fields(&self, kind: SubjectKind, name: &str) -> Option<&[Field]> {
        self.subject(kind, name)?.fields()
    }

    pub fn namespace(&self, scope: &str) -> Option<&Namespace> {
        match self.subject(SubjectKind::Namespace, scope)? {
            Subject::Namespace(n) => Some(n),
            _ => None,
        }
    }

    pub fn include(&self, module: &str) -> Option<&Include> {
        match self.subject(SubjectKind::Include, module)? {
            Subject::Include(i) => Some(i),
            _ => None,
        }
    }

    pub fn typedef(&self, name: &str) -> Option<&Typedef> {
        match self.subject(SubjectKind::Typedef, name)? {
            Subject::Typedef(t) => Some(t),
            _ => None,
        }
    }

    pub fn constant(&self, name: &str) -> Option<&Const> {
        match self.subject(SubjectKind::Const, name)? {
            Subject::Const(c) => Some(c),
            _ => None,
        }
    }

    pub fn enumeration(&self, name: &str) -> Option<&Enum> {
        match self.subject(SubjectKind::Enum, name)? {
            Subject::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        match self.subject(SubjectKind::Service, name)? {
            Subject::Service(s) => Some(s),
            _ => None,
        }
    }

    /// Declaration kinds present, in keyword order.
    pub fn kinds(&self) -> impl Iterator<Item = SubjectKind> + '_ {
        self.subjects.keys().copied()
    }

    /// All declarations, grouped by kind then in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values().flat_map(|m| m.values())
    }

    /// Number of distinct declarations.
    pub fn len(&self) -> usize {
        self.subjects.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
