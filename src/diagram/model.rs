//! What a class diagram contains

use std::collections::{BTreeMap, BTreeSet};

/// Visibility marker of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// `pub`
    Public,
    /// `pub(crate)`, `pub(super)`, `pub(in path)`
    Restricted,
    /// No `pub`
    Private,
}

impl Visibility {
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Public => '+',
            Self::Restricted => '~',
            Self::Private => '-',
        }
    }
}

impl From<&syn::Visibility> for Visibility {
    fn from(vis: &syn::Visibility) -> Self {
        match vis {
            syn::Visibility::Public(_) => Self::Public,
            syn::Visibility::Restricted(_) => Self::Restricted,
            syn::Visibility::Inherited => Self::Private,
        }
    }
}

/// Which Rust item a class stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Struct,
    Enum,
    Trait,
}

impl ClassKind {
    /// PlantUML keyword
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Struct => "class",
            Self::Enum => "enum",
            Self::Trait => "interface",
        }
    }
}

/// A field or enum variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub visibility: Visibility,
    pub name: String,
    /// Rendered type; `None` for unit variants
    pub ty: Option<String>,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.visibility.marker(), self.name)?;
        if let Some(ty) = &self.ty {
            write!(f, ": {ty}")?;
        }
        Ok(())
    }
}

/// A method signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub visibility: Visibility,
    pub name: String,
    /// `name: Type` for every argument except the receiver
    pub args: Vec<String>,
    pub ret: Option<String>,
    /// No `self` receiver
    pub is_static: bool,
    /// Trait method without default body
    pub is_abstract: bool,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.visibility.marker())?;
        if self.is_static {
            f.write_str("{static} ")?;
        }
        if self.is_abstract {
            f.write_str("{abstract} ")?;
        }
        write!(f, "{}({})", self.name, self.args.join(", "))?;
        if let Some(ret) = &self.ret {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: String,
    pub kind: ClassKind,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

impl Class {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Add fields whose name is not taken yet
    pub fn add_fields(&mut self, fields: Vec<Field>) {
        for field in fields {
            if !self.fields.iter().any(|f| f.name == field.name) {
                self.fields.push(field);
            }
        }
    }

    /// Add methods not already listed with the same signature
    pub fn add_methods(&mut self, methods: Vec<Method>) {
        for method in methods {
            if !self.methods.contains(&method) {
                self.methods.push(method);
            }
        }
    }
}

/// Arrow between two classes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Relation {
    /// `Trait <|.. Type`
    Implements { ty: String, trait_name: String },
    /// `Super <|-- Trait`
    Extends { trait_name: String, super_trait: String },
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Implements { ty, trait_name } => write!(f, "{trait_name} <|.. {ty}"),
            Self::Extends {
                trait_name,
                super_trait,
            } => write!(f, "{super_trait} <|-- {trait_name}"),
        }
    }
}

/// Classes by name plus the arrows between them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramModel {
    pub classes: BTreeMap<String, Class>,
    pub relations: BTreeSet<Relation>,
}

impl DiagramModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The class named `name`, created with `kind` if missing
    ///
    /// A class first seen through an `impl` block is recorded as a struct
    /// until its declaration is parsed.
    pub fn class_mut(&mut self, name: &str, kind: ClassKind) -> &mut Class {
        self.classes
            .entry(name.to_string())
            .or_insert_with(|| Class::new(name, kind))
    }

    /// Record a declaration, keeping members collected from earlier impls
    pub fn declare(&mut self, name: &str, kind: ClassKind) -> &mut Class {
        let class = self.class_mut(name, kind);
        class.kind = kind;
        class
    }

    pub fn relate(&mut self, relation: Relation) {
        self.relations.insert(relation);
    }

    #[must_use]
    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
