//! Name interning and the read-only analysis context.
//!
//! The optimization core never manipulates name strings directly: every
//! variable and method name is interned once into a [`SymbolTable`] and
//! referenced by a dense [`NameId`] afterwards. The table also records a
//! [`NameKind`] per name, which is what the variable predicates
//! (`is_synthetic_temporary`, `is_alias_for_global`) consult.
//!
//! Passes receive a [`Context`], a cheap copyable read-only handle to the
//! table. The core only ever reads names; minting new temporaries is the
//! frontend's job.

use rustc_hash::FxHashMap;
use std::fmt;

/// Dense identifier of an interned name.
///
/// Ids are assigned in interning order and never reused, so they double as
/// a stable total order over names (block arguments are sorted by it).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(u32);

impl NameId {
    /// Returns the underlying index into the symbol table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Classification of an interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// A name that appears in source code and carries user-visible identity.
    Source,
    /// A compiler-minted temporary; safe to collapse during dealiasing.
    Temporary,
    /// A local that shadows a module-scope name; writes to it are observable
    /// beyond the method and must never be dropped.
    GlobalAlias,
}

struct Name {
    text: String,
    kind: NameKind,
}

/// Interner mapping name strings to dense [`NameId`]s.
///
/// A handful of well-known names are interned at construction time; the one
/// the core itself consults is [`block_call`](Self::block_call), the marker
/// carried by the exit condition of block-header basic blocks, which the
/// simplifier must not fold away.
pub struct SymbolTable {
    names: Vec<Name>,
    by_text: FxHashMap<String, NameId>,
    block_call: NameId,
}

impl SymbolTable {
    /// Creates a table with the well-known names pre-interned.
    #[must_use]
    pub fn new() -> Self {
        let mut table = Self {
            names: Vec::new(),
            by_text: FxHashMap::default(),
            block_call: NameId(0),
        };
        table.block_call = table.intern("<blockCall>", NameKind::Temporary);
        table
    }

    /// Interns `text`, returning the existing id if it was seen before.
    ///
    /// The kind of a name is fixed on first interning; re-interning the same
    /// text with a different kind returns the original id unchanged.
    pub fn intern(&mut self, text: &str, kind: NameKind) -> NameId {
        if let Some(&id) = self.by_text.get(text) {
            return id;
        }
        let id = NameId(u32::try_from(self.names.len()).unwrap_or(u32::MAX));
        self.names.push(Name {
            text: text.to_string(),
            kind,
        });
        self.by_text.insert(text.to_string(), id);
        id
    }

    /// Returns the interned text of `id`.
    #[must_use]
    pub fn text(&self, id: NameId) -> &str {
        &self.names[id.index()].text
    }

    /// Returns the kind recorded for `id`.
    #[must_use]
    pub fn kind(&self, id: NameId) -> NameKind {
        self.names[id.index()].kind
    }

    /// The well-known marker name carried by block-header exit conditions.
    #[must_use]
    pub const fn block_call(&self) -> NameId {
        self.block_call
    }

    /// Number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the table holds no names at all. A freshly
    /// constructed table is never empty: the well-known names are interned
    /// up front.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only handle to the symbol table, passed to every pass.
///
/// `Context` is `Copy` so it can be threaded through recursive helpers
/// without borrow gymnastics.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> Context<'a> {
    /// Wraps a symbol table.
    #[must_use]
    pub const fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// The underlying table.
    #[must_use]
    pub const fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// Kind of an interned name.
    #[must_use]
    pub fn name_kind(&self, id: NameId) -> NameKind {
        self.symbols.kind(id)
    }

    /// Text of an interned name.
    #[must_use]
    pub fn name_text(&self, id: NameId) -> &'a str {
        self.symbols.text(id)
    }

    /// The block-header marker name.
    #[must_use]
    pub const fn block_call(&self) -> NameId {
        self.symbols.block_call()
    }
}
