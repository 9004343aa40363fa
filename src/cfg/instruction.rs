//! Three-address instructions and the variables they operate on.
//!
//! Every basic-block expression is a [`Binding`](crate::cfg::Binding) of one
//! [`LocalVariable`] to the result of one [`Instruction`]. The instruction
//! set is a closed sum type: passes match exhaustively, so adding a variant
//! is a type-checked refactor rather than a runtime surprise.
//!
//! The split that matters to the optimizer is *purity*: a pure instruction
//! has no observable effect beyond producing its result and may be dropped
//! when that result is never read. Calls, returns and object allocation are
//! kept unconditionally.

use std::fmt;

use crate::symbols::{Context, NameId, NameKind};

/// A method-local variable, identified by its interned name.
///
/// This is a small value type; equality, hashing and ordering all follow the
/// name id, which makes block-argument lists cheap to sort and deduplicate.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalVariable(NameId);

impl LocalVariable {
    /// Creates a variable for an interned name.
    #[must_use]
    pub const fn new(name: NameId) -> Self {
        Self(name)
    }

    /// The interned name of this variable.
    #[must_use]
    pub const fn name(self) -> NameId {
        self.0
    }

    /// Returns `true` if this variable was minted by the frontend and does
    /// not exist in source. Only such temporaries are collapsed during
    /// dealiasing; source-level variables carry user-visible identity.
    #[must_use]
    pub fn is_synthetic_temporary(self, ctx: Context<'_>) -> bool {
        ctx.name_kind(self.0) == NameKind::Temporary
    }

    /// Returns `true` if this variable shadows a module-scope name, making
    /// writes to it observable beyond the enclosing method.
    #[must_use]
    pub fn is_alias_for_global(self, ctx: Context<'_>) -> bool {
        ctx.name_kind(self.0) == NameKind::GlobalAlias
    }

    /// Renders the variable using its interned text.
    #[must_use]
    pub fn show(self, ctx: Context<'_>) -> String {
        ctx.name_text(self.0).to_string()
    }
}

impl fmt::Debug for LocalVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lv({:?})", self.0)
    }
}

/// A single three-address instruction.
///
/// Operands are always [`LocalVariable`]s; nested expressions were flattened
/// by the frontend before the graph reaches this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// A pure copy of another variable.
    Ident(LocalVariable),
    /// A method call; observable side effects, never elided.
    Send {
        /// Receiver of the call.
        recv: LocalVariable,
        /// Interned method name.
        name: NameId,
        /// Positional arguments.
        args: Vec<LocalVariable>,
    },
    /// Return from the enclosing method.
    Return(LocalVariable),
    /// Object allocation; observable side effects, never elided.
    New {
        /// Interned name of the class being instantiated.
        klass: NameId,
        /// Constructor arguments.
        args: Vec<LocalVariable>,
    },
    /// Boolean literal.
    BoolLit(bool),
    /// String literal, interned.
    StringLit(NameId),
    /// Symbol literal, interned.
    SymbolLit(NameId),
    /// Integer literal.
    IntLit(i64),
    /// Floating-point literal.
    FloatLit(f64),
    /// The receiver of the enclosing method.
    SelfRef,
    /// Load of the i-th method argument.
    LoadArg(u16),
    /// Splat of an array value into positional arguments.
    ArraySplat(LocalVariable),
    /// Splat of a hash value into keyword arguments.
    HashSplat(LocalVariable),
}

impl Instruction {
    /// Returns `true` if this instruction has no observable effect beyond
    /// producing its result, and may therefore be dropped when the result
    /// is never read.
    #[must_use]
    pub fn is_pure(&self) -> bool {
        match self {
            Self::Ident(_)
            | Self::ArraySplat(_)
            | Self::HashSplat(_)
            | Self::BoolLit(_)
            | Self::StringLit(_)
            | Self::SymbolLit(_)
            | Self::IntLit(_)
            | Self::FloatLit(_)
            | Self::SelfRef
            | Self::LoadArg(_) => true,
            Self::Send { .. } | Self::Return(_) | Self::New { .. } => false,
        }
    }

    /// Appends every variable this instruction reads to `out`.
    pub fn each_read(&self, out: &mut impl FnMut(LocalVariable)) {
        match self {
            Self::Ident(what)
            | Self::Return(what)
            | Self::ArraySplat(what)
            | Self::HashSplat(what) => out(*what),
            Self::Send { recv, args, .. } => {
                out(*recv);
                for &arg in args {
                    out(arg);
                }
            }
            Self::New { args, .. } => {
                for &arg in args {
                    out(arg);
                }
            }
            Self::BoolLit(_)
            | Self::StringLit(_)
            | Self::SymbolLit(_)
            | Self::IntLit(_)
            | Self::FloatLit(_)
            | Self::SelfRef
            | Self::LoadArg(_) => {}
        }
    }

    /// Renders the instruction for debugging and DOT output.
    #[must_use]
    pub fn show(&self, ctx: Context<'_>) -> String {
        match self {
            Self::Ident(what) => what.show(ctx),
            Self::Send { recv, name, args } => {
                let rendered: Vec<String> = args.iter().map(|a| a.show(ctx)).collect();
                format!(
                    "{}.{}({})",
                    recv.show(ctx),
                    ctx.name_text(*name),
                    rendered.join(", ")
                )
            }
            Self::Return(what) => format!("return {}", what.show(ctx)),
            Self::New { klass, args } => {
                let rendered: Vec<String> = args.iter().map(|a| a.show(ctx)).collect();
                format!("{}.new({})", ctx.name_text(*klass), rendered.join(", "))
            }
            Self::BoolLit(v) => v.to_string(),
            Self::StringLit(s) => format!("{:?}", ctx.name_text(*s)),
            Self::SymbolLit(s) => format!(":{}", ctx.name_text(*s)),
            Self::IntLit(v) => v.to_string(),
            Self::FloatLit(v) => v.to_string(),
            Self::SelfRef => "self".to_string(),
            Self::LoadArg(i) => format!("loadArg({i})"),
            Self::ArraySplat(what) => format!("*{}", what.show(ctx)),
            Self::HashSplat(what) => format!("**{}", what.show(ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::SymbolTable;

    fn var(table: &mut SymbolTable, text: &str, kind: NameKind) -> LocalVariable {
        LocalVariable::new(table.intern(text, kind))
    }

    #[test]
    fn test_purity_partition() {
        let mut table = SymbolTable::new();
        let x = var(&mut table, "x", NameKind::Source);
        let m = table.intern("m", NameKind::Source);

        assert!(Instruction::Ident(x).is_pure());
        assert!(Instruction::ArraySplat(x).is_pure());
        assert!(Instruction::HashSplat(x).is_pure());
        assert!(Instruction::BoolLit(true).is_pure());
        assert!(Instruction::StringLit(m).is_pure());
        assert!(Instruction::SymbolLit(m).is_pure());
        assert!(Instruction::IntLit(3).is_pure());
        assert!(Instruction::FloatLit(1.5).is_pure());
        assert!(Instruction::SelfRef.is_pure());
        assert!(Instruction::LoadArg(0).is_pure());

        assert!(!Instruction::Return(x).is_pure());
        assert!(!Instruction::Send {
            recv: x,
            name: m,
            args: vec![]
        }
        .is_pure());
        assert!(!Instruction::New {
            klass: m,
            args: vec![]
        }
        .is_pure());
    }

    #[test]
    fn test_each_read_collects_operands() {
        let mut table = SymbolTable::new();
        let recv = var(&mut table, "recv", NameKind::Source);
        let a = var(&mut table, "a", NameKind::Source);
        let b = var(&mut table, "b", NameKind::Source);
        let m = table.intern("m", NameKind::Source);

        let send = Instruction::Send {
            recv,
            name: m,
            args: vec![a, b],
        };
        let mut seen = Vec::new();
        send.each_read(&mut |v| seen.push(v));
        assert_eq!(seen, vec![recv, a, b]);

        let mut seen = Vec::new();
        Instruction::IntLit(7).each_read(&mut |v| seen.push(v));
        assert!(seen.is_empty());
    }

    #[test]
    fn test_variable_predicates() {
        let mut table = SymbolTable::new();
        let src = var(&mut table, "user", NameKind::Source);
        let tmp = var(&mut table, "<temp>1", NameKind::Temporary);
        let glob = var(&mut table, "$stdout", NameKind::GlobalAlias);
        let ctx = Context::new(&table);

        assert!(!src.is_synthetic_temporary(ctx));
        assert!(tmp.is_synthetic_temporary(ctx));
        assert!(!glob.is_synthetic_temporary(ctx));
        assert!(glob.is_alias_for_global(ctx));
        assert!(!tmp.is_alias_for_global(ctx));
    }

    #[test]
    fn test_show_formats() {
        let mut table = SymbolTable::new();
        let recv = var(&mut table, "obj", NameKind::Source);
        let a = var(&mut table, "a", NameKind::Source);
        let m = table.intern("frob", NameKind::Source);
        let ctx = Context::new(&table);

        let send = Instruction::Send {
            recv,
            name: m,
            args: vec![a],
        };
        assert_eq!(send.show(ctx), "obj.frob(a)");
        assert_eq!(Instruction::Return(a).show(ctx), "return a");
        assert_eq!(Instruction::SelfRef.show(ctx), "self");
    }
}
