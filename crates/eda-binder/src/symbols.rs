//! Symbols and symbol tables.

use eda_parser::NodeIndex;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Flags describing how a symbol was declared.
pub mod symbol_flags {
    pub const NONE: u32 = 0;
    /// `var` declarations, hoisted to the nearest function or file scope
    pub const FUNCTION_SCOPED_VARIABLE: u32 = 1 << 0;
    /// `let` / `const` declarations
    pub const BLOCK_SCOPED_VARIABLE: u32 = 1 << 1;
    pub const PARAMETER: u32 = 1 << 2;
    pub const FUNCTION: u32 = 1 << 3;
    pub const CLASS: u32 = 1 << 4;
    /// Import bindings (default, named, namespace)
    pub const ALIAS: u32 = 1 << 5;
    pub const CATCH_VARIABLE: u32 = 1 << 6;

    pub const VARIABLE: u32 = FUNCTION_SCOPED_VARIABLE | BLOCK_SCOPED_VARIABLE;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const NONE: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for SymbolId {
    fn default() -> Self {
        SymbolId::NONE
    }
}

/// A named binding and every node that declares it.
#[derive(Clone, Debug, Serialize)]
pub struct Symbol {
    pub flags: u32,
    pub escaped_name: String,
    /// Declaring nodes, in binding order
    pub declarations: Vec<NodeIndex>,
}

impl Symbol {
    pub fn new(flags: u32, escaped_name: String) -> Symbol {
        Symbol {
            flags,
            escaped_name,
            declarations: Vec::new(),
        }
    }

    #[inline]
    pub fn has_any_flags(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }
}

/// Storage for all symbols of one bound file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> SymbolArena {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, flags: u32, escaped_name: String) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(flags, escaped_name));
        id
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get(id.0 as usize)
    }

    #[inline]
    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        if id.is_none() {
            return None;
        }
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymbolId(i as u32), symbol))
    }
}

/// Name to symbol map for a single scope.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SymbolTable {
    symbols: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    pub fn set(&mut self, name: String, id: SymbolId) {
        self.symbols.insert(name, id);
    }

    pub fn has(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SymbolId)> + '_ {
        self.symbols.iter()
    }
}
