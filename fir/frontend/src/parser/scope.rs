//! Lexically scoped symbol table.
use fir_ir as ir;
use fir_utils::{Error, FirResult, GPosIdx, Id};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// Declaration site of a name and the value it refers to. External module
/// ports have no value: they only reserve the name.
type Entry = (GPosIdx, Option<ir::Value>);

/// A stack of scopes mapping names to values.
#[derive(Default)]
pub struct SymbolTable {
    scopes: Vec<HashMap<Id, Entry>>,
}

impl SymbolTable {
    /// Open a new scope. The scope is closed when the returned guard is
    /// dropped.
    pub fn push_scope(&mut self) -> Scope<'_> {
        self.scopes.push(HashMap::new());
        Scope { table: self }
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn lookup(&self, name: Id) -> Option<&Entry> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name))
    }

    /// Bind `name` in the innermost scope. Fails if `name` is visible from it.
    pub fn declare(
        &mut self,
        name: Id,
        value: Option<ir::Value>,
        pos: GPosIdx,
    ) -> FirResult<()> {
        if let Some((prev, _)) = self.lookup(name) {
            return Err(Error::already_bound(name)
                .with_pos(&pos)
                .with_annotation(prev, "previous definition here"));
        }
        let Some(scope) = self.scopes.last_mut() else {
            return Err(Error::misc(format!(
                "`{name}` declared outside of any scope"
            ))
            .with_pos(&pos));
        };
        scope.insert(name, (pos, value));
        Ok(())
    }

    /// Return the value bound to `name`.
    pub fn resolve(&self, name: Id, pos: GPosIdx) -> FirResult<ir::Value> {
        match self.lookup(name) {
            Some((_, Some(value))) => Ok(value.clone()),
            _ => Err(Error::undefined(name).with_pos(&pos)),
        }
    }
}

/// An open scope of a [SymbolTable]. Dereferences to the table.
pub struct Scope<'a> {
    table: &'a mut SymbolTable,
}

impl Deref for Scope<'_> {
    type Target = SymbolTable;

    fn deref(&self) -> &Self::Target {
        self.table
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.table
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.table.scopes.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::SymbolTable;
    use fir_ir as ir;
    use fir_utils::{FirResult, GPosIdx, Id};

    fn value(name: &str) -> ir::Value {
        let mut circuit = ir::Circuit::new("C", GPosIdx::UNKNOWN);
        let (_, args) = circuit.add_module(
            "C",
            vec![ir::PortDef::new(name, ir::Type::Clock, GPosIdx::UNKNOWN)],
            GPosIdx::UNKNOWN,
        );
        args[0].clone()
    }

    #[test]
    fn scopes_are_popped_on_drop() {
        let mut table = SymbolTable::default();
        {
            let mut scope = table.push_scope();
            scope
                .declare(Id::from("a"), Some(value("a")), GPosIdx::UNKNOWN)
                .unwrap();
            assert_eq!(scope.depth(), 1);
            assert!(scope.resolve(Id::from("a"), GPosIdx::UNKNOWN).is_ok());
        }
        assert_eq!(table.depth(), 0);
        assert!(table.resolve(Id::from("a"), GPosIdx::UNKNOWN).is_err());
    }

    #[test]
    fn scope_is_popped_on_error() {
        fn fails(table: &mut SymbolTable) -> FirResult<()> {
            let mut scope = table.push_scope();
            scope.declare(Id::from("x"), None, GPosIdx::UNKNOWN)?;
            scope.declare(Id::from("x"), None, GPosIdx::UNKNOWN)?;
            Ok(())
        }
        let mut table = SymbolTable::default();
        let err = fails(&mut table).unwrap_err();
        assert_eq!(err.message(), "redefinition of name 'x'");
        assert_eq!(err.annotations().len(), 1);
        assert_eq!(err.annotations()[0].1, "previous definition here");
        assert_eq!(table.depth(), 0);
    }

    #[test]
    fn nested_scopes_see_outer_names() {
        let mut table = SymbolTable::default();
        let mut outer = table.push_scope();
        outer
            .declare(Id::from("a"), Some(value("a")), GPosIdx::UNKNOWN)
            .unwrap();
        let mut inner = outer.push_scope();
        assert!(inner.resolve(Id::from("a"), GPosIdx::UNKNOWN).is_ok());
        assert!(inner.declare(Id::from("a"), None, GPosIdx::UNKNOWN).is_err());
    }

    #[test]
    fn names_without_values_do_not_resolve() {
        let mut table = SymbolTable::default();
        let mut scope = table.push_scope();
        scope.declare(Id::from("p"), None, GPosIdx::UNKNOWN).unwrap();
        let err = scope.resolve(Id::from("p"), GPosIdx::UNKNOWN).unwrap_err();
        assert_eq!(err.message(), "use of invalid name 'p'");
    }
}
