use crate::expr::Val;
use rustc_hash::FxHashMap;
use std::{cell::RefCell, rc::Rc};

pub type ScopeLink = Rc<RefCell<Scope>>;

/// One level of variable bindings. Lookups and assignments walk outward
/// through `parent` until a binding is found; the global scope has none.
#[derive(Debug, PartialEq, Default)]
pub struct Scope {
    vars: FxHashMap<Rc<str>, Val>,
    parent: Option<ScopeLink>,
}

impl Scope {
    pub fn try_get_here(&self, id: &str) -> Option<Val> {
        self.vars.get(id).cloned()
    }

    pub fn get(&self, id: &str) -> Option<Val> {
        if let Some(val) = self.vars.get(id) {
            return Some(val.clone());
        }

        // self is of type &Scope, the rest of the elements
        // of the chain are of type ScopeLink.
        let mut cur = self.parent.clone();
        while let Some(link) = cur {
            let borrow = (*link).borrow();
            if let Some(val) = borrow.vars.get(id) {
                return Some(val.clone());
            }
            cur = borrow.parent.clone();
        }
        None
    }

    /// Updates the nearest existing binding. Returns `false` if `id` isn't
    /// bound anywhere in the chain.
    pub fn assign(&mut self, id: &str, val: Val) -> bool {
        if let Some(slot) = self.vars.get_mut(id) {
            *slot = val;
            return true;
        }

        let mut cur = self.parent.clone();
        while let Some(link) = cur {
            let mut borrow = (*link).borrow_mut();
            if let Some(slot) = borrow.vars.get_mut(id) {
                *slot = val;
                return true;
            }
            cur = borrow.parent.clone();
        }
        false
    }

    /// Binds `id` in this scope only, shadowing any outer binding.
    pub fn declare(&mut self, id: Rc<str>, val: Val) {
        self.vars.insert(id, val);
    }

    pub fn new_child(this: ScopeLink) -> Scope {
        Scope {
            vars: Default::default(),
            parent: Some(this),
        }
    }
}
