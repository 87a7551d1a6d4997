use super::types::{Func, TypeInfo, Variable};
use crate::error::TypeRegError;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// Append-only store mapping fully-qualified names (and instance type ids)
/// to metadata records.
///
/// Registration happens during single-threaded program initialization in the
/// target system, before concurrent access begins; the store is read-only
/// thereafter. Inserts are nevertheless serialized through one lock so that
/// two records can never receive the same numeric id or silently overwrite
/// the same name. There is no removal or renaming.
///
/// Tests construct isolated instances with [`Registry::new`]; generated
/// registration code typically targets [`Registry::global`].
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    types: IndexMap<String, Arc<TypeInfo>>,
    funcs: IndexMap<String, Arc<Func>>,
    vars: IndexMap<String, Arc<Variable>>,
    consts: IndexMap<String, Arc<Variable>>,
    by_type_id: HashMap<TypeId, Arc<TypeInfo>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Register a type. Fails if the fully-qualified name is already
    /// present; the first registration's identity is preserved. Assigns the
    /// next numeric id and returns the stored handle so callers can chain
    /// further queries.
    pub fn add_type(&self, mut ty: TypeInfo) -> Result<Arc<TypeInfo>, TypeRegError> {
        let mut inner = self.write();
        if inner.types.contains_key(&ty.name) {
            return Err(TypeRegError::DuplicateRegistration(ty.name));
        }
        inner.next_id += 1;
        ty.id = inner.next_id;
        let reflect = ty.reflect_id();
        let ty = Arc::new(ty);
        inner.types.insert(ty.name.clone(), Arc::clone(&ty));
        if let Some(tid) = reflect {
            inner.by_type_id.insert(tid, Arc::clone(&ty));
        }
        Ok(ty)
    }

    /// Register a free function. Same contract as [`Registry::add_type`].
    pub fn add_func(&self, mut func: Func) -> Result<Arc<Func>, TypeRegError> {
        let mut inner = self.write();
        if inner.funcs.contains_key(&func.name) {
            return Err(TypeRegError::DuplicateRegistration(func.name));
        }
        inner.next_id += 1;
        func.id = inner.next_id;
        let func = Arc::new(func);
        inner.funcs.insert(func.name.clone(), Arc::clone(&func));
        Ok(func)
    }

    /// Register a package-level `static`.
    pub fn add_var(&self, mut var: Variable) -> Result<Arc<Variable>, TypeRegError> {
        let mut inner = self.write();
        if inner.vars.contains_key(&var.name) {
            return Err(TypeRegError::DuplicateRegistration(var.name));
        }
        inner.next_id += 1;
        var.id = inner.next_id;
        let var = Arc::new(var);
        inner.vars.insert(var.name.clone(), Arc::clone(&var));
        Ok(var)
    }

    /// Register a package-level `const`.
    pub fn add_const(&self, mut cst: Variable) -> Result<Arc<Variable>, TypeRegError> {
        let mut inner = self.write();
        if inner.consts.contains_key(&cst.name) {
            return Err(TypeRegError::DuplicateRegistration(cst.name));
        }
        inner.next_id += 1;
        cst.id = inner.next_id;
        let cst = Arc::new(cst);
        inner.consts.insert(cst.name.clone(), Arc::clone(&cst));
        Ok(cst)
    }

    /// Look up a type by its fully-qualified name.
    pub fn type_by_name(&self, name: &str) -> Option<Arc<TypeInfo>> {
        self.read().types.get(name).cloned()
    }

    /// Look up a type by a live value's concrete runtime identity.
    ///
    /// Resolution goes through the [`TypeId`] captured from the instance
    /// attached at registration time, not through a name — it works when the
    /// caller only has a value in hand.
    pub fn type_by_value(&self, value: &dyn Any) -> Option<Arc<TypeInfo>> {
        self.read().by_type_id.get(&value.type_id()).cloned()
    }

    /// Look up a function by its fully-qualified name.
    pub fn func_by_name(&self, name: &str) -> Option<Arc<Func>> {
        self.read().funcs.get(name).cloned()
    }

    /// Look up a `static` by its fully-qualified name.
    pub fn var_by_name(&self, name: &str) -> Option<Arc<Variable>> {
        self.read().vars.get(name).cloned()
    }

    /// Look up a `const` by its fully-qualified name.
    pub fn const_by_name(&self, name: &str) -> Option<Arc<Variable>> {
        self.read().consts.get(name).cloned()
    }

    /// All registered types, in registration order.
    pub fn types(&self) -> Vec<Arc<TypeInfo>> {
        self.read().types.values().cloned().collect()
    }

    /// All registered functions, in registration order.
    pub fn funcs(&self) -> Vec<Arc<Func>> {
        self.read().funcs.values().cloned().collect()
    }

    // A poisoned lock means a registration panicked mid-insert; the
    // registry contents are indeterminate and continuing is unsound.
    #[allow(clippy::expect_used)]
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("registry lock poisoned")
    }

    #[allow(clippy::expect_used)]
    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("registry lock poisoned")
    }
}
