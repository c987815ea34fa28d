//! In-memory reference store for tests and ephemeral use.

use std::collections::HashMap;
use std::sync::RwLock;

use gitm_types::ObjectId;

use crate::error::{RefError, RefResult};
use crate::names::validate_ref_name;
use crate::traits::RefStore;
use crate::types::{Head, Ref};

/// An in-memory implementation of [`RefStore`].
///
/// All data lives behind `RwLock`s and is lost when the store is dropped.
#[derive(Debug)]
pub struct InMemoryRefStore {
    refs: RwLock<HashMap<String, Ref>>,
    head: RwLock<Option<Head>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store.
    pub fn new() -> Self {
        Self {
            refs: RwLock::new(HashMap::new()),
            head: RwLock::new(None),
        }
    }
}

impl Default for InMemoryRefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RefStore for InMemoryRefStore {
    fn read_ref(&self, name: &str) -> RefResult<Option<Ref>> {
        let refs = self.refs.read().expect("lock poisoned");
        Ok(refs.get(name).cloned())
    }

    fn write_ref(&self, name: &str, reference: &Ref) -> RefResult<()> {
        validate_ref_name(reference.short_name())?;

        let mut refs = self.refs.write().expect("lock poisoned");
        if reference.is_tag() {
            if let Some(existing) = refs.get(name) {
                if existing.is_tag() {
                    return Err(RefError::TagImmutable {
                        name: name.to_string(),
                    });
                }
            }
        }
        refs.insert(name.to_string(), reference.clone());
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> RefResult<bool> {
        {
            let head = self.head.read().expect("lock poisoned");
            if let Some(Head::Symbolic(current)) = head.as_ref() {
                if name == format!("refs/heads/{current}") {
                    return Err(RefError::DeleteCurrentBranch {
                        name: current.clone(),
                    });
                }
            }
        }
        let mut refs = self.refs.write().expect("lock poisoned");
        Ok(refs.remove(name).is_some())
    }

    fn list_refs(&self, prefix: &str) -> RefResult<Vec<(String, Ref)>> {
        let refs = self.refs.read().expect("lock poisoned");
        let mut result: Vec<(String, Ref)> = refs
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        result.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(result)
    }

    fn head(&self) -> RefResult<Option<Head>> {
        Ok(self.head.read().expect("lock poisoned").clone())
    }

    fn set_head(&self, branch: &str) -> RefResult<()> {
        validate_ref_name(branch)?;
        *self.head.write().expect("lock poisoned") = Some(Head::Symbolic(branch.to_string()));
        Ok(())
    }

    fn set_head_detached(&self, target: ObjectId) -> RefResult<()> {
        *self.head.write().expect("lock poisoned") = Some(Head::Detached(target));
        Ok(())
    }
}
