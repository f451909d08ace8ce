//! In-memory database driver for tests

use crate::core::FirekitResult;
use crate::di::traits::DatabaseDriver;
use crate::guard::{ensure_env_not_prod, EnvGuard};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard};

/// Database driver backed by a single JSON tree
///
/// Mirrors how the Realtime Database treats paths: `/`-separated segments
/// address nested children, reading a parent returns its subtree, deleting a
/// parent removes its children, and writing `null` (or an empty object) is a
/// delete. Parents left empty by a delete are pruned.
#[derive(Debug)]
pub struct MemoryDatabaseDriver {
    root: Mutex<Value>,
}

impl MemoryDatabaseDriver {
    /// Create an empty driver after checking the process environment
    ///
    /// # Errors
    ///
    /// [`FirekitError::UnsafeEnvironment`](crate::core::FirekitError::UnsafeEnvironment)
    /// if the environment looks like production.
    pub fn new() -> FirekitResult<Self> {
        ensure_env_not_prod()?;
        Ok(Self::empty())
    }

    /// Create an empty driver, checking `guard` instead of the process-wide one
    pub fn with_guard(guard: &EnvGuard) -> FirekitResult<Self> {
        guard.ensure_safe()?;
        Ok(Self::empty())
    }

    fn empty() -> Self {
        Self {
            root: Mutex::new(Value::Object(Map::new())),
        }
    }

    fn root(&self) -> MutexGuard<'_, Value> {
        self.root
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        is_vacant(&self.root())
    }

    /// Remove every document
    pub fn reset_documents(&self) {
        *self.root() = Value::Object(Map::new());
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Drop nulls and empty objects, the way the server stores a write
fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let map: Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| prune(v).map(|v| (k, v)))
                .collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        other => Some(other),
    }
}

fn insert_at(node: &mut Value, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let child = map.entry(first.to_string()).or_insert(Value::Null);
        insert_at(child, rest, value);
    }
}

fn remove_at(node: &mut Value, segments: &[&str]) {
    let Some((first, rest)) = segments.split_first() else {
        *node = Value::Object(Map::new());
        return;
    };
    let Value::Object(map) = node else {
        return;
    };
    if rest.is_empty() {
        map.remove(*first);
    } else if let Some(child) = map.get_mut(*first) {
        remove_at(child, rest);
        if is_vacant(child) {
            map.remove(*first);
        }
    }
}

#[async_trait]
impl DatabaseDriver for MemoryDatabaseDriver {
    async fn get_document(&self, path: &str) -> FirekitResult<Option<Value>> {
        let root = self.root();
        let mut node = &*root;
        for segment in segments(path) {
            match node.get(segment) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok((!is_vacant(node)).then(|| node.clone()))
    }

    async fn set_document(&self, path: &str, value: Value) -> FirekitResult<()> {
        let segments = segments(path);
        let mut root = self.root();
        match prune(value) {
            Some(value) => insert_at(&mut root, &segments, value),
            None => remove_at(&mut root, &segments),
        }
        Ok(())
    }

    async fn delete_document(&self, path: &str) -> FirekitResult<()> {
        remove_at(&mut self.root(), &segments(path));
        Ok(())
    }
}
