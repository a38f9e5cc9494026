//! Lexical scopes stored in an arena.
//!
//! Frames refer to their parent by index, so a child never owns its parent
//! and no reference cycles can form. Frames are never removed: a frame
//! lives as long as the [`Environment`] that created it. Every instantiation
//! opens one, so a long-running `Interpreter` session grows by one frame per
//! object created, even after the object itself is gone.

use super::error::RuntimeError;
use super::value::{walk_members, ObjectValue, RuntimeValue};
use std::collections::HashMap;
use tracing::trace;

/// Handle to one frame of an [`Environment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct Frame {
    variables: HashMap<String, RuntimeValue>,
    parent: Option<ScopeId>,
}

#[derive(Debug)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment holding only the global frame, seeded with
    /// `true`, `false` and `null`.
    pub fn new() -> Self {
        let mut globals = HashMap::new();
        globals.insert("true".to_string(), RuntimeValue::Boolean(true));
        globals.insert("false".to_string(), RuntimeValue::Boolean(false));
        globals.insert("null".to_string(), RuntimeValue::Null);
        Self {
            frames: vec![Frame {
                variables: globals,
                parent: None,
            }],
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Opens a new frame whose lookups fall back to `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.frames.len());
        self.frames.push(Frame {
            variables: HashMap::new(),
            parent: Some(parent),
        });
        trace!(scope = id.0, parent = parent.0, "opened scope");
        id
    }

    /// Number of frames allocated so far, the global frame included.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.frames[scope.0].parent
    }

    /// Binds `name` in `scope` itself. Shadowing a binding of an enclosing
    /// frame is fine; binding the same name twice in one frame is not.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: RuntimeValue,
    ) -> Result<RuntimeValue, RuntimeError> {
        let frame = &mut self.frames[scope.0];
        if frame.variables.contains_key(name) {
            return Err(RuntimeError::DuplicateDeclaration {
                name: name.to_string(),
            });
        }
        trace!(scope = scope.0, name, %value, "declared");
        frame.variables.insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Rebinds `name` in the nearest frame that has it.
    pub fn assign(
        &mut self,
        scope: ScopeId,
        name: &str,
        value: RuntimeValue,
    ) -> Result<RuntimeValue, RuntimeError> {
        let slot = self.lookup_mut(scope, name)?;
        *slot = value.clone();
        trace!(scope = scope.0, name, %value, "assigned");
        Ok(value)
    }

    pub fn get(&self, scope: ScopeId, name: &str) -> Result<RuntimeValue, RuntimeError> {
        let owner = self.resolve(scope, name)?;
        self.frames[owner.0]
            .variables
            .get(name)
            .cloned()
            .ok_or_else(|| unresolved(name))
    }

    /// Finds the frame that binds `name`, starting at `scope` and walking
    /// outwards.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Result<ScopeId, RuntimeError> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let frame = &self.frames[id.0];
            if frame.variables.contains_key(name) {
                return Ok(id);
            }
            current = frame.parent;
        }
        Err(unresolved(name))
    }

    /// Resolves `root.keys[0].keys[1]...` down to the final value.
    pub fn resolve_member(
        &self,
        scope: ScopeId,
        root: &str,
        keys: &[&str],
    ) -> Result<RuntimeValue, RuntimeError> {
        walk_members(self.get(scope, root)?, keys)
    }

    /// Resolves `root.keys[0]...` but stops before the last key, handing out
    /// the object that owns it so the caller can write to it in place.
    pub fn resolve_container(
        &mut self,
        scope: ScopeId,
        root: &str,
        keys: &[&str],
    ) -> Result<&mut ObjectValue, RuntimeError> {
        let Some((last, path)) = keys.split_last() else {
            return Err(RuntimeError::InvalidMemberAccess {
                property: root.to_string(),
            });
        };
        let mut current = self.lookup_mut(scope, root)?;
        for key in path {
            current = current.property_mut(key)?;
        }
        current.as_object_mut(last)
    }

    fn lookup_mut(&mut self, scope: ScopeId, name: &str) -> Result<&mut RuntimeValue, RuntimeError> {
        let owner = self.resolve(scope, name)?;
        self.frames[owner.0]
            .variables
            .get_mut(name)
            .ok_or_else(|| unresolved(name))
    }
}

fn unresolved(name: &str) -> RuntimeError {
    RuntimeError::UnresolvedName {
        name: name.to_string(),
    }
}
