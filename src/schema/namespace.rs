//! Lexically scoped namespace tracking.
//!
//! Avro names without a namespace inherit the namespace of the closest
//! enclosing named type. The stack mirrors the nesting of namespace-declaring
//! definitions in the document: the walker pushes on entry and pops on exit.

use tracing::trace;

use crate::error::NamespaceError;

/// Stack of namespaces in scope. The bottom frame is the default (empty)
/// namespace and can never be popped.
#[derive(Debug, Clone)]
pub struct NamespaceStack {
    frames: Vec<String>,
}

impl Default for NamespaceStack {
    fn default() -> Self {
        Self {
            frames: vec![String::new()],
        }
    }
}

impl NamespaceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// The namespace currently in scope. Empty for the default namespace.
    pub fn current(&self) -> &str {
        self.frames.last().map(String::as_str).unwrap_or("")
    }

    /// Enter a scope with a new namespace.
    ///
    /// # Errors
    /// [`NamespaceError::InvalidNamespace`] if `namespace` is empty,
    /// [`NamespaceError::RedundantNamespace`] if it is already current.
    pub fn push(&mut self, namespace: &str) -> Result<(), NamespaceError> {
        if namespace.is_empty() {
            return Err(NamespaceError::InvalidNamespace);
        }
        if namespace == self.current() {
            return Err(NamespaceError::RedundantNamespace {
                namespace: namespace.to_string(),
            });
        }
        trace!(namespace, depth = self.frames.len(), "push namespace");
        self.frames.push(namespace.to_string());
        Ok(())
    }

    /// Leave the innermost pushed scope.
    ///
    /// # Errors
    /// [`NamespaceError::Underflow`] if only the default frame is left.
    pub fn pop(&mut self) -> Result<String, NamespaceError> {
        if self.frames.len() <= 1 {
            return Err(NamespaceError::Underflow);
        }
        let popped = self.frames.pop().ok_or(NamespaceError::Underflow)?;
        trace!(namespace = %popped, depth = self.frames.len(), "pop namespace");
        Ok(popped)
    }

    /// Number of pushed frames above the default namespace.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_default_namespace() {
        let stack = NamespaceStack::new();
        assert_eq!(stack.current(), "");
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_push_and_pop_nested() {
        let mut stack = NamespaceStack::new();
        stack.push("com.example").unwrap();
        stack.push("com.example.inner").unwrap();
        assert_eq!(stack.current(), "com.example.inner");
        assert_eq!(stack.depth(), 2);

        assert_eq!(stack.pop().unwrap(), "com.example.inner");
        assert_eq!(stack.current(), "com.example");
        stack.pop().unwrap();
        assert_eq!(stack.current(), "");
    }

    #[test]
    fn test_push_empty_is_invalid() {
        let mut stack = NamespaceStack::new();
        assert_eq!(stack.push(""), Err(NamespaceError::InvalidNamespace));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_push_same_namespace_is_redundant() {
        let mut stack = NamespaceStack::new();
        stack.push("a.b").unwrap();
        assert_eq!(
            stack.push("a.b"),
            Err(NamespaceError::RedundantNamespace {
                namespace: "a.b".to_string()
            })
        );
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_same_namespace_allowed_after_a_different_one() {
        let mut stack = NamespaceStack::new();
        stack.push("a").unwrap();
        stack.push("b").unwrap();
        stack.push("a").unwrap();
        assert_eq!(stack.depth(), 3);
    }

    #[test]
    fn test_pop_sentinel_underflows() {
        let mut stack = NamespaceStack::new();
        assert_eq!(stack.pop(), Err(NamespaceError::Underflow));
        stack.push("x").unwrap();
        stack.pop().unwrap();
        assert_eq!(stack.pop(), Err(NamespaceError::Underflow));
        assert_eq!(stack.current(), "");
    }
}
