//! Compilation-wide auxiliary state.
//!
//! A [`CompilationContext`] is the handle the surrounding driver threads through every
//! dataflow query. It carries ancillary information collaborators may consult while
//! building graphs or running analyses, such as the name of the source file under
//! analysis.
//!
//! The context is deliberately excluded from every cache key: two queries for the same
//! analyzable unit must collide even when their contexts are distinct objects, as long
//! as those contexts are semantically equivalent. The caching layer therefore treats
//! the context as opaque pass-through data and never compares it.

use std::rc::Rc;

/// Auxiliary compilation state passed alongside dataflow queries.
///
/// Cloning a context is cheap; clones share the same underlying data. Equality is
/// intentionally not implemented, so the context can never accidentally become part
/// of a cache key.
///
/// # Examples
///
/// ```rust
/// use flowscope::context::CompilationContext;
///
/// let ctx = CompilationContext::with_source_name("Widget.java");
/// assert_eq!(ctx.source_name(), Some("Widget.java"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompilationContext {
    inner: Rc<ContextInner>,
}

#[derive(Debug, Default)]
struct ContextInner {
    source_name: Option<String>,
}

impl CompilationContext {
    /// Creates an empty compilation context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compilation context annotated with the name of the source under analysis.
    ///
    /// The name shows up in collaborator error messages and log events; it has no effect
    /// on caching.
    #[must_use]
    pub fn with_source_name(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                source_name: Some(name.into()),
            }),
        }
    }

    /// Returns the source name this context was annotated with, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.inner.source_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_has_no_source_name() {
        assert_eq!(CompilationContext::new().source_name(), None);
    }

    #[test]
    fn test_clones_share_source_name() {
        let ctx = CompilationContext::with_source_name("A.java");
        let clone = ctx.clone();
        assert_eq!(clone.source_name(), Some("A.java"));
    }
}
