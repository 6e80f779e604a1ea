//! Rule type for rendering one node kind.

use std::fmt;
use std::sync::Arc;

use crate::render::{Cursor, Output, Phase, Walk};
use crate::Result;

/// Type alias for render functions
pub type RenderFn = Arc<dyn Fn(&mut Output<'_>, &Cursor<'_>, Phase) -> Result<Walk> + Send + Sync>;

/// A rule renders every node of one kind.
///
/// The render function is called twice per node: with [`Phase::Enter`]
/// before the children are rendered and with [`Phase::Leave`] after.
#[derive(Clone)]
pub struct Rule {
    /// Kind name this rule applies to, see [`NodeKind::name`](crate::NodeKind::name)
    pub kind: String,
    /// Render function
    pub render: RenderFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(kind: &str, render: F) -> Self
    where
        F: Fn(&mut Output<'_>, &Cursor<'_>, Phase) -> Result<Walk> + Send + Sync + 'static,
    {
        Self {
            kind: kind.to_string(),
            render: Arc::new(render),
        }
    }

    /// Create a rule that writes fixed strings around the children
    pub fn wrap(kind: &str, open: &'static str, close: &'static str) -> Self {
        Self::new(kind, move |out, _, phase| {
            out.write_str(match phase {
                Phase::Enter => open,
                Phase::Leave => close,
            })?;
            Ok(Walk::Continue)
        })
    }

    /// Create a rule that writes nothing and renders the children
    pub fn transparent(kind: &str) -> Self {
        Self::new(kind, |_, _, _| Ok(Walk::Continue))
    }

    /// Create a rule that writes nothing and skips the children
    pub fn noop(kind: &str) -> Self {
        Self::new(kind, |_, _, _| Ok(Walk::SkipChildren))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("kind", &self.kind).finish_non_exhaustive()
    }
}
