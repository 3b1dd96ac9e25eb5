//! UI side-effect hooks.

/// Side-effect hooks the controller invokes around loading transitions,
/// e.g. showing and hiding a loading overlay. Both default to no-ops,
/// so implementors override only what they need.
pub trait UiHooks: Send + Sync {
    /// A loading indicator should appear.
    fn freeze(&self) {}

    /// The loading indicator should clear.
    fn unfreeze(&self) {}
}

/// Hooks that do nothing. Used when no UI bridge is supplied.
#[derive(Debug, Default)]
pub struct NoopHooks;

impl UiHooks for NoopHooks {}
