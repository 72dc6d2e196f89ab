//! Core node trait.

use crate::Status;

/// A node evaluated against a caller-owned context.
///
/// Nodes are shared, immutable structure. All mutable decision state goes
/// through `ctx`, so one tree can drive any number of creatures.
pub trait Behavior<C>: Send + Sync {
    fn tick(&self, ctx: &mut C) -> Status;
}

/// Boxed node, the unit composites and builders work with.
pub type Node<C> = Box<dyn Behavior<C>>;

impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}
