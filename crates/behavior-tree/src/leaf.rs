//! Leaf nodes built from plain functions.

use std::marker::PhantomData;

use crate::{Behavior, Status};

/// Read-only check over the context.
pub struct Condition<C, F> {
    check: F,
    _context: PhantomData<fn(&C)>,
}

impl<C, F> Condition<C, F>
where
    F: Fn(&C) -> bool + Send + Sync,
{
    pub fn new(check: F) -> Self {
        Self {
            check,
            _context: PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for Condition<C, F>
where
    F: Fn(&C) -> bool + Send + Sync,
{
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (self.check)(ctx).into()
    }
}

/// Step that may write its decision into the context.
pub struct Action<C, F> {
    run: F,
    _context: PhantomData<fn(&mut C)>,
}

impl<C, F> Action<C, F>
where
    F: Fn(&mut C) -> Status + Send + Sync,
{
    pub fn new(run: F) -> Self {
        Self {
            run,
            _context: PhantomData,
        }
    }
}

impl<C, F> Behavior<C> for Action<C, F>
where
    F: Fn(&mut C) -> Status + Send + Sync,
{
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (self.run)(ctx)
    }
}
