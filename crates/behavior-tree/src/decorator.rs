//! Single-child decorators.

use crate::{Behavior, Node, Status};

/// Logical NOT of its child.
pub struct Inverter<C> {
    child: Node<C>,
}

impl<C> Inverter<C> {
    pub fn new(child: Node<C>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Inverter<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        self.child.tick(ctx).invert()
    }
}

/// Runs its child and reports success either way.
///
/// Used for optional steps inside a [`crate::Sequence`].
pub struct AlwaysSucceed<C> {
    child: Node<C>,
}

impl<C> AlwaysSucceed<C> {
    pub fn new(child: Node<C>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for AlwaysSucceed<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        let _ = self.child.tick(ctx);
        Status::Success
    }
}

/// Runs `body` only when `guard` succeeds; fails otherwise.
///
/// Same as a two-child sequence, kept separate so trees read as
/// "when X do Y" branches of a selector.
pub struct Guard<C> {
    guard: Node<C>,
    body: Node<C>,
}

impl<C> Guard<C> {
    pub fn new(guard: Node<C>, body: Node<C>) -> Self {
        Self { guard, body }
    }
}

impl<C> Behavior<C> for Guard<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        if self.guard.tick(ctx).is_failure() {
            return Status::Failure;
        }
        self.body.tick(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{action, condition};

    fn bump(result: Status) -> Node<i32> {
        action(move |v: &mut i32| {
            *v += 1;
            result
        })
    }

    #[test]
    fn inverter_flips_result() {
        let inv = Inverter::new(condition(|v: &i32| *v > 0));
        assert_eq!(inv.tick(&mut 5), Status::Failure);
        assert_eq!(inv.tick(&mut -5), Status::Success);
    }

    #[test]
    fn always_succeed_still_runs_child() {
        let node = AlwaysSucceed::new(bump(Status::Failure));
        let mut value = 0;
        assert_eq!(node.tick(&mut value), Status::Success);
        assert_eq!(value, 1);
    }

    #[test]
    fn guard_skips_body_when_closed() {
        let node = Guard::new(condition(|v: &i32| *v >= 10), bump(Status::Success));
        let mut value = 0;
        assert_eq!(node.tick(&mut value), Status::Failure);
        assert_eq!(value, 0);

        value = 10;
        assert_eq!(node.tick(&mut value), Status::Success);
        assert_eq!(value, 11);
    }
}
