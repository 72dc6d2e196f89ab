//! Constructors returning boxed nodes, so trees read top-down.
//!
//! ```
//! use behavior_tree::builder::{action, condition, guarded, selector};
//! use behavior_tree::{Behavior, Status};
//!
//! let tree = selector(vec![
//!     guarded(condition(|n: &i32| *n < 0), action(|n: &mut i32| { *n = 0; Status::Success })),
//!     action(|n: &mut i32| { *n += 1; Status::Success }),
//! ]);
//! let mut n = -4;
//! tree.tick(&mut n);
//! assert_eq!(n, 0);
//! ```

use crate::{
    Action, AlwaysSucceed, Behavior, Condition, Guard, Inverter, Node, Selector, Sequence,
    Status,
};

#[inline]
pub fn sequence<C: 'static>(children: Vec<Node<C>>) -> Node<C> {
    Box::new(Sequence::new(children))
}

#[inline]
pub fn selector<C: 'static>(children: Vec<Node<C>>) -> Node<C> {
    Box::new(Selector::new(children))
}

#[inline]
pub fn inverter<C: 'static>(child: Node<C>) -> Node<C> {
    Box::new(Inverter::new(child))
}

#[inline]
pub fn always_succeed<C: 'static>(child: Node<C>) -> Node<C> {
    Box::new(AlwaysSucceed::new(child))
}

/// `body` runs only when `guard` succeeds.
#[inline]
pub fn guarded<C: 'static>(guard: Node<C>, body: Node<C>) -> Node<C> {
    Box::new(Guard::new(guard, body))
}

#[inline]
pub fn condition<C: 'static, F>(check: F) -> Node<C>
where
    F: Fn(&C) -> bool + Send + Sync + 'static,
{
    Box::new(Condition::new(check))
}

#[inline]
pub fn action<C: 'static, F>(run: F) -> Node<C>
where
    F: Fn(&mut C) -> Status + Send + Sync + 'static,
{
    Box::new(Action::new(run))
}

/// Wraps any concrete node.
#[inline]
pub fn node<C: 'static, B: Behavior<C> + 'static>(behavior: B) -> Node<C> {
    Box::new(behavior)
}
