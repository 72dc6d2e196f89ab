//! Composite nodes: ordered AND ([`Sequence`]) and prioritized OR ([`Selector`]).

use crate::{Behavior, Node, Status};

/// Ticks children left to right and stops at the first failure.
///
/// An empty sequence succeeds.
pub struct Sequence<C> {
    children: Vec<Node<C>>,
}

impl<C> Sequence<C> {
    pub fn new(children: Vec<Node<C>>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_failure() {
                return Status::Failure;
            }
        }
        Status::Success
    }
}

/// Ticks children in priority order and stops at the first success.
///
/// An empty selector fails.
pub struct Selector<C> {
    children: Vec<Node<C>>,
}

impl<C> Selector<C> {
    pub fn new(children: Vec<Node<C>>) -> Self {
        Self { children }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            if child.tick(ctx).is_success() {
                return Status::Success;
            }
        }
        Status::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{action, condition};

    fn push(tag: char, result: Status) -> Node<Vec<char>> {
        action(move |log: &mut Vec<char>| {
            log.push(tag);
            result
        })
    }

    #[test]
    fn sequence_short_circuits_on_failure() {
        let seq = Sequence::new(vec![
            push('a', Status::Success),
            push('b', Status::Failure),
            push('c', Status::Success),
        ]);
        let mut log = Vec::new();
        assert_eq!(seq.tick(&mut log), Status::Failure);
        assert_eq!(log, vec!['a', 'b']);
    }

    #[test]
    fn selector_takes_first_success_in_priority_order() {
        let sel = Selector::new(vec![
            push('a', Status::Failure),
            push('b', Status::Success),
            push('c', Status::Success),
        ]);
        let mut log = Vec::new();
        assert_eq!(sel.tick(&mut log), Status::Success);
        assert_eq!(log, vec!['a', 'b']);
    }

    #[test]
    fn empty_composites() {
        let mut log: Vec<char> = Vec::new();
        assert_eq!(Sequence::new(Vec::new()).tick(&mut log), Status::Success);
        assert_eq!(Selector::new(Vec::new()).tick(&mut log), Status::Failure);
    }

    #[test]
    fn selector_of_failing_conditions_fails() {
        let sel: Selector<Vec<char>> = Selector::new(vec![
            condition(|log: &Vec<char>| !log.is_empty()),
            condition(|log: &Vec<char>| log.len() > 3),
        ]);
        assert_eq!(sel.tick(&mut Vec::new()), Status::Failure);
    }
}
