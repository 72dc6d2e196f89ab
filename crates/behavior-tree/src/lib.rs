//! Small behavior tree library for tick-driven creature AI.
//!
//! A tree is evaluated once per decision window. Nodes finish within the
//! evaluation that started them: there is no `Running` status and no node
//! keeps hidden state between evaluations. Anything that must persist
//! (current target, last decision) lives in the context `C` the caller owns.
//!
//! - [`Behavior`]: node trait, generic over the context
//! - [`Status`]: `Success` or `Failure`
//! - Leaves: [`Condition`], [`Action`]
//! - Composites: [`Sequence`], [`Selector`]
//! - Decorators: [`Inverter`], [`AlwaysSucceed`], [`Guard`]
//!
//! Trees are usually assembled with the helpers in [`builder`].

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod status;

pub use behavior::{Behavior, Node};
pub use composite::{Selector, Sequence};
pub use decorator::{AlwaysSucceed, Guard, Inverter};
pub use leaf::{Action, Condition};
pub use status::Status;
