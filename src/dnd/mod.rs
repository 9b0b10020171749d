//! # Drag Activation
//!
//! Decides which activation constraints gate a pointer-initiated drag in the
//! page editor. Mouse presses on a source's handle, touches and every other
//! pointer each get their own constraint set; the chosen set is turned into an
//! ordered list of checks (delay first, then distance) for the drag engine.
//!
//! ```text
//! pointer down ─► ActivationResolver::resolve ─► [Delay, Distance] ─► drag engine
//! ```

mod constraints;
mod sensors;

pub use constraints::{
    ActivationCheck, ActivationConstraints, DelayConstraint, Distance, DistanceConstraint,
};
pub use sensors::{
    ActivationResolver, DragSource, Element, EventTarget, PointerEvent, PointerType, SensorConfig,
};
