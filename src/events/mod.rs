//! Event vocabulary and listener bookkeeping.

mod diagnostics;
mod kind;
mod payload;
mod registry;

pub use diagnostics::{Diagnostics, DIAGNOSTICS_CAPACITY};
pub use kind::EventKind;
pub use payload::{EventPayload, FrameInfo};
pub use registry::{
    ListenerError, ListenerFailure, ListenerRegistry, ListenerResult, SubscriptionId,
};
