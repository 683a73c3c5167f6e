//! Strata pointer input
//!
//! Turns raw host pointer samples into scene-graph events:
//!
//! - **Hit-region index**: flat, paint-ordered interactive regions rebuilt
//!   per committed frame ([`HitRegionIndex`])
//! - **Dispatch**: capture-aware target resolution, target-to-root bubbling,
//!   hover-path diffing, and drag sessions ([`PointerDispatcher`])
//! - **Handlers**: host callbacks keyed by node and event type
//!   ([`HandlerMap`])

pub mod dispatch;
pub mod event;
pub mod handlers;
pub mod hit;

pub use dispatch::{DispatchOutcome, PointerDispatcher};
pub use event::{PointerEvent, PointerEventType};
pub use handlers::{HandlerMap, PointerHandler};
pub use hit::{HitOptions, HitRegion, HitRegionIndex};
