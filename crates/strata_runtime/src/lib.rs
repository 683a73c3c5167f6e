//! Strata container runtime
//!
//! Ties the scene graph, pointer input, and frame encoder together behind
//! one [`Container`] per canvas:
//!
//! - Host-tree edits mutate the retained scene and mark a frame pending
//! - `tick()` commits: rebuild the hit index, encode a full snapshot, hand
//!   it to the external [`RenderBackend`]
//! - Raw pointer samples route through the dispatcher against the index of
//!   the last completed tick
//!
//! Backend failures surface through an error callback and never interrupt
//! pointer dispatch.

pub mod backend;
pub mod container;
pub mod error;

pub use backend::{NullBackend, RenderBackend};
pub use container::{Container, ContainerConfig, ErrorCallback};
pub use error::{BackendError, ContainerError, Result};
