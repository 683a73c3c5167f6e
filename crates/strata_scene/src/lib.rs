//! Strata retained scene graph
//!
//! An arena-backed node tree driven by host-tree edits:
//!
//! - **Nodes**: tagged kinds (root, group, rect, path, text, ...) with
//!   sanitized, data-only declarative properties
//! - **Edits**: create, append/insert-before, remove, wholesale property
//!   replacement, root assignment
//! - **Transforms**: explicit-matrix or shorthand local transforms, drag
//!   offsets, and accumulated world transforms
//!
//! Children are stored in paint order; parents are non-owning arena keys.

pub mod graph;
pub mod node;
pub mod props;

pub use graph::{AncestorChain, SceneGraph};
pub use node::{NodeId, NodeKind, SceneNode};
pub use props::{resolve_local_transform, NodeProps};
