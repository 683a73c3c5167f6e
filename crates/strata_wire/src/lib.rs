//! Strata binary frame protocol
//!
//! The encoder walks the committed scene tree and produces the append-only
//! op stream consumed by the external renderer: a `BeginFrame` header,
//! rect/path/text ops carrying their resolved world transforms, and an
//! `EndFrame` terminator. Every frame is a complete snapshot.

pub mod encoder;
pub mod ops;
pub mod path;

pub use encoder::{FrameEncoder, FrameParams};
pub use ops::{OP_BEGIN_FRAME, OP_END_FRAME, OP_PATH, OP_RECT, OP_TEXT};
pub use path::is_valid_path_data;
