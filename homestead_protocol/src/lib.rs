// homestead_protocol — read-only network projections of colony state.
//
// This crate defines the snapshot types a server sends to remote viewers and
// the byte-level codec they travel in. It is shared between the sim side
// (which produces views) and any display side (which consumes them), and has
// no dependency on the sim crate.
//
// Module overview:
// - `codec.rs`:   Primitive big-endian write/read helpers over any
//                 `Write`/`Read` stream (ints, floats, bools, strings).
// - `view.rs`:    `CitizenView` — the public fields of one citizen,
//                 serialized in a fixed field order.
// - `framing.rs`: Length-delimited framing: 4-byte big-endian length prefix,
//                 then payload.
//
// Design decisions:
// - **Fixed field order, no self-description.** Views are written field by
//   field in a documented order so the byte stream is deterministic — the
//   same citizen state always produces the same bytes. Schema evolution is
//   handled by versioning the enclosing frame, not the view.
// - **No async runtime.** Plain `std::io::Read`/`Write`, compatible with
//   blocking TCP streams, buffered wrappers, and in-memory cursors.

pub mod codec;
pub mod framing;
pub mod view;

pub use framing::{MAX_MESSAGE_SIZE, read_frame, write_frame};
pub use view::{CitizenView, ViewPos};
