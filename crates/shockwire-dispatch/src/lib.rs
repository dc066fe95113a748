//! Per-revision packet dispatch for Shockwire.
//!
//! A [`DispatchTable`] is the runtime face of one generation run: an
//! immutable map from numeric packet id to a compiled decoder/encoder.
//! The external transport peels a frame, looks up its id here, and gets
//! back either a decoded packet object or a typed, recoverable miss.
//!
//! Tables are built once at load time and never mutated afterwards, so
//! they can be shared read-only across any number of connection
//! handlers without locking. Each loaded revision gets its own table;
//! revisions are fully isolated from one another.

mod error;
mod table;

pub use error::DispatchError;
pub use table::DispatchTable;
