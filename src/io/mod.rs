//! I/O adapters (§4.J): the only layer in the crate that touches the file
//! system. The accounting core never imports this module.

pub mod audit_writer;
pub mod event_loader;
pub mod final_state_writer;
pub mod schema;
pub mod snapshot_writer;

pub use audit_writer::write_audit_log;
pub use event_loader::load_events;
pub use final_state_writer::write_final_state;
pub use snapshot_writer::write_snapshots;
