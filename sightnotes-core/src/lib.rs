//! Core logic for the SightNotes viewer.
//!
//! Everything here is UI-agnostic: the section parser and filename decoder are
//! pure functions, the poller and session store talk to a [`source::NoteSource`],
//! and the view coordinator is a plain state machine. The `sightnotes` binary
//! wires these into its event loop.

pub mod error;
pub mod filename;
pub mod poller;
pub mod sections;
pub mod source;
pub mod store;
pub mod types;
pub mod view;
