//! Function relocation operations.
//!
//! [`move_func::relocate_function`] is the entry point. The other modules
//! are its building blocks and are public so front ends can report on
//! references and imports without moving anything.

pub mod imports;
pub mod locate;
pub mod move_func;
pub mod references;
pub mod relocate;
pub mod scope;

pub use locate::{locate, Located};
pub use move_func::{relocate_function, MoveReport, MoveRequest, Outcome, Ports};
pub use references::{find_references, find_value_references, Reference, ReferenceKind};
pub use relocate::{export_name, Relocation, Relocator};
