// ABOUTME: Command implementations for each migration step
// ABOUTME: Exports the export and verify commands

pub mod export;
pub mod verify;

pub use export::export;
pub use verify::verify;
