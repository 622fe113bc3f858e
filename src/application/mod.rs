pub mod directory;
pub mod format;
pub mod ledger;
pub mod sequencer;
pub mod workflow;
