pub mod links;
pub mod script;
pub mod scroll;
pub mod sequencer;
