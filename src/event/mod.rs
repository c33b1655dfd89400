pub mod args;
pub mod event_type;
pub mod factory;
pub mod identity;
pub mod midi_event;
pub mod state;
