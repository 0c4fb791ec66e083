pub mod autosave;
pub mod bus;
pub mod dispatcher;
pub mod events;
pub mod focus;
pub mod ui_state;
pub mod views;
