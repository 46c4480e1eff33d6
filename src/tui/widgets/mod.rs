// TUI widget modules for each dashboard panel.

pub mod history;
pub mod quit_confirm;
pub mod roster;
pub mod setup;
pub mod stats;
pub mod status_bar;
pub mod wheel;
