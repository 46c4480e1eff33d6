// Roster, history, and the selection lifecycle.

pub mod history;
pub mod roster;
pub mod selector;

pub use history::{History, HistoryEntry};
pub use roster::{Participant, Roster, RosterStats};
pub use selector::{SelectionPhase, SelectionPolicy, Selector, SelectorError};
