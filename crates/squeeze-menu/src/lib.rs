//! Player dropdown: builds the menu of connected players and turns clicks on
//! its per-player controls into server commands.

pub mod action;
pub mod control;
pub mod dispatch;
pub mod menu;
pub mod render;
pub mod transport;

pub use action::Action;
pub use control::{ClickTarget, ControlAction, ControlAffordance};
pub use dispatch::{handle, ClickDispatcher, ClickOutcome, ClickSource};
pub use menu::{MenuBuilder, MenuEntry, PlayerMenu};
pub use transport::{JsonRpcTransport, Transport, TransportError};
