//! Notifications the menu sends back to its host controller.

/// All actions that can flow from the menu to the host.
/// The dispatcher produces Actions; the host loop consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A row was clicked outside its controls: make this the current player.
    SelectPlayer(String),
    /// Re-query the server and rebuild everything.
    RefreshAll,
}
