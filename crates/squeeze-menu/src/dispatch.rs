//! Click dispatcher: turns a click on a menu row into a player command.
//!
//! Clicks on a control (power, play/pause) become a `slim.request` sent on a
//! spawned task; whatever the outcome, the host is then asked to refresh.
//! Any other click on a player row falls through to selecting that player.
//! Nothing is remembered between clicks.

use std::sync::Arc;

use squeeze_proto::protocol::RemoteCommand;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::control::ClickTarget;
use crate::menu::{MenuEntry, PlayerMenu};
use crate::transport::Transport;

/// What the host knows about the element under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickSource {
    /// The data attributes attached to a rendered control.
    Tagged(ClickTarget),
    /// Only the element id is available.
    ElementId(String),
    /// The row itself, not one of its controls.
    Row,
}

impl ClickSource {
    pub fn decode(&self) -> Option<ClickTarget> {
        match self {
            ClickSource::Tagged(target) => Some(target.clone()),
            ClickSource::ElementId(id) => ClickTarget::from_element_id(id),
            ClickSource::Row => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A control was hit; default row selection must not run.
    Command(RemoteCommand),
    /// Ordinary row click: switch the current player.
    Select(String),
    /// Header row or a row that no longer exists.
    Ignored,
}

impl ClickOutcome {
    pub fn suppresses_default(&self) -> bool {
        matches!(self, ClickOutcome::Command(_))
    }

    pub fn command(&self) -> Option<&RemoteCommand> {
        match self {
            ClickOutcome::Command(cmd) => Some(cmd),
            _ => None,
        }
    }
}

/// Decide what a click on `row` means.  Pure; sends nothing.
pub fn handle(menu: &PlayerMenu, row: usize, source: &ClickSource) -> ClickOutcome {
    if let Some(target) = source.decode() {
        return ClickOutcome::Command(target.to_command());
    }
    match menu.entry(row) {
        Some(MenuEntry::Item { player_id, .. }) => ClickOutcome::Select(player_id.clone()),
        _ => ClickOutcome::Ignored,
    }
}

pub struct ClickDispatcher<T: Transport> {
    transport: Arc<T>,
    actions: mpsc::Sender<Action>,
}

impl<T: Transport> ClickDispatcher<T> {
    pub fn new(transport: Arc<T>, actions: mpsc::Sender<Action>) -> Self {
        Self { transport, actions }
    }

    /// Handle a click and kick off whatever it asks for.  The returned outcome
    /// tells the host whether to run its own selection behaviour.
    pub fn click(&self, menu: &PlayerMenu, row: usize, source: &ClickSource) -> ClickOutcome {
        let outcome = handle(menu, row, source);
        self.dispatch(&outcome);
        outcome
    }

    /// Fire-and-forget.  A command is followed by exactly one
    /// `Action::RefreshAll`, sent after the request finishes either way.
    /// A selection is queued before this returns, so selections reach the
    /// host in click order; only a command yields a task handle.
    pub fn dispatch(&self, outcome: &ClickOutcome) -> Option<JoinHandle<()>> {
        match outcome {
            ClickOutcome::Command(command) => {
                let command = command.clone();
                let transport = Arc::clone(&self.transport);
                let actions = self.actions.clone();
                info!("player command: {}", command);
                Some(tokio::spawn(async move {
                    match transport.send(&command).await {
                        Ok(()) => debug!("command done: {}", command),
                        Err(e) => warn!("command {} failed: {}", command, e),
                    }
                    if actions.send(Action::RefreshAll).await.is_err() {
                        debug!("host gone, refresh dropped");
                    }
                }))
            }
            ClickOutcome::Select(player_id) => {
                debug!("select player {}", player_id);
                match self.actions.try_send(Action::SelectPlayer(player_id.clone())) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => debug!("action queue full, selection dropped"),
                    Err(TrySendError::Closed(_)) => debug!("host gone, selection dropped"),
                }
                None
            }
            ClickOutcome::Ignored => None,
        }
    }
}
