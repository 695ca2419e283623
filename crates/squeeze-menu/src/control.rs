//! Per-player control affordances and the click targets they carry.
//!
//! Every rendered control is tagged with a [`ClickTarget`] (player, action,
//! desired state).  Hosts that can hand those attributes back decode them with
//! [`ClickTarget::from_attributes`].  Hosts that only know the element id go
//! through [`ClickTarget::from_element_id`], which accepts the id format
//! `"<player id> <power|play|pause> [args...]"`.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use squeeze_proto::protocol::RemoteCommand;

/// Player id (hex digits and colons), a control keyword, optional arguments.
const ELEMENT_ID_PATTERN: &str = r"(?i)^([0-9a-f:]+) (power|play|pause)(?: (.*))?$";

fn element_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ELEMENT_ID_PATTERN).expect("element id pattern is valid"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Power,
    Play,
    Pause,
}

impl ControlAction {
    /// The server verb for this control.
    pub fn verb(self) -> &'static str {
        match self {
            ControlAction::Power => "power",
            ControlAction::Play => "play",
            ControlAction::Pause => "pause",
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

impl FromStr for ControlAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("power") {
            Ok(ControlAction::Power)
        } else if s.eq_ignore_ascii_case("play") {
            Ok(ControlAction::Play)
        } else if s.eq_ignore_ascii_case("pause") {
            Ok(ControlAction::Pause)
        } else {
            Err(())
        }
    }
}

/// What a click on a control should do, and to which player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClickTarget {
    pub player_id: String,
    pub action: ControlAction,
    /// Arguments after the verb; for power this is the desired state.
    pub args: Vec<String>,
}

impl ClickTarget {
    /// Power control: clicking it sets the opposite of the current state.
    pub fn power_toggle(player_id: &str, powered: bool) -> Self {
        Self {
            player_id: player_id.to_string(),
            action: ControlAction::Power,
            args: vec![if powered { "0" } else { "1" }.to_string()],
        }
    }

    /// Play/pause control: pauses a playing player, plays anything else.
    pub fn play_pause_toggle(player_id: &str, playing: bool) -> Self {
        Self {
            player_id: player_id.to_string(),
            action: if playing {
                ControlAction::Pause
            } else {
                ControlAction::Play
            },
            args: Vec::new(),
        }
    }

    pub fn desired_state(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Decode the data attributes attached to a rendered control.
    pub fn from_attributes(player_id: &str, control: &str, state: Option<&str>) -> Option<Self> {
        if player_id.is_empty() {
            return None;
        }
        let action = control.parse().ok()?;
        Some(Self {
            player_id: player_id.to_string(),
            action,
            args: state
                .filter(|s| !s.is_empty())
                .map(|s| vec![s.to_string()])
                .unwrap_or_default(),
        })
    }

    /// Decode an element id such as `"ab:cd:ef:00:11:22 power 1"`.
    ///
    /// Returns `None` for anything that is not a control id; the caller treats
    /// that as an ordinary row click.
    pub fn from_element_id(element_id: &str) -> Option<Self> {
        let caps = element_id_regex().captures(element_id)?;
        let player_id = caps.get(1)?.as_str();
        let action = caps.get(2)?.as_str().parse().ok()?;
        let args = caps
            .get(3)
            .map(|rest| {
                rest.as_str()
                    .split(' ')
                    .filter(|arg| !arg.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Some(Self {
            player_id: player_id.to_string(),
            action,
            args,
        })
    }

    /// Id assigned to the rendered control element.
    pub fn element_id(&self) -> String {
        let mut id = format!("{} {}", self.player_id, self.action);
        for arg in &self.args {
            id.push(' ');
            id.push_str(arg);
        }
        id
    }

    pub fn to_command(&self) -> RemoteCommand {
        RemoteCommand::slim_request(&self.player_id, self.action.verb(), self.args.clone())
    }
}

/// A clickable icon inside a menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlAffordance {
    /// Image name, without extension; reflects the player's current state.
    pub icon: &'static str,
    pub target: ClickTarget,
}

impl ControlAffordance {
    pub fn power(player_id: &str, powered: bool) -> Self {
        Self {
            icon: if powered { "b_poweron" } else { "b_poweroff" },
            target: ClickTarget::power_toggle(player_id, powered),
        }
    }

    pub fn play_pause(player_id: &str, playing: bool) -> Self {
        Self {
            icon: if playing { "b_pause" } else { "b_play" },
            target: ClickTarget::play_pause_toggle(player_id, playing),
        }
    }
}
