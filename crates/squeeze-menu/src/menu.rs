//! Menu builder: turns a players response into dropdown entries.
//!
//! One synchronous pass: drop disconnected players, sort, build a labelled
//! row per player, and defer rows whose model has its own submenu.  Deferred
//! rows are appended after every ordinary row, one header per model, models
//! in the order they were first seen.

use std::cmp::Ordering;

use squeeze_proto::config::MenuConfig;
use squeeze_proto::protocol::PlayerDescriptor;
use squeeze_proto::strings::{group_title_key, Localize};
use tracing::debug;

use crate::control::ControlAffordance;

/// Model tag that is grouped by default.
pub const GROUP_MODEL: &str = "group";

type PlayerOrder = Box<dyn Fn(&PlayerDescriptor, &PlayerDescriptor) -> Ordering + Send + Sync>;

/// Case-insensitive name order, ties broken by id.
pub fn by_name(a: &PlayerDescriptor, b: &PlayerDescriptor) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

/// Text shown for one player row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLabel {
    pub title: String,
    pub power: ControlAffordance,
    pub play_pause: ControlAffordance,
}

impl ItemLabel {
    pub fn for_player(player: &PlayerDescriptor) -> Self {
        Self {
            title: player.name.clone(),
            power: ControlAffordance::power(&player.id, player.power),
            play_pause: ControlAffordance::play_pause(&player.id, player.isplaying),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item {
        player_id: String,
        label: ItemLabel,
        selected: bool,
        model_tag: String,
    },
    GroupHeader {
        group_key: String,
        title: String,
    },
}

impl MenuEntry {
    pub fn player_id(&self) -> Option<&str> {
        match self {
            MenuEntry::Item { player_id, .. } => Some(player_id),
            MenuEntry::GroupHeader { .. } => None,
        }
    }

    pub fn is_item(&self) -> bool {
        matches!(self, MenuEntry::Item { .. })
    }
}

/// Name and kind of a connected player, for the host's sync dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
    pub is_player: bool,
}

/// Everything one build produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerMenu {
    /// Name of the current player, shown on the dropdown button.
    pub header_label: Option<String>,
    pub entries: Vec<MenuEntry>,
    pub players: Vec<PlayerSummary>,
}

impl PlayerMenu {
    pub fn items(&self) -> impl Iterator<Item = &MenuEntry> {
        self.entries.iter().filter(|e| e.is_item())
    }

    pub fn entry(&self, row: usize) -> Option<&MenuEntry> {
        self.entries.get(row)
    }
}

/// Deferred rows keyed by model, in first-seen model order.
#[derive(Debug, Default)]
struct GroupBuckets {
    buckets: Vec<(String, Vec<MenuEntry>)>,
}

impl GroupBuckets {
    fn push(&mut self, model: &str, entry: MenuEntry) {
        match self.buckets.iter_mut().find(|(key, _)| key == model) {
            Some((_, entries)) => entries.push(entry),
            None => self.buckets.push((model.to_string(), vec![entry])),
        }
    }

    fn drain_into(self, out: &mut Vec<MenuEntry>, strings: &dyn Localize) {
        for (model, entries) in self.buckets {
            out.push(MenuEntry::GroupHeader {
                title: strings.string_for(&group_title_key(&model)),
                group_key: model,
            });
            out.extend(entries);
        }
    }
}

pub struct MenuBuilder<'a> {
    strings: &'a dyn Localize,
    grouped_models: Vec<String>,
    order: PlayerOrder,
}

impl<'a> MenuBuilder<'a> {
    pub fn new(strings: &'a dyn Localize) -> Self {
        Self {
            strings,
            grouped_models: vec![GROUP_MODEL.to_string()],
            order: Box::new(by_name),
        }
    }

    pub fn from_config(strings: &'a dyn Localize, config: &MenuConfig) -> Self {
        Self::new(strings).grouped_models(config.grouped_models.clone())
    }

    pub fn grouped_models(mut self, models: Vec<String>) -> Self {
        self.grouped_models = models;
        self
    }

    /// Replace the default name order.
    pub fn with_order<F>(mut self, order: F) -> Self
    where
        F: Fn(&PlayerDescriptor, &PlayerDescriptor) -> Ordering + Send + Sync + 'static,
    {
        self.order = Box::new(order);
        self
    }

    fn is_grouped(&self, model: &str) -> bool {
        self.grouped_models.iter().any(|m| m == model)
    }

    pub fn build(
        &self,
        descriptors: &[PlayerDescriptor],
        current_player: Option<&str>,
        selected_player: Option<&str>,
    ) -> PlayerMenu {
        let mut players: Vec<&PlayerDescriptor> =
            descriptors.iter().filter(|p| p.connected).collect();
        players.sort_by(|a, b| (self.order)(*a, *b));

        let mut menu = PlayerMenu::default();
        let mut deferred = GroupBuckets::default();

        for player in players {
            if current_player == Some(player.id.as_str()) {
                menu.header_label = Some(player.name.clone());
            }

            menu.players.push(PlayerSummary {
                id: player.id.clone(),
                name: player.name.clone(),
                is_player: player.isplayer,
            });

            let entry = MenuEntry::Item {
                player_id: player.id.clone(),
                label: ItemLabel::for_player(player),
                selected: selected_player == Some(player.id.as_str()),
                model_tag: player.model.clone(),
            };

            if self.is_grouped(&player.model) {
                deferred.push(&player.model, entry);
            } else {
                menu.entries.push(entry);
            }
        }

        deferred.drain_into(&mut menu.entries, self.strings);

        debug!(
            "built player menu: {} players, {} entries",
            menu.players.len(),
            menu.entries.len()
        );
        menu
    }
}
