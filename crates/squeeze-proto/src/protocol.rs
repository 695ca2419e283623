use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// JSON-RPC method every player command goes through.
pub const SLIM_REQUEST: &str = "slim.request";

/// Request id sent with every JSON-RPC call.  The server echoes it back; we
/// never correlate on it.
pub const REQUEST_ID: u32 = 1;

/// One entry of the server's `players_loop`.
///
/// Every field is optional on the wire.  The server sends flags as `0`/`1`,
/// so booleans go through [`lenient_bool`]; anything unrecognised is `false`,
/// which means a descriptor without `connected` is treated as disconnected.
/// Strings go through [`lenient_string`], so a numeric id or a `null` name
/// does not reject the record.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(from = "WireDescriptor")]
pub struct PlayerDescriptor {
    #[serde(rename = "playerid")]
    pub id: String,
    pub name: String,
    pub connected: bool,
    pub isplayer: bool,
    pub isplaying: bool,
    pub power: bool,
    /// Category tag; `"group"` marks synchronization groups.
    pub model: String,
}

/// Descriptor as it arrives.  Older servers send `id` instead of `playerid`,
/// some send both.
#[derive(Deserialize)]
struct WireDescriptor {
    #[serde(default, deserialize_with = "lenient_string")]
    playerid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    connected: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    isplayer: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    isplaying: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    power: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    model: String,
}

impl From<WireDescriptor> for PlayerDescriptor {
    fn from(wire: WireDescriptor) -> Self {
        let id = if wire.playerid.is_empty() {
            wire.id
        } else {
            wire.playerid
        };
        Self {
            id,
            name: wire.name,
            connected: wire.connected,
            isplayer: wire.isplayer,
            isplaying: wire.isplaying,
            power: wire.power,
            model: wire.model,
        }
    }
}

/// Result of the server's `players` query.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayersResponse {
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: Option<u32>,
    /// `None` when the server sent no loop at all; nothing gets built then.
    /// Entries that are not descriptors are dropped, the rest are kept.
    #[serde(default, deserialize_with = "lenient_players")]
    pub players_loop: Option<Vec<PlayerDescriptor>>,
}

impl PlayersResponse {
    pub fn from_json(data: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

/// Accepts `true`/`false`, numbers (non-zero is true) and the strings
/// `"1"`, `"true"`, `"on"`.  Everything else, `null` included, is `false`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("on")
        }
        _ => false,
    })
}

/// Strings as-is, numbers and booleans in their JSON spelling, anything
/// else (`null`, arrays, objects) empty.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_players<'de, D>(deserializer: D) -> Result<Option<Vec<PlayerDescriptor>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => return Ok(None),
        Some(other) => {
            warn!("players_loop is not a list, ignoring it: {}", other);
            return Ok(None);
        }
    };

    let players = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(player) => Some(player),
            Err(e) => {
                warn!("skipping players_loop[{}]: {}", i, e);
                None
            }
        })
        .collect();
    Ok(Some(players))
}

/// A player command ready to be sent to the server.
///
/// `params` is `(verb, args)`: `power 1` becomes `("power", ["1"])`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCommand {
    pub player_id: String,
    pub method: String,
    pub params: (String, Vec<String>),
}

impl RemoteCommand {
    pub fn slim_request(
        player_id: impl Into<String>,
        verb: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            method: SLIM_REQUEST.to_string(),
            params: (verb.into(), args),
        }
    }

    pub fn verb(&self) -> &str {
        &self.params.0
    }

    pub fn args(&self) -> &[String] {
        &self.params.1
    }

    /// The JSON-RPC body the server expects: the player id first, then the
    /// command flattened into one array (`["power", "1"]`).
    pub fn to_request(&self) -> JsonRpcRequest<'_> {
        let mut command = Vec::with_capacity(1 + self.params.1.len());
        command.push(self.params.0.as_str());
        command.extend(self.params.1.iter().map(String::as_str));
        JsonRpcRequest {
            id: REQUEST_ID,
            method: &self.method,
            params: (&self.player_id, command),
        }
    }
}

impl std::fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.player_id, self.params.0)?;
        for arg in &self.params.1 {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Serialized form of a [`RemoteCommand`].
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub id: u32,
    pub method: &'a str,
    pub params: (&'a str, Vec<&'a str>),
}
