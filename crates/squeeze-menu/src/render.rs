//! Markup and plain-text renderings of a [`PlayerMenu`].
//!
//! The HTML matches what the dropdown widget expects for a row: the player
//! name followed by the power and play/pause icons.  Each icon keeps the
//! legacy element id and also carries `data-*` attributes, so the host can
//! build a [`ClickSource::Tagged`](crate::dispatch::ClickSource::Tagged)
//! without parsing the id.

use std::fmt::Write;

use htmlescape::encode_minimal;

use crate::control::ControlAffordance;
use crate::menu::{ItemLabel, MenuEntry, PlayerMenu};

fn control_html(control: &ControlAffordance, webroot: &str) -> String {
    let target = &control.target;
    format!(
        r#"<img src="{}html/images/{}.gif" id="{}" data-player="{}" data-control="{}" data-state="{}">"#,
        encode_minimal(webroot),
        control.icon,
        encode_minimal(&target.element_id()),
        encode_minimal(&target.player_id),
        target.action,
        encode_minimal(target.desired_state().unwrap_or_default()),
    )
}

/// Row markup for one player.
pub fn item_html(label: &ItemLabel, webroot: &str) -> String {
    format!(
        r#"<div>{}<span class="browsedbControls">{}&nbsp;{}</span></div>"#,
        encode_minimal(&label.title),
        control_html(&label.power, webroot),
        control_html(&label.play_pause, webroot),
    )
}

pub fn header_html(title: &str) -> String {
    format!(r#"<span class="menu-title">{}</span>"#, encode_minimal(title))
}

/// One line per entry, for terminals.
///
/// ```text
/// [x] Kitchen            power:on   [pause]  ab:cd:ef:00:11:22
/// --- Groups ---
/// ```
pub fn render_text(menu: &PlayerMenu) -> String {
    let mut out = String::new();
    if let Some(header) = &menu.header_label {
        let _ = writeln!(out, "Player: {header}");
    }
    for entry in &menu.entries {
        match entry {
            MenuEntry::Item {
                player_id,
                label,
                selected,
                ..
            } => {
                let power = if label.power.icon == "b_poweron" {
                    "on"
                } else {
                    "off"
                };
                let play_pause = format!("[{}]", label.play_pause.target.action);
                let _ = writeln!(
                    out,
                    "[{}] {:<18} power:{:<4} {:<8} {}",
                    if *selected { 'x' } else { ' ' },
                    label.title,
                    power,
                    play_pause,
                    player_id,
                );
            }
            MenuEntry::GroupHeader { title, .. } => {
                let _ = writeln!(out, "--- {title} ---");
            }
        }
    }
    out
}
