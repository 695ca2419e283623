use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use squeeze_proto::config::Config;
use squeeze_proto::protocol::PlayersResponse;
use tokio::sync::mpsc;

use squeeze_menu::render::{header_html, item_html, render_text};
use squeeze_menu::{
    Action, ClickDispatcher, ClickSource, JsonRpcTransport, MenuBuilder, MenuEntry, PlayerMenu,
};

#[derive(Parser, Debug)]
#[command(name = "squeeze-menu", version, about = "Player dropdown for Squeezebox servers")]
struct Cli {
    /// Config file (default: ~/.config/squeeze-menu/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the menu from a `players` query response (JSON file or `-`).
    Menu {
        input: String,
        /// Player shown on the dropdown button.
        #[arg(long)]
        current: Option<String>,
        /// Player checked in the list.
        #[arg(long)]
        selected: Option<String>,
        /// Print row markup instead of text.
        #[arg(long)]
        html: bool,
    },
    /// Act on a control element id, e.g. "00:04:20:12:34:56 power 1".
    Click { element_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Menu {
            input,
            current,
            selected,
            html,
        } => print_menu(&config, &input, current.as_deref(), selected.as_deref(), html),
        Commands::Click { element_id } => click(&config, element_id).await,
    }
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

fn print_menu(
    config: &Config,
    input: &str,
    current: Option<&str>,
    selected: Option<&str>,
    html: bool,
) -> anyhow::Result<()> {
    let response = PlayersResponse::from_json(&read_input(input)?)?;
    let Some(players) = response.players_loop else {
        tracing::warn!("response has no players_loop, nothing to show");
        return Ok(());
    };

    let strings = config.strings.load_table()?;
    let menu = MenuBuilder::from_config(&strings, &config.menu).build(&players, current, selected);

    if !html {
        print!("{}", render_text(&menu));
        return Ok(());
    }

    if let Some(header) = &menu.header_label {
        println!("<!-- {} -->", header);
    }
    for entry in &menu.entries {
        match entry {
            MenuEntry::Item { label, .. } => println!("{}", item_html(label, &config.menu.webroot)),
            MenuEntry::GroupHeader { title, .. } => println!("{}", header_html(title)),
        }
    }
    Ok(())
}

async fn click(config: &Config, element_id: String) -> anyhow::Result<()> {
    let transport = Arc::new(JsonRpcTransport::new(&config.server)?);
    tracing::info!("server endpoint: {}", transport.url());

    let (action_tx, mut action_rx) = mpsc::channel::<Action>(4);
    let dispatcher = ClickDispatcher::new(transport, action_tx);

    let source = ClickSource::ElementId(element_id.clone());
    let outcome = dispatcher.click(&PlayerMenu::default(), 0, &source);
    drop(dispatcher);

    let Some(command) = outcome.command() else {
        println!("{element_id}: not a player control, default selection applies");
        return Ok(());
    };

    while let Some(action) = action_rx.recv().await {
        if action == Action::RefreshAll {
            println!("sent {command}; refresh requested");
        }
    }
    Ok(())
}
