//! Drives the HTTP transport and the click dispatcher against an in-process
//! server that speaks just enough of `/jsonrpc.js` to record what it gets.
//!
//! Run with: cargo test --test jsonrpc_transport

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};

use squeeze_menu::{
    Action, ClickDispatcher, ClickSource, JsonRpcTransport, MenuBuilder, MenuEntry, Transport,
    TransportError,
};
use squeeze_proto::config::ServerConfig;
use squeeze_proto::protocol::{PlayersResponse, RemoteCommand};
use squeeze_proto::strings::StringTable;

type Seen = Arc<Mutex<Vec<Value>>>;

async fn record(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    let params = body["params"].clone();
    seen.lock().await.push(body);
    Json(json!({ "id": 1, "method": "slim.request", "params": params, "result": {} }))
}

async fn serve(app: Router) -> ServerConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    ServerConfig {
        base_url: format!("http://{addr}/"),
        request_timeout_secs: 5,
    }
}

async fn recording_server() -> (ServerConfig, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/jsonrpc.js", post(record))
        .with_state(Arc::clone(&seen));
    (serve(app).await, seen)
}

#[tokio::test]
async fn transport_posts_flattened_slim_request() {
    let (server, seen) = recording_server().await;
    let transport = JsonRpcTransport::new(&server).expect("client");
    assert!(transport.url().ends_with("/jsonrpc.js"));

    let cmd = RemoteCommand::slim_request("ab:cd:ef:00:11:22", "power", vec!["1".to_string()]);
    transport.send(&cmd).await.expect("send should succeed");

    let seen = seen.lock().await;
    assert_eq!(
        *seen,
        vec![json!({
            "id": 1,
            "method": "slim.request",
            "params": ["ab:cd:ef:00:11:22", ["power", "1"]],
        })]
    );
}

#[tokio::test]
async fn server_error_is_reported() {
    let app = Router::new().route(
        "/jsonrpc.js",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let server = serve(app).await;
    let transport = JsonRpcTransport::new(&server).expect("client");

    let cmd = RemoteCommand::slim_request("ab:cd", "play", Vec::new());
    match transport.send(&cmd).await {
        Err(TransportError::Status(status)) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn menu_click_reaches_server_and_requests_refresh() {
    let (server, seen) = recording_server().await;

    let response = PlayersResponse::from_json(
        r#"{"count": 2, "players_loop": [
            {"playerid": "00:04:20:12:34:56", "name": "Kitchen", "connected": 1,
             "isplayer": 1, "isplaying": 1, "power": 1, "model": "squeezelite"},
            {"playerid": "00:04:20:ab:cd:ef", "name": "Bedroom", "connected": 1,
             "isplayer": 1, "isplaying": 0, "power": 0, "model": "boom"}
        ]}"#,
    )
    .expect("players response");
    let players = response.players_loop.expect("players_loop");

    let strings = StringTable::default();
    let menu = MenuBuilder::new(&strings).build(&players, Some("00:04:20:12:34:56"), None);
    assert_eq!(menu.header_label.as_deref(), Some("Kitchen"));

    // Bedroom sorts first; click its power icon using the tagged attributes.
    let (row, target) = menu
        .entries
        .iter()
        .enumerate()
        .find_map(|(row, entry)| match entry {
            MenuEntry::Item {
                player_id, label, ..
            } if player_id == "00:04:20:ab:cd:ef" => Some((row, label.power.target.clone())),
            _ => None,
        })
        .expect("bedroom row");
    assert_eq!(row, 0);

    let (tx, mut rx) = mpsc::channel(4);
    let transport = Arc::new(JsonRpcTransport::new(&server).expect("client"));
    let dispatcher = ClickDispatcher::new(transport, tx);

    let outcome = dispatcher.click(&menu, row, &ClickSource::Tagged(target));
    assert!(outcome.suppresses_default());
    assert_eq!(rx.recv().await, Some(Action::RefreshAll));

    // Same effect through the legacy element id on the playing Kitchen row.
    let outcome = dispatcher.click(
        &menu,
        1,
        &ClickSource::ElementId("00:04:20:12:34:56 pause".to_string()),
    );
    assert!(outcome.suppresses_default());
    assert_eq!(rx.recv().await, Some(Action::RefreshAll));

    let seen = seen.lock().await;
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0]["params"], json!(["00:04:20:ab:cd:ef", ["power", "1"]]));
    assert_eq!(seen[1]["params"], json!(["00:04:20:12:34:56", ["pause"]]));
}

#[tokio::test]
async fn unreachable_server_still_requests_refresh() {
    // Grab a free port, then close it so the connection is refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let server = ServerConfig {
        base_url: format!("http://{addr}"),
        request_timeout_secs: 2,
    };
    let (tx, mut rx) = mpsc::channel(4);
    let transport = Arc::new(JsonRpcTransport::new(&server).expect("client"));
    let dispatcher = ClickDispatcher::new(transport, tx);

    let outcome = dispatcher.click(
        &Default::default(),
        0,
        &ClickSource::ElementId("ab:cd:ef:00:11:22 power 0".to_string()),
    );
    assert!(outcome.suppresses_default());
    assert_eq!(rx.recv().await, Some(Action::RefreshAll));
}
