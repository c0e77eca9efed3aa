//! End-to-end tests: real loopback server, scripted display surface.

use super::*;
use crate::codec::{encode_callback, CallbackPayload};
use crate::dispatcher::ActionDispatcher;
use crate::testing::{MockWallet, Script, ScriptedSurfaces, TX_ID};
use serde_json::json;
use wax_server::FileSystemResolver;

struct Fixture {
    _dir: tempfile::TempDir,
    resolver: Arc<dyn ContentResolver>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("web")).unwrap();
    std::fs::write(
        dir.path().join("web/index.html"),
        "<html><script src=\"app.js\"></script></html>",
    )
    .unwrap();
    let resolver: Arc<dyn ContentResolver> = Arc::new(FileSystemResolver::new(dir.path()));
    Fixture { _dir: dir, resolver }
}

fn server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        content_dir: "web".into(),
    }
}

fn bridge(fx: &Fixture, surfaces: &Arc<ScriptedSurfaces>) -> WalletBridge {
    WalletBridge::new(server_config(), Arc::clone(&fx.resolver))
        .with_surfaces(Arc::clone(surfaces) as Arc<dyn SurfaceFactory>)
}

fn page_runner(wallet: MockWallet) -> Arc<ScriptedSurfaces> {
    let dispatcher = ActionDispatcher::with_wallet(Arc::new(wallet)).with_settle_delay(Duration::ZERO);
    Arc::new(ScriptedSurfaces::new(Script::RunPage(Arc::new(dispatcher))))
}

fn events(list: Vec<SurfaceEvent>) -> Arc<ScriptedSurfaces> {
    Arc::new(ScriptedSurfaces::new(Script::Events(list)))
}

/// `host:port` of the first URL the surface loaded.
fn loaded_addr(surfaces: &ScriptedSurfaces) -> String {
    surfaces.with_log(|log| {
        let url = log.loaded[0].trim_start_matches("http://");
        url.split('/').next().unwrap().to_string()
    })
}

// -----------------------------------------------------------------
// Happy paths
// -----------------------------------------------------------------

#[tokio::test]
async fn authenticate_round_trip() {
    let fx = fixture();
    let surfaces = page_runner(MockWallet::new("alice.wam").with_balance("eosio.token", "42.0 WAX"));
    let mut bridge = bridge(&fx, &surfaces);

    let auth = bridge.authenticate(&[]).await.unwrap();

    assert_eq!(auth.user_account, "alice.wam");
    assert_eq!(auth.balance.len(), 1);
    assert_eq!(auth.balance[0].balance, Some(42.0));
    assert_eq!(bridge.state(), BridgeState::Idle);

    surfaces.with_log(|log| {
        assert!(log.loaded[0].ends_with("/#authenticate?tokenContracts=eosio.token"));
        assert!(log.page_bodies[0].contains("app.js"));
        assert_eq!(log.shown, 1);
        assert!(log.closed >= 1);
    });
}

#[tokio::test]
async fn server_is_stopped_after_success() {
    let fx = fixture();
    let surfaces = page_runner(MockWallet::new("alice.wam"));
    let mut bridge = bridge(&fx, &surfaces);

    bridge.authenticate(&["eosio.token".into()]).await.unwrap();
    assert!(std::net::TcpStream::connect(loaded_addr(&surfaces)).is_err());
}

#[tokio::test(flavor = "current_thread")]
async fn current_thread_runtime_stops_server_before_returning() {
    let fx = fixture();
    let surfaces = page_runner(MockWallet::new("alice.wam"));
    let mut bridge = bridge(&fx, &surfaces);

    bridge.authenticate(&[]).await.unwrap();
    assert_eq!(bridge.state(), BridgeState::Idle);
    assert!(std::net::TcpStream::connect(loaded_addr(&surfaces)).is_err());
}

#[tokio::test]
async fn refresh_balance_is_silent() {
    let fx = fixture();
    let surfaces = page_runner(MockWallet::new("alice.wam").with_balance("eosio.token", "3.5 WAX"));
    let mut bridge = bridge(&fx, &surfaces);

    let data = bridge.refresh_balance("eosio.token", "alice.wam").await.unwrap();

    assert_eq!(data.balance.balance, Some(3.5));
    surfaces.with_log(|log| {
        assert_eq!(log.shown, 0);
        assert!(log.options[0].silent);
        assert!(log.loaded[0].ends_with("#refreshBalance?tokenContract=eosio.token&userAccount=alice.wam"));
    });
}

#[tokio::test]
async fn transfer_token_round_trip() {
    let fx = fixture();
    let surfaces = page_runner(MockWallet::new("alice.wam"));
    let mut bridge = bridge(&fx, &surfaces);

    let transfer = TokenTransfer::new("bob.wam", 1.25, "WAX").memo("for coffee");
    let data = bridge.transfer_token(&transfer).await.unwrap();

    assert_eq!(data.transaction_id.as_deref(), Some(TX_ID));
    assert_eq!(data.token_contract.as_deref(), Some("eosio.token"));
    surfaces.with_log(|log| {
        assert!(log.loaded[0].contains("memoContent=for%20coffee"));
        assert!(log.loaded[0].contains("amount=1.25"));
    });
}

#[tokio::test]
async fn transfer_nft_round_trip() {
    let fx = fixture();
    let surfaces = page_runner(MockWallet::new("alice.wam"));
    let mut bridge = bridge(&fx, &surfaces);

    let data = bridge
        .transfer_nft("bob.wam", &["1099".into(), "2000".into()], "")
        .await
        .unwrap();

    assert_eq!(data.transaction_id.as_deref(), Some(TX_ID));
    surfaces.with_log(|log| assert!(log.loaded[0].contains("assetIds=1099%2C2000")));
}

#[tokio::test]
async fn sequential_operations_use_fresh_servers() {
    let fx = fixture();
    let surfaces = page_runner(MockWallet::new("alice.wam").with_balance("eosio.token", "1.0 WAX"));
    let mut bridge = bridge(&fx, &surfaces);

    bridge.authenticate(&[]).await.unwrap();
    bridge.refresh_balance("eosio.token", "alice.wam").await.unwrap();
    surfaces.with_log(|log| assert_eq!(log.loaded.len(), 2));
}

#[tokio::test]
async fn user_agent_reaches_surface() {
    let fx = fixture();
    let surfaces = page_runner(MockWallet::new("alice.wam"));
    let mut bridge = bridge(&fx, &surfaces).with_user_agent("CoconutWax/Android");

    bridge.authenticate(&[]).await.unwrap();
    surfaces.with_log(|log| {
        assert_eq!(log.options[0].user_agent.as_deref(), Some("CoconutWax/Android"));
    });
}

// -----------------------------------------------------------------
// Failure paths
// -----------------------------------------------------------------

#[tokio::test]
async fn rejected_login_surfaces_message() {
    let fx = fixture();
    let surfaces = page_runner(MockWallet::new("alice.wam").failing_login("denied"));
    let mut bridge = bridge(&fx, &surfaces);

    let err = bridge.authenticate(&[]).await.unwrap_err();
    assert!(matches!(err, WaxError::Rejected(_)));
    assert_eq!(err.to_string(), "denied");
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[tokio::test]
async fn close_before_callback_is_unhandled_and_stops_server() {
    let fx = fixture();
    let surfaces = events(vec![SurfaceEvent::CloseRequested]);
    let mut bridge = bridge(&fx, &surfaces);

    let err = bridge.authenticate(&[]).await.unwrap_err();
    assert!(matches!(err, WaxError::Unhandled(_)));
    assert!(std::net::TcpStream::connect(loaded_addr(&surfaces)).is_err());
}

#[tokio::test]
async fn load_error_fails_operation() {
    let fx = fixture();
    let surfaces = events(vec![SurfaceEvent::LoadError {
        code: -1009,
        message: "offline".into(),
    }]);
    let mut bridge = bridge(&fx, &surfaces);

    let err = bridge.authenticate(&[]).await.unwrap_err();
    assert!(matches!(err, WaxError::Load { code: -1009, .. }));
    assert!(err.to_string().contains("offline"));
    surfaces.with_log(|log| assert!(log.closed >= 1));
}

#[tokio::test]
async fn only_first_callback_is_honored() {
    let fx = fixture();
    let first = encode_callback(
        "authenticate",
        &CallbackPayload::success(json!({"userAccount": "first.wam"})),
    )
    .unwrap();
    let second = encode_callback(
        "authenticate",
        &CallbackPayload::success(json!({"userAccount": "second.wam"})),
    )
    .unwrap();
    let surfaces = events(vec![
        SurfaceEvent::Message(first),
        SurfaceEvent::Message(second),
        SurfaceEvent::CloseRequested,
    ]);
    let mut bridge = bridge(&fx, &surfaces);

    let auth = bridge.authenticate(&[]).await.unwrap();
    assert_eq!(auth.user_account, "first.wam");
}

#[tokio::test]
async fn mismatched_action_is_protocol_error() {
    let fx = fixture();
    let wrong = encode_callback("transferToken", &CallbackPayload::success(json!({}))).unwrap();
    let surfaces = events(vec![SurfaceEvent::Message(wrong)]);
    let mut bridge = bridge(&fx, &surfaces);

    let err = bridge.authenticate(&[]).await.unwrap_err();
    assert!(matches!(err, WaxError::Protocol(_)));
}

#[tokio::test]
async fn malformed_callback_is_protocol_error() {
    let fx = fixture();
    let surfaces = events(vec![SurfaceEvent::Message(
        "coconutwax://result?action=authenticate&payload=%%%".into(),
    )]);
    let mut bridge = bridge(&fx, &surfaces);

    let err = bridge.authenticate(&[]).await.unwrap_err();
    assert!(matches!(err, WaxError::Protocol(_)));
}

#[tokio::test]
async fn unknown_route_reply_is_rejected() {
    let fx = fixture();
    let empty = ActionDispatcher::new().with_settle_delay(Duration::ZERO);
    let surfaces = Arc::new(ScriptedSurfaces::new(Script::RunPage(Arc::new(empty))));
    let mut bridge = bridge(&fx, &surfaces);

    let err = bridge.authenticate(&[]).await.unwrap_err();
    assert_eq!(err.to_string(), "Unknown hash detected");
}

#[tokio::test]
async fn callback_timeout() {
    let fx = fixture();
    let surfaces = Arc::new(ScriptedSurfaces::new(Script::Hang));
    let mut bridge = bridge(&fx, &surfaces).with_callback_timeout(Duration::from_millis(150));

    let err = bridge.authenticate(&[]).await.unwrap_err();
    assert!(matches!(err, WaxError::Timeout(_)));
    surfaces.with_log(|log| assert_eq!(log.closed, 1));
    assert!(std::net::TcpStream::connect(loaded_addr(&surfaces)).is_err());
}

#[tokio::test]
async fn missing_surface_factory_is_configuration_error() {
    let fx = fixture();
    let mut bridge = WalletBridge::new(server_config(), Arc::clone(&fx.resolver));

    let err = bridge.authenticate(&[]).await.unwrap_err();
    assert!(matches!(err, WaxError::SurfaceUnavailable(_)));
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[tokio::test]
async fn bind_failure_is_reported() {
    let fx = fixture();
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let config = ServerConfig {
        port: taken.local_addr().unwrap().port(),
        ..server_config()
    };
    let surfaces = events(vec![]);
    let mut bridge = WalletBridge::new(config, Arc::clone(&fx.resolver))
        .with_surfaces(Arc::clone(&surfaces) as Arc<dyn SurfaceFactory>);

    let err = bridge.authenticate(&[]).await.unwrap_err();
    assert!(matches!(err, WaxError::Transport(_)));
    surfaces.with_log(|log| assert!(log.loaded.is_empty()));
}

#[test]
fn from_config_picks_up_display_settings() {
    let fx = fixture();
    let mut config = WaxConfig::default();
    config.display.callback_timeout_secs = 45;
    let bridge = WalletBridge::from_config(&config, Arc::clone(&fx.resolver));
    assert_eq!(bridge.callback_timeout, Some(Duration::from_secs(45)));
    assert_eq!(bridge.server_config.port, 2023);
    assert!(bridge.user_agent.is_none());
}
