//! Integration tests for the session actor: routing of private replies
//! and broadcasts to per-connection channels.

use chessify_protocol::{MoveRequest, Role, ServerMessage, Side};
use chessify_rules::{RulesEngine, RulesError, StandardChess};
use chessify_session::{SessionError, SessionHandle, spawn_session};
use chessify_transport::ConnectionId;
use tokio::sync::mpsc;

const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";

// =========================================================================
// Helpers
// =========================================================================

struct Peer {
    id: ConnectionId,
    rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl Peer {
    /// Drains everything delivered so far.
    fn drain(&mut self) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }
}

fn start() -> SessionHandle {
    spawn_session::<StandardChess>(16)
}

async fn join(session: &SessionHandle, id: u64) -> (Role, Peer) {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = ConnectionId::new(id);
    let role = session.connect(id, tx).await.expect("connect");
    (role, Peer { id, rx })
}

/// Waits until the actor has processed everything queued before this call.
async fn settle(session: &SessionHandle) {
    session.info().await.expect("info");
}

fn state(fen: &str) -> ServerMessage {
    ServerMessage::State { fen: fen.into() }
}

fn rejection(reason: &str) -> ServerMessage {
    ServerMessage::MoveRejected {
        reason: reason.into(),
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_connect_pushes_role_then_state() {
    let session = start();
    let (role, mut p1) = join(&session, 1).await;

    assert_eq!(role, Role::White);
    assert_eq!(
        p1.drain(),
        vec![ServerMessage::Role { role: Role::White }, state(START)]
    );
}

#[tokio::test]
async fn test_join_does_not_notify_others() {
    let session = start();
    let (_, mut p1) = join(&session, 1).await;
    p1.drain();

    let (_, _p2) = join(&session, 2).await;
    settle(&session).await;

    assert!(p1.drain().is_empty());
}

#[tokio::test]
async fn test_accepted_move_reaches_players_and_spectators() {
    let session = start();
    let (_, mut white) = join(&session, 1).await;
    let (_, mut black) = join(&session, 2).await;
    let (role, mut watcher) = join(&session, 3).await;
    assert_eq!(role, Role::Spectator);
    white.drain();
    black.drain();
    watcher.drain();

    session
        .submit_move(white.id, MoveRequest::new("e2", "e4"))
        .await
        .unwrap();
    settle(&session).await;

    for peer in [&mut white, &mut black, &mut watcher] {
        assert_eq!(peer.drain(), vec![state(AFTER_E4)]);
    }
}

#[tokio::test]
async fn test_rejection_reaches_only_requester() {
    let session = start();
    let (_, mut white) = join(&session, 1).await;
    let (_, mut black) = join(&session, 2).await;
    let (_, mut watcher) = join(&session, 3).await;
    white.drain();
    black.drain();
    watcher.drain();

    session
        .submit_move(black.id, MoveRequest::new("e7", "e5"))
        .await
        .unwrap();
    settle(&session).await;

    assert_eq!(black.drain(), vec![rejection("not your turn")]);
    assert!(white.drain().is_empty());
    assert!(watcher.drain().is_empty());

    let info = session.info().await.unwrap();
    assert_eq!(info.position.as_deref(), Some(START));
}

#[tokio::test]
async fn test_broadcast_skips_disconnected_peers() {
    let session = start();
    let (_, mut white) = join(&session, 1).await;
    let (_, black) = join(&session, 2).await;
    let (_, mut watcher) = join(&session, 3).await;
    white.drain();
    watcher.drain();

    session.disconnect(watcher.id).await.unwrap();
    session
        .submit_move(white.id, MoveRequest::new("e2", "e4"))
        .await
        .unwrap();
    settle(&session).await;

    assert_eq!(white.drain(), vec![state(AFTER_E4)]);
    assert!(watcher.drain().is_empty());
    drop(black);
}

#[tokio::test]
async fn test_late_joiner_sees_current_position() {
    let session = start();
    let (_, white) = join(&session, 1).await;
    let (_, _black) = join(&session, 2).await;
    session
        .submit_move(white.id, MoveRequest::new("e2", "e4"))
        .await
        .unwrap();

    let (role, mut late) = join(&session, 3).await;

    assert_eq!(role, Role::Spectator);
    assert_eq!(
        late.drain(),
        vec![ServerMessage::Role { role: Role::Spectator }, state(AFTER_E4)]
    );
}

#[tokio::test]
async fn test_info_tracks_seats_and_reset() {
    let session = start();

    let info = session.info().await.unwrap();
    assert!(!info.active);
    assert_eq!(info.position, None);

    let (_, p1) = join(&session, 1).await;
    let (_, p2) = join(&session, 2).await;
    let (_, p3) = join(&session, 3).await;

    let info = session.info().await.unwrap();
    assert!(info.active);
    assert_eq!(info.white, Some(p1.id));
    assert_eq!(info.black, Some(p2.id));
    assert_eq!(info.connections, 3);

    session.disconnect(p1.id).await.unwrap();
    session.disconnect(p2.id).await.unwrap();

    let info = session.info().await.unwrap();
    assert!(!info.active);
    assert_eq!(info.white, None);
    assert_eq!(info.black, None);
    assert_eq!(info.connections, 1);
    drop(p3);
}

#[tokio::test]
async fn test_reset_is_silent_and_next_game_is_fresh() {
    let session = start();
    let (_, mut white) = join(&session, 1).await;
    let (_, black) = join(&session, 2).await;
    let (_, mut watcher) = join(&session, 3).await;
    session
        .submit_move(white.id, MoveRequest::new("e2", "e4"))
        .await
        .unwrap();
    settle(&session).await;
    white.drain();
    watcher.drain();

    session.disconnect(white.id).await.unwrap();
    session.disconnect(black.id).await.unwrap();
    settle(&session).await;
    assert!(watcher.drain().is_empty(), "reset sends nothing");

    let (role, mut next) = join(&session, 4).await;
    assert_eq!(role, Role::White);
    assert_eq!(
        next.drain(),
        vec![ServerMessage::Role { role: Role::White }, state(START)]
    );
}

#[tokio::test]
async fn test_handle_fails_after_shutdown() {
    let session = start();
    session.shutdown().await.unwrap();

    // Give the actor a moment to drop its receiver.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let result = session.info().await;
    assert!(matches!(result, Err(SessionError::Unavailable)));
}

/// An engine that panics whenever a game is created.
struct BrokenSetup;

impl RulesEngine for BrokenSetup {
    type Position = ();

    fn initial_position() {
        panic!("cannot set up the board")
    }

    fn active_side(_: &()) -> Side {
        Side::White
    }

    fn apply(_: &(), _: &MoveRequest) -> Result<(), RulesError> {
        Ok(())
    }

    fn serialize(_: &()) -> String {
        String::new()
    }
}

#[tokio::test]
async fn test_actor_survives_engine_panic_on_connect() {
    let session = spawn_session::<BrokenSetup>(16);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let role = session
        .connect(ConnectionId::new(1), tx)
        .await
        .expect("actor must answer despite the panic");
    assert_eq!(role, Role::Spectator);
    assert_eq!(
        rx.try_recv().ok(),
        Some(ServerMessage::Role {
            role: Role::Spectator
        })
    );

    let info = session.info().await.expect("actor is still running");
    assert!(!info.active);
    assert_eq!(info.connections, 1);
}
