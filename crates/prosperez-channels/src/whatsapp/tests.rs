use super::connection::{split_message, MAX_MESSAGE_LEN};
use super::events::{failure_reason, forward, message_content, watch_run, CLOSE_GRACE};
use super::qr::generate_qr_terminal;
use super::WhatsAppConnector;
use prosperez_core::config::SessionConfig;
use prosperez_core::message::{InboundEvent, MessageKind, NotifyKind};
use prosperez_core::traits::{DisconnectReason, LifecycleEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use wacore::types::events::{
    ClientOutdated, ConnectFailure, ConnectFailureReason, Connected, Disconnected, Event,
    LoggedOut, PairSuccess, StreamError, StreamReplaced, TempBanReason, TemporaryBan,
};
use wacore::types::message::MessageInfo;
use wacore_binary::jid::Jid;

#[test]
fn test_split_short_message() {
    let chunks = split_message("hello", MAX_MESSAGE_LEN);
    assert_eq!(chunks, vec!["hello"]);
}

#[test]
fn test_split_long_message_on_newlines() {
    let text = "a\n".repeat(3000);
    let chunks = split_message(&text, 4096);
    assert!(chunks.len() >= 2);
    for chunk in &chunks {
        assert!(chunk.len() <= 4096);
        assert!(chunk.ends_with('\n'));
    }
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_split_respects_char_boundaries() {
    // Four-byte emoji, no newlines: cuts must land between code points.
    let text = "🏓".repeat(10);
    let chunks = split_message(&text, 9);
    assert_eq!(chunks.concat(), text);
    for chunk in &chunks {
        assert!(chunk.len() <= 9);
        assert_eq!(chunk.chars().count(), 2);
    }
}

#[test]
fn test_menu_sized_text_is_one_chunk() {
    let text = "│➽ command\n".repeat(400);
    assert_eq!(split_message(&text, MAX_MESSAGE_LEN).len(), 1);
}

#[test]
fn test_personal_jid_parses() {
    let jid: Result<Jid, _> = "123@s.whatsapp.net".parse();
    assert!(jid.is_ok());
}

#[test]
fn test_content_plain_conversation() {
    let msg = waproto::whatsapp::Message {
        conversation: Some(".ping".to_string()),
        ..Default::default()
    };
    let content = message_content(&msg).unwrap();
    assert_eq!(content.body(), Some(".ping"));
    assert_eq!(content.kind(), MessageKind::PlainText);
}

#[test]
fn test_content_image_caption() {
    let msg = waproto::whatsapp::Message {
        image_message: Some(Box::new(waproto::whatsapp::message::ImageMessage {
            caption: Some(".menu".to_string()),
            ..Default::default()
        })),
        ..Default::default()
    };
    let content = message_content(&msg).unwrap();
    assert_eq!(content.body(), Some(".menu"));
    assert_eq!(content.kind(), MessageKind::MediaCaption);
}

#[test]
fn test_content_without_text_fields_is_none() {
    let msg = waproto::whatsapp::Message::default();
    assert!(message_content(&msg).is_none());
}

#[test]
fn test_generate_qr_terminal() {
    let qr = generate_qr_terminal("2@pairing-ref,noise-key,identity-key,adv-secret").unwrap();
    assert!(!qr.is_empty());
    let widths: Vec<usize> = qr.lines().map(|l| l.chars().count()).collect();
    assert!(widths.windows(2).all(|w| w[0] == w[1]), "rows must be equal width");
    assert!(qr.contains('█') || qr.contains('▀') || qr.contains('▄'));
}

#[test]
fn test_session_paths() {
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().to_string_lossy().to_string();
    let connector = WhatsAppConnector::new(SessionConfig {
        data_dir: data_dir.clone(),
        device_name: "Test".into(),
    });
    assert_eq!(
        connector.session_db_path(),
        format!("{data_dir}/whatsapp_session/whatsapp.db")
    );
    assert!(!connector.has_session());

    std::fs::create_dir_all(format!("{data_dir}/whatsapp_session")).unwrap();
    std::fs::write(connector.session_db_path(), b"").unwrap();
    assert!(connector.has_session());
}

struct Forwarded {
    lifecycle: Vec<LifecycleEvent>,
    messages: Vec<InboundEvent>,
}

async fn forward_one(event: Event) -> Forwarded {
    let (ltx, mut lrx) = mpsc::channel(4);
    let (mtx, mut mrx) = mpsc::channel(4);
    forward(event, &ltx, &mtx).await;
    drop((ltx, mtx));

    let mut out = Forwarded {
        lifecycle: Vec::new(),
        messages: Vec::new(),
    };
    while let Some(event) = lrx.recv().await {
        out.lifecycle.push(event);
    }
    while let Some(event) = mrx.recv().await {
        out.messages.push(event);
    }
    out
}

async fn lifecycle_of(event: Event) -> Vec<LifecycleEvent> {
    let out = forward_one(event).await;
    assert!(out.messages.is_empty());
    out.lifecycle
}

fn closed(reason: DisconnectReason) -> Vec<LifecycleEvent> {
    vec![LifecycleEvent::Closed(reason)]
}

#[tokio::test]
async fn test_forward_connection_events() {
    assert_eq!(
        lifecycle_of(Event::Connected(Connected)).await,
        vec![LifecycleEvent::Open]
    );
    assert_eq!(
        lifecycle_of(Event::Disconnected(Disconnected)).await,
        closed(DisconnectReason::ConnectionLost)
    );
    assert_eq!(
        lifecycle_of(Event::LoggedOut(LoggedOut {
            on_connect: false,
            reason: ConnectFailureReason::LoggedOut,
        }))
        .await,
        closed(DisconnectReason::LoggedOut)
    );
}

#[tokio::test]
async fn test_forward_pairing_events() {
    assert_eq!(
        lifecycle_of(Event::PairingQrCode {
            code: "2@ref,noise".to_string(),
            timeout: Duration::from_secs(60),
        })
        .await,
        vec![LifecycleEvent::PairingQr("2@ref,noise".to_string())]
    );
    assert_eq!(
        lifecycle_of(Event::PairSuccess(PairSuccess {
            id: Jid::default(),
            lid: Jid::default(),
            business_name: String::new(),
            platform: "android".to_string(),
        }))
        .await,
        vec![LifecycleEvent::CredentialsUpdated]
    );
}

#[tokio::test]
async fn test_forward_stream_replaced_closes() {
    assert_eq!(
        lifecycle_of(Event::StreamReplaced(StreamReplaced)).await,
        closed(DisconnectReason::ConnectionLost)
    );
}

#[tokio::test]
async fn test_forward_client_outdated_closes() {
    assert_eq!(
        lifecycle_of(Event::ClientOutdated(ClientOutdated)).await,
        closed(DisconnectReason::Unknown)
    );
}

#[tokio::test]
async fn test_forward_temporary_ban_closes() {
    let ban = TemporaryBan {
        code: TempBanReason::BlockedByUsers,
        expire: chrono::Duration::seconds(3600),
    };
    assert_eq!(
        lifecycle_of(Event::TemporaryBan(ban)).await,
        closed(DisconnectReason::ConnectionLost)
    );
}

#[tokio::test]
async fn test_forward_stream_error_closes() {
    let err = StreamError {
        code: "500".to_string(),
        raw: None,
    };
    assert_eq!(
        lifecycle_of(Event::StreamError(err)).await,
        closed(DisconnectReason::Unknown)
    );
}

#[tokio::test]
async fn test_forward_connect_failure_closes() {
    let failure = |reason| {
        Event::ConnectFailure(ConnectFailure {
            reason,
            message: String::new(),
            raw: None,
        })
    };
    assert_eq!(
        lifecycle_of(failure(ConnectFailureReason::Generic)).await,
        closed(DisconnectReason::ConnectionLost)
    );
    assert_eq!(
        lifecycle_of(failure(ConnectFailureReason::MainDeviceGone)).await,
        closed(DisconnectReason::LoggedOut)
    );
}

#[test]
fn test_failure_reason_mapping() {
    for reason in [
        ConnectFailureReason::LoggedOut,
        ConnectFailureReason::MainDeviceGone,
        ConnectFailureReason::UnknownLogout,
    ] {
        assert_eq!(failure_reason(reason), DisconnectReason::LoggedOut, "{reason:?}");
    }
    for reason in [
        ConnectFailureReason::Generic,
        ConnectFailureReason::TempBanned,
        ConnectFailureReason::ClientOutdated,
        ConnectFailureReason::BadUserAgent,
    ] {
        assert_eq!(
            failure_reason(reason),
            DisconnectReason::ConnectionLost,
            "{reason:?}"
        );
    }
}

#[tokio::test]
async fn test_forward_message_is_live_notify() {
    let mut info = MessageInfo::default();
    info.source.chat = "123@s.whatsapp.net".parse().unwrap();
    info.source.sender = "123@s.whatsapp.net".parse().unwrap();
    let msg = waproto::whatsapp::Message {
        conversation: Some(".ping".to_string()),
        ..Default::default()
    };

    let out = forward_one(Event::Message(Box::new(msg), info)).await;
    assert!(out.lifecycle.is_empty());
    assert_eq!(out.messages.len(), 1);
    let event = &out.messages[0];
    assert_eq!(event.kind, NotifyKind::Notify);
    assert_eq!(event.chat_id, "123@s.whatsapp.net");
    assert_eq!(event.sender, "123");
    assert_eq!(event.text(), Some(".ping"));
}

#[tokio::test]
async fn test_forward_ignores_unrelated_events() {
    let out = forward_one(Event::OfflineSyncCompleted(
        wacore::types::events::OfflineSyncCompleted { count: 0 },
    ))
    .await;
    assert!(out.lifecycle.is_empty());
    assert!(out.messages.is_empty());
}

#[tokio::test]
async fn test_run_loop_exit_reports_close() {
    let (tx, mut rx) = mpsc::channel(4);
    let run = tokio::spawn(async {});
    tokio::spawn(watch_run(run, tx));

    let event = tokio::time::timeout(CLOSE_GRACE + Duration::from_secs(2), rx.recv())
        .await
        .expect("close not reported");
    assert_eq!(event, Some(LifecycleEvent::Closed(DisconnectReason::Unknown)));
}

#[tokio::test]
async fn test_precise_close_lands_before_run_loop_fallback() {
    let (tx, mut rx) = mpsc::channel(4);
    let (mtx, _mrx) = mpsc::channel(4);
    let run = tokio::spawn(async {});
    tokio::spawn(watch_run(run, tx.clone()));

    // Event handlers run as their own tasks; one finishing just after the
    // run loop still wins within the grace period.
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        forward(
            Event::LoggedOut(LoggedOut {
                on_connect: true,
                reason: ConnectFailureReason::LoggedOut,
            }),
            &tx,
            &mtx,
        )
        .await;
    });

    let first = tokio::time::timeout(Duration::from_secs(3), rx.recv())
        .await
        .unwrap();
    assert_eq!(first, Some(LifecycleEvent::Closed(DisconnectReason::LoggedOut)));
}
