// Display command - the live guest display for one event
//
// Lifecycle: fetch event + backlog (fatal on failure), show the backlog
// immediately, then go live over WebSocket. Connection loss keeps the list
// on screen and retries in the background; check-ins pushed while offline
// are not recovered.

use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpStream;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use tamu_core::{AttendanceNotice, AttendanceRecord, Event};

use crate::client::Client;
use crate::reveal::RevealQueue;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Frames pushed by the server's live channel. Only new-attendance carries
/// data the display acts on; acks are parsed and dropped.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[allow(dead_code)]
enum ServerFrame {
    NewAttendance { data: AttendanceNotice },
    Joined { event_id: i64 },
    Left { event_id: i64 },
}

/// Backlog page; the event metadata and pagination ride along but only the
/// records matter here.
#[derive(Debug, Deserialize)]
struct BacklogResponse {
    data: Vec<AttendanceRecord>,
}

pub async fn run(client: &Client, quiet: bool, slug: &str, reveal_interval: u64) -> Result<()> {
    // Loading: both fetches are fatal for this view
    let event: Event = client
        .get(&format!("/v1/events/slug/{slug}"))
        .await
        .context("failed to load event")?;
    let backlog: BacklogResponse = client
        .get(&format!("/v1/attendance/event/{}?page_size=1000", event.id))
        .await
        .context("failed to load attendance backlog")?;

    // Connected-Initial: the whole backlog is visible at once, no delay
    let mut queue = RevealQueue::new();
    queue.seed_backlog(backlog.data.iter().map(AttendanceNotice::from));

    if !quiet {
        println!("=== {} ===", event.name);
        println!(
            "{} | {}",
            event.date.format("%A, %d %B %Y %H:%M"),
            event.location.as_deref().unwrap_or("-")
        );
        println!("{} guests checked in so far\n", queue.presented().len());
    }
    for record in queue.presented().iter().rev() {
        print_guest(record);
    }

    // Live: join the event's room
    let mut ws = connect_and_join(client, event.id).await?;
    if !quiet {
        println!("\n● live - new check-ins reveal every {reveal_interval}s");
    }

    let mut interval = tokio::time::interval(Duration::from_secs(reveal_interval));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // Delayed reveal: at most one promotion per tick
            _ = interval.tick() => {
                if let Some(record) = queue.tick() {
                    print_guest(&record);
                    if !quiet && queue.pending() > 0 {
                        println!("  ({} more waiting)", queue.pending());
                    }
                }
            }

            frame = ws.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(ServerFrame::NewAttendance { data }) =
                            serde_json::from_str::<ServerFrame>(text.as_str())
                        {
                            queue.push_live(data);
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                        // Reconnecting: the presented list stays on screen
                        if !quiet {
                            println!("○ offline - reconnecting (missed check-ins stay hidden until restart)");
                        }
                        ws = reconnect(client, event.id).await;
                        if !quiet {
                            println!("● live again");
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }

            _ = tokio::signal::ctrl_c() => {
                if !quiet {
                    println!("\nDisplay closed. {} guests shown.", queue.presented().len());
                }
                break;
            }
        }
    }

    Ok(())
}

async fn connect_and_join(client: &Client, event_id: i64) -> Result<WsStream> {
    let (mut ws, _) = connect_async(client.live_url())
        .await
        .context("failed to connect to live channel")?;
    ws.send(Message::Text(
        json!({"type": "join", "event_id": event_id}).to_string().into(),
    ))
    .await
    .context("failed to join event room")?;
    Ok(ws)
}

/// Retry until the room is joined again. Deliveries missed while offline are
/// gone; only a restart re-fetches the backlog.
async fn reconnect(client: &Client, event_id: i64) -> WsStream {
    loop {
        tokio::time::sleep(RECONNECT_DELAY).await;
        match connect_and_join(client, event_id).await {
            Ok(ws) => return ws,
            Err(_) => continue,
        }
    }
}

fn print_guest(record: &AttendanceNotice) {
    let position = record
        .position
        .as_deref()
        .map(|p| format!(", {p}"))
        .unwrap_or_default();
    println!(
        "{}  {} - {}{} [{}]",
        record.arrival_time.format("%H:%M"),
        record.guest_name,
        record.institution,
        position,
        record.category
    );
}
