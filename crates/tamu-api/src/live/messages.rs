// WebSocket frame types for the live display channel

use serde::{Deserialize, Serialize};

use tamu_core::AttendanceNotice;

/// Frames a display sends to the server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WsInbound {
    /// Subscribe to an event's room.
    Join { event_id: i64 },
    /// Unsubscribe from an event's room.
    Leave { event_id: i64 },
}

/// Frames the server pushes to displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WsOutbound {
    /// A guest just checked in to an event this display subscribed to.
    NewAttendance { data: AttendanceNotice },
    /// Acknowledges a join; the display is now live for this event.
    Joined { event_id: i64 },
    /// Acknowledges a leave.
    Left { event_id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_frames_use_kebab_case_tags() {
        let frame: WsInbound = serde_json::from_str(r#"{"type":"join","event_id":7}"#).unwrap();
        assert!(matches!(frame, WsInbound::Join { event_id: 7 }));

        let frame: WsInbound = serde_json::from_str(r#"{"type":"leave","event_id":7}"#).unwrap();
        assert!(matches!(frame, WsInbound::Leave { event_id: 7 }));
    }

    #[test]
    fn new_attendance_frame_shape() {
        let json = serde_json::to_value(&WsOutbound::Joined { event_id: 3 }).unwrap();
        assert_eq!(json["type"], "joined");
        assert_eq!(json["event_id"], 3);
    }
}
