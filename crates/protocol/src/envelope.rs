use serde::{Deserialize, Serialize};

use crate::constants::MessageType;
use crate::menu::MenuEntryView;
use crate::types::{PlayerCommand, TrackSnapshot};

/// Errors from encoding or decoding channel messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected {expected} message, got {got}")]
    UnexpectedType {
        expected: MessageType,
        got: MessageType,
    },

    #[error("{0} message has no payload")]
    MissingPayload(MessageType),
}

/// Envelope for all channel communication, one JSON object per line.
///
/// The `payload` field uses `serde_json::value::RawValue` so the type tag
/// can be inspected before the payload is decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Box<serde_json::value::RawValue>>,
}

impl Message {
    /// Creates a new message with the given type and payload.
    pub fn new<T: Serialize>(
        msg_type: MessageType,
        payload: Option<&T>,
    ) -> Result<Self, serde_json::Error> {
        let raw = match payload {
            Some(p) => {
                let json = serde_json::to_string(p)?;
                Some(serde_json::value::RawValue::from_string(json)?)
            }
            None => None,
        };
        Ok(Self {
            msg_type,
            payload: raw,
        })
    }

    /// Builds a `track-info` message.
    pub fn track_info(snapshot: &TrackSnapshot) -> Result<Self, serde_json::Error> {
        Self::new(MessageType::TrackInfo, Some(snapshot))
    }

    /// Builds a `deezer-cmd` message.
    pub fn command(cmd: PlayerCommand) -> Result<Self, serde_json::Error> {
        Self::new(MessageType::DeezerCmd, Some(&cmd))
    }

    /// Builds a `tray-menu` message.
    pub fn tray_menu(entries: &[MenuEntryView]) -> Result<Self, serde_json::Error> {
        Self::new(MessageType::TrayMenu, Some(&entries))
    }

    /// Builds a payload-less message (`show-window`, `destroy`, `tray-close`, `tray-popup`).
    pub fn signal(msg_type: MessageType) -> Self {
        Self {
            msg_type,
            payload: None,
        }
    }

    /// Deserializes the payload into the given type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(
        &self,
    ) -> Result<Option<T>, serde_json::Error> {
        match &self.payload {
            Some(raw) => Ok(Some(serde_json::from_str(raw.get())?)),
            None => Ok(None),
        }
    }

    /// Checks the type tag and decodes the payload, which must be present.
    pub fn expect_payload<T: for<'de> Deserialize<'de>>(
        &self,
        expected: MessageType,
    ) -> Result<T, ProtocolError> {
        if self.msg_type != expected {
            return Err(ProtocolError::UnexpectedType {
                expected,
                got: self.msg_type,
            });
        }
        self.parse_payload()?
            .ok_or(ProtocolError::MissingPayload(expected))
    }

    /// Parses one line of the channel stream.
    pub fn from_line(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line.trim())?)
    }

    /// Encodes the message as a single line (without the trailing newline).
    pub fn to_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
