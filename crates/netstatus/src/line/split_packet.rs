use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ConsoleLine, LineType};

static SPLIT_PACKET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<-- \[(.{3})\] Split packet +(\d+)/ *(\d+) seq +(\d+) size +(\d+) mtu +(\d+) from (.+) \[ total +(\d+) \]$",
    )
    .expect("invalid split packet pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketType {
    Client,
    Server,
    Hltv,
    Matchmaking,
    SystemLink,
    Lan,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown socket label {0:?}")]
pub struct UnknownSocketType(pub String);

impl SocketType {
    /// Three character label the engine prints inside the brackets.
    pub fn label(&self) -> &'static str {
        match self {
            SocketType::Client => "cl ",
            SocketType::Server => "sv ",
            SocketType::Hltv => "htv",
            SocketType::Matchmaking => "mat",
            SocketType::SystemLink => "lnk",
            SocketType::Lan => "lan",
        }
    }
}

impl FromStr for SocketType {
    type Err = UnknownSocketType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cl " => Ok(SocketType::Client),
            "sv " => Ok(SocketType::Server),
            "htv" => Ok(SocketType::Hltv),
            "mat" => Ok(SocketType::Matchmaking),
            "lnk" => Ok(SocketType::SystemLink),
            "lan" => Ok(SocketType::Lan),
            other => Err(UnknownSocketType(other.to_string())),
        }
    }
}

/// One fragment of a packet too large for a single datagram.
///
/// `index` and `count` are kept exactly as printed; nothing checks
/// `index < count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPacket {
    pub socket_type: SocketType,
    pub index: u8,
    pub count: u8,
    pub sequence: u16,
    pub size: u16,
    pub mtu: u16,
    pub total_size: u16,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPacketLine<T> {
    timestamp: T,
    packet: SplitPacket,
}

impl<T> SplitPacketLine<T> {
    pub fn new(timestamp: T, packet: SplitPacket) -> Self {
        Self { timestamp, packet }
    }

    pub fn try_parse(text: &str, timestamp: T) -> Option<Self> {
        let captures = SPLIT_PACKET_RE.captures(text)?;

        let packet = SplitPacket {
            socket_type: captures[1].parse().ok()?,
            index: captures[2].parse().ok()?,
            count: captures[3].parse().ok()?,
            sequence: captures[4].parse().ok()?,
            size: captures[5].parse().ok()?,
            mtu: captures[6].parse().ok()?,
            address: captures[7].to_string(),
            total_size: captures[8].parse().ok()?,
        };

        Some(Self::new(timestamp, packet))
    }

    pub fn split_packet(&self) -> &SplitPacket {
        &self.packet
    }

    pub fn into_timestamp(self) -> T {
        self.timestamp
    }

    pub fn map_timestamp<U>(self, f: impl FnOnce(T) -> U) -> SplitPacketLine<U> {
        SplitPacketLine::new(f(self.timestamp), self.packet)
    }
}

impl<T> ConsoleLine for SplitPacketLine<T> {
    type Timestamp = T;

    fn line_type(&self) -> LineType {
        LineType::SplitPacket
    }

    fn timestamp(&self) -> &T {
        &self.timestamp
    }

    fn should_print(&self) -> bool {
        false
    }

    fn render(&self) -> String {
        let p = &self.packet;
        format!(
            "<-- [{}] Split packet {:4}/{:4} seq {:5} size {:4} mtu {:4} from {} [ total {:4} ]",
            p.socket_type.label(),
            p.index,
            p.count,
            p.sequence,
            p.size,
            p.mtu,
            p.address,
            p.total_size
        )
    }
}

impl<T> fmt::Display for SplitPacketLine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
