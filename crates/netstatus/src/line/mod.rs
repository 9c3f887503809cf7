//! Typed records for the lines of the `net_status` console report.
//!
//! Every record kind is parsed statelessly from a single line of text plus a
//! caller supplied timestamp, and can render itself back to its canonical
//! line.

mod dual_float;
mod net_status_config;
mod split_packet;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use dual_float::{
    AvgLatency, AvgLoss, ChannelChoke, ChannelFlow, ChannelPackets, ChannelTotal, DataPerClient,
    DataTotal, DualFloatKind, DualFloatLine, LatencyLoss, NetChannelChokeLine, NetChannelFlowLine,
    NetChannelLatencyLossLine, NetChannelPacketsLine, NetChannelTotalLine, NetDataPerClientLine,
    NetDataTotalLine, NetLatencyLine, NetLossLine, NetPacketsPerClientLine, NetPacketsTotalLine,
    PacketsPerClient, PacketsTotal, match_dual_float, render_dual_float,
};
pub use net_status_config::{
    NetStatusConfigLine, PlayerMode, ServerMode, UnknownPlayerMode, UnknownServerMode,
};
pub use split_packet::{SocketType, SplitPacket, SplitPacketLine, UnknownSocketType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LineType {
    SplitPacket,
    NetStatusConfig,
    NetChannelLatencyLoss,
    NetChannelPackets,
    NetChannelChoke,
    NetChannelFlow,
    NetChannelTotal,
    NetLatency,
    NetLoss,
    NetPacketsTotal,
    NetPacketsPerClient,
    NetDataTotal,
    NetDataPerClient,
}

impl LineType {
    pub const ALL: [LineType; 13] = [
        LineType::SplitPacket,
        LineType::NetStatusConfig,
        LineType::NetChannelLatencyLoss,
        LineType::NetChannelPackets,
        LineType::NetChannelChoke,
        LineType::NetChannelFlow,
        LineType::NetChannelTotal,
        LineType::NetLatency,
        LineType::NetLoss,
        LineType::NetPacketsTotal,
        LineType::NetPacketsPerClient,
        LineType::NetDataTotal,
        LineType::NetDataPerClient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::SplitPacket => "SplitPacket",
            LineType::NetStatusConfig => "NetStatusConfig",
            LineType::NetChannelLatencyLoss => "NetChannelLatencyLoss",
            LineType::NetChannelPackets => "NetChannelPackets",
            LineType::NetChannelChoke => "NetChannelChoke",
            LineType::NetChannelFlow => "NetChannelFlow",
            LineType::NetChannelTotal => "NetChannelTotal",
            LineType::NetLatency => "NetLatency",
            LineType::NetLoss => "NetLoss",
            LineType::NetPacketsTotal => "NetPacketsTotal",
            LineType::NetPacketsPerClient => "NetPacketsPerClient",
            LineType::NetDataTotal => "NetDataTotal",
            LineType::NetDataPerClient => "NetDataPerClient",
        }
    }

    pub fn from_name(name: &str) -> Option<LineType> {
        Self::ALL
            .into_iter()
            .find(|line_type| line_type.as_str().eq_ignore_ascii_case(name))
    }

    pub fn is_dual_float(&self) -> bool {
        !matches!(self, LineType::SplitPacket | LineType::NetStatusConfig)
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities shared by every parsed console line.
///
/// Object safe, so a dispatcher can keep `Box<dyn ConsoleLine<Timestamp = T>>`
/// values of mixed kinds and branch on [`ConsoleLine::line_type`].
pub trait ConsoleLine {
    type Timestamp;

    fn line_type(&self) -> LineType;

    fn timestamp(&self) -> &Self::Timestamp;

    /// Whether the line is meant for a human readable log.
    fn should_print(&self) -> bool;

    /// Canonical text of the line, as the game prints it.
    fn render(&self) -> String;
}

/// Closed sum over every record kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LineRecord<T> {
    SplitPacket(SplitPacketLine<T>),
    NetStatusConfig(NetStatusConfigLine<T>),
    NetChannelLatencyLoss(NetChannelLatencyLossLine<T>),
    NetChannelPackets(NetChannelPacketsLine<T>),
    NetChannelChoke(NetChannelChokeLine<T>),
    NetChannelFlow(NetChannelFlowLine<T>),
    NetChannelTotal(NetChannelTotalLine<T>),
    NetLatency(NetLatencyLine<T>),
    NetLoss(NetLossLine<T>),
    NetPacketsTotal(NetPacketsTotalLine<T>),
    NetPacketsPerClient(NetPacketsPerClientLine<T>),
    NetDataTotal(NetDataTotalLine<T>),
    NetDataPerClient(NetDataPerClientLine<T>),
}

macro_rules! for_each_record {
    ($record:expr, $line:ident => $body:expr) => {
        match $record {
            LineRecord::SplitPacket($line) => $body,
            LineRecord::NetStatusConfig($line) => $body,
            LineRecord::NetChannelLatencyLoss($line) => $body,
            LineRecord::NetChannelPackets($line) => $body,
            LineRecord::NetChannelChoke($line) => $body,
            LineRecord::NetChannelFlow($line) => $body,
            LineRecord::NetChannelTotal($line) => $body,
            LineRecord::NetLatency($line) => $body,
            LineRecord::NetLoss($line) => $body,
            LineRecord::NetPacketsTotal($line) => $body,
            LineRecord::NetPacketsPerClient($line) => $body,
            LineRecord::NetDataTotal($line) => $body,
            LineRecord::NetDataPerClient($line) => $body,
        }
    };
}

macro_rules! impl_from_line {
    ($($variant:ident => $line:ident),* $(,)?) => {
        $(
            impl<T> From<$line<T>> for LineRecord<T> {
                fn from(line: $line<T>) -> Self {
                    LineRecord::$variant(line)
                }
            }
        )*
    };
}

impl_from_line! {
    SplitPacket => SplitPacketLine,
    NetStatusConfig => NetStatusConfigLine,
    NetChannelLatencyLoss => NetChannelLatencyLossLine,
    NetChannelPackets => NetChannelPacketsLine,
    NetChannelChoke => NetChannelChokeLine,
    NetChannelFlow => NetChannelFlowLine,
    NetChannelTotal => NetChannelTotalLine,
    NetLatency => NetLatencyLine,
    NetLoss => NetLossLine,
    NetPacketsTotal => NetPacketsTotalLine,
    NetPacketsPerClient => NetPacketsPerClientLine,
    NetDataTotal => NetDataTotalLine,
    NetDataPerClient => NetDataPerClientLine,
}

impl<T> LineRecord<T> {
    /// Parses `text` as exactly the given kind.
    pub fn try_parse_as(line_type: LineType, text: &str, timestamp: T) -> Option<Self> {
        match line_type {
            LineType::SplitPacket => SplitPacketLine::try_parse(text, timestamp).map(Self::from),
            LineType::NetStatusConfig => {
                NetStatusConfigLine::try_parse(text, timestamp).map(Self::from)
            }
            LineType::NetChannelLatencyLoss => {
                NetChannelLatencyLossLine::try_parse(text, timestamp).map(Self::from)
            }
            LineType::NetChannelPackets => {
                NetChannelPacketsLine::try_parse(text, timestamp).map(Self::from)
            }
            LineType::NetChannelChoke => {
                NetChannelChokeLine::try_parse(text, timestamp).map(Self::from)
            }
            LineType::NetChannelFlow => {
                NetChannelFlowLine::try_parse(text, timestamp).map(Self::from)
            }
            LineType::NetChannelTotal => {
                NetChannelTotalLine::try_parse(text, timestamp).map(Self::from)
            }
            LineType::NetLatency => NetLatencyLine::try_parse(text, timestamp).map(Self::from),
            LineType::NetLoss => NetLossLine::try_parse(text, timestamp).map(Self::from),
            LineType::NetPacketsTotal => {
                NetPacketsTotalLine::try_parse(text, timestamp).map(Self::from)
            }
            LineType::NetPacketsPerClient => {
                NetPacketsPerClientLine::try_parse(text, timestamp).map(Self::from)
            }
            LineType::NetDataTotal => {
                NetDataTotalLine::try_parse(text, timestamp).map(Self::from)
            }
            LineType::NetDataPerClient => {
                NetDataPerClientLine::try_parse(text, timestamp).map(Self::from)
            }
        }
    }

    pub fn into_timestamp(self) -> T {
        for_each_record!(self, line => line.into_timestamp())
    }

    pub fn map_timestamp<U>(self, f: impl FnOnce(T) -> U) -> LineRecord<U> {
        for_each_record!(self, line => line.map_timestamp(f).into())
    }
}

impl<T> ConsoleLine for LineRecord<T> {
    type Timestamp = T;

    fn line_type(&self) -> LineType {
        for_each_record!(self, line => line.line_type())
    }

    fn timestamp(&self) -> &T {
        for_each_record!(self, line => line.timestamp())
    }

    fn should_print(&self) -> bool {
        for_each_record!(self, line => line.should_print())
    }

    fn render(&self) -> String {
        for_each_record!(self, line => line.render())
    }
}

impl<T> fmt::Display for LineRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_type_names_round_trip() {
        for line_type in LineType::ALL {
            assert_eq!(LineType::from_name(line_type.as_str()), Some(line_type));
        }
        assert_eq!(
            LineType::from_name("netchannellatencyloss"),
            Some(LineType::NetChannelLatencyLoss)
        );
        assert_eq!(LineType::from_name("Status"), None);
    }

    #[test]
    fn test_line_type_dual_float_split() {
        let dual_float = LineType::ALL.iter().filter(|t| t.is_dual_float()).count();
        assert_eq!(dual_float, 11);
        assert!(!LineType::SplitPacket.is_dual_float());
        assert!(!LineType::NetStatusConfig.is_dual_float());
    }

    #[test]
    fn test_record_tag_matches_parsed_kind() {
        let record =
            LineRecord::try_parse_as(LineType::NetLoss, "- Loss:    avg out 1.5, in 0.0", 7u64)
                .unwrap();
        assert_eq!(record.line_type(), LineType::NetLoss);
        assert_eq!(*record.timestamp(), 7);
        assert!(!record.should_print());
        assert_eq!(record.to_string(), "- Loss:    avg out 1.5, in 0.0");

        let restamped = record.clone().map_timestamp(|ts| ts * 2);
        assert_eq!(restamped.line_type(), LineType::NetLoss);
        assert_eq!(restamped.render(), record.render());
        assert_eq!(restamped.into_timestamp(), 14);
        assert_eq!(record.into_timestamp(), 7);
    }

    #[test]
    fn test_try_parse_as_wrong_kind() {
        let line = "- latency: 12.3, loss 0.04";
        assert!(LineRecord::try_parse_as(LineType::NetChannelPackets, line, ()).is_none());
        assert!(LineRecord::try_parse_as(LineType::SplitPacket, line, ()).is_none());
        assert!(LineRecord::try_parse_as(LineType::NetStatusConfig, line, ()).is_none());
    }

    #[test]
    fn test_heterogeneous_trait_objects() {
        let lines: Vec<Box<dyn ConsoleLine<Timestamp = u32>>> = vec![
            Box::new(NetChannelChokeLine::new(1u32, 0.25, 0.5)),
            Box::new(NetStatusConfigLine::new(
                2u32,
                PlayerMode::Multiplayer,
                ServerMode::Dedicated,
                1,
            )),
        ];

        let types: Vec<LineType> = lines.iter().map(|line| line.line_type()).collect();
        assert_eq!(types, vec![LineType::NetChannelChoke, LineType::NetStatusConfig]);
        assert!(lines.iter().all(|line| !line.should_print()));
    }
}
