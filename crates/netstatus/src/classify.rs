//! Trial-order dispatch over the line parsers.
//!
//! The parsers in [`crate::line`] are independent; this module owns the order
//! in which they are tried against a raw console line.

use crate::line::{ConsoleLine, LineRecord, LineType};

pub type Parser<T> = fn(&str, T) -> Option<LineRecord<T>>;

pub struct LineClassifier<T> {
    parsers: Vec<(LineType, Parser<T>)>,
}

fn parser_for<T>(line_type: LineType) -> Parser<T> {
    match line_type {
        LineType::SplitPacket => |text, ts| LineRecord::try_parse_as(LineType::SplitPacket, text, ts),
        LineType::NetStatusConfig => {
            |text, ts| LineRecord::try_parse_as(LineType::NetStatusConfig, text, ts)
        }
        LineType::NetChannelLatencyLoss => {
            |text, ts| LineRecord::try_parse_as(LineType::NetChannelLatencyLoss, text, ts)
        }
        LineType::NetChannelPackets => {
            |text, ts| LineRecord::try_parse_as(LineType::NetChannelPackets, text, ts)
        }
        LineType::NetChannelChoke => {
            |text, ts| LineRecord::try_parse_as(LineType::NetChannelChoke, text, ts)
        }
        LineType::NetChannelFlow => {
            |text, ts| LineRecord::try_parse_as(LineType::NetChannelFlow, text, ts)
        }
        LineType::NetChannelTotal => {
            |text, ts| LineRecord::try_parse_as(LineType::NetChannelTotal, text, ts)
        }
        LineType::NetLatency => |text, ts| LineRecord::try_parse_as(LineType::NetLatency, text, ts),
        LineType::NetLoss => |text, ts| LineRecord::try_parse_as(LineType::NetLoss, text, ts),
        LineType::NetPacketsTotal => {
            |text, ts| LineRecord::try_parse_as(LineType::NetPacketsTotal, text, ts)
        }
        LineType::NetPacketsPerClient => {
            |text, ts| LineRecord::try_parse_as(LineType::NetPacketsPerClient, text, ts)
        }
        LineType::NetDataTotal => {
            |text, ts| LineRecord::try_parse_as(LineType::NetDataTotal, text, ts)
        }
        LineType::NetDataPerClient => {
            |text, ts| LineRecord::try_parse_as(LineType::NetDataPerClient, text, ts)
        }
    }
}

impl<T: Clone> LineClassifier<T> {
    /// Every known kind, tried in [`LineType::ALL`] order.
    pub fn new() -> Self {
        Self::with_types(&LineType::ALL)
    }

    pub fn with_types(types: &[LineType]) -> Self {
        Self::with_parsers(
            types
                .iter()
                .map(|&line_type| (line_type, parser_for(line_type)))
                .collect(),
        )
    }

    pub fn with_parsers(parsers: Vec<(LineType, Parser<T>)>) -> Self {
        Self { parsers }
    }

    pub fn trial_order(&self) -> Vec<LineType> {
        self.parsers.iter().map(|(line_type, _)| *line_type).collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Returns the first registered parser's record that accepts `text`.
    pub fn classify(&self, text: &str, timestamp: T) -> Option<LineRecord<T>> {
        for (line_type, parser) in &self.parsers {
            match parser(text, timestamp.clone()) {
                Some(record) => {
                    log::debug!("Classified line as {}", record.line_type());
                    return Some(record);
                }
                None => log::trace!("Line is not {}: {:?}", line_type, text),
            }
        }
        None
    }

    /// All registered kinds accepting `text`, in trial order.
    pub fn matching_types(&self, text: &str, timestamp: T) -> Vec<LineType> {
        self.parsers
            .iter()
            .filter(|(_, parser)| parser(text, timestamp.clone()).is_some())
            .map(|(line_type, _)| *line_type)
            .collect()
    }
}

impl<T: Clone> Default for LineClassifier<T> {
    fn default() -> Self {
        Self::new()
    }
}
