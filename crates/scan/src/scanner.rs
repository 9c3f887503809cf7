use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::time::SystemTime;

use anyhow::Result;
use netstatus::{ConsoleLine, LineClassifier, LineRecord, LineType};
use serde::Serialize;

use crate::config::{OutputMode, ScanConfig};

#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    pub lines_read: u64,
    pub lines_matched: u64,
    pub by_type: BTreeMap<LineType, u64>,
}

impl ScanSummary {
    pub fn lines_unmatched(&self) -> u64 {
        self.lines_read - self.lines_matched
    }

    pub fn dual_float_lines(&self) -> u64 {
        self.by_type
            .iter()
            .filter(|(line_type, _)| line_type.is_dual_float())
            .map(|(_, count)| count)
            .sum()
    }

    fn record(&mut self, line_type: LineType) {
        self.lines_matched += 1;
        *self.by_type.entry(line_type).or_insert(0) += 1;
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    line_type: LineType,
    text: String,
    record: &'a LineRecord<u64>,
}

pub struct Scanner {
    classifier: LineClassifier<SystemTime>,
    output: OutputMode,
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            classifier: LineClassifier::with_types(&config.line_types),
            output: config.output,
        }
    }

    pub fn scan<R: BufRead, W: Write>(&self, mut input: R, mut out: W) -> Result<ScanSummary> {
        let mut summary = ScanSummary::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            summary.lines_read += 1;

            // player names and chat can carry bytes that are not UTF-8
            let decoded = String::from_utf8_lossy(&buf);
            let text = decoded.trim_end_matches(['\n', '\r']);

            let Some(record) = self.classifier.classify(text, SystemTime::now()) else {
                log::debug!("Unmatched line {}: {:?}", summary.lines_read, text);
                continue;
            };
            summary.record(record.line_type());
            self.emit(&record, &mut out)?;
        }

        Ok(summary)
    }

    fn emit<W: Write>(&self, record: &LineRecord<SystemTime>, out: &mut W) -> Result<()> {
        match self.output {
            OutputMode::Quiet => {}
            OutputMode::Render => writeln!(out, "{}", record)?,
            OutputMode::Json => {
                let millis = record
                    .timestamp()
                    .duration_since(SystemTime::UNIX_EPOCH)
                    .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
                    .unwrap_or(0);
                let stamped = record.clone().map_timestamp(|_| millis);
                let json = JsonLine {
                    line_type: stamped.line_type(),
                    text: stamped.render(),
                    record: &stamped,
                };
                serde_json::to_writer(&mut *out, &json)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
