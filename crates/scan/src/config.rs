use std::path::PathBuf;

use netstatus::LineType;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("unknown line type {0:?}")]
    UnknownLineType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Quiet,
    Render,
    Json,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub input: Option<PathBuf>,
    pub line_types: Vec<LineType>,
    pub output: OutputMode,
    pub summary: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            input: None,
            line_types: LineType::ALL.to_vec(),
            output: OutputMode::default(),
            summary: true,
        }
    }
}

impl ScanConfig {
    pub fn parse_line_types(names: &[String]) -> Result<Vec<LineType>, ScanError> {
        names
            .iter()
            .map(|name| {
                LineType::from_name(name).ok_or_else(|| ScanError::UnknownLineType(name.clone()))
            })
            .collect()
    }
}
