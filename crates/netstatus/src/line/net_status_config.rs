use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ConsoleLine, LineType};

static CONFIG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- Config: (\w+), (\w+), (\d+) connections$").expect("invalid config pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerMode {
    Multiplayer,
    Singleplayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerMode {
    Dedicated,
    Listen,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown player mode {0:?}")]
pub struct UnknownPlayerMode(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown server mode {0:?}")]
pub struct UnknownServerMode(pub String);

impl PlayerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerMode::Multiplayer => "multiplayer",
            PlayerMode::Singleplayer => "singleplayer",
        }
    }
}

impl FromStr for PlayerMode {
    type Err = UnknownPlayerMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiplayer" => Ok(PlayerMode::Multiplayer),
            "singleplayer" => Ok(PlayerMode::Singleplayer),
            other => Err(UnknownPlayerMode(other.to_string())),
        }
    }
}

impl ServerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServerMode::Dedicated => "dedicated",
            ServerMode::Listen => "listen",
        }
    }
}

impl FromStr for ServerMode {
    type Err = UnknownServerMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dedicated" => Ok(ServerMode::Dedicated),
            "listen" => Ok(ServerMode::Listen),
            other => Err(UnknownServerMode(other.to_string())),
        }
    }
}

/// `- Config: multiplayer, dedicated, 1 connections`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetStatusConfigLine<T> {
    timestamp: T,
    player_mode: PlayerMode,
    server_mode: ServerMode,
    connection_count: u32,
}

impl<T> NetStatusConfigLine<T> {
    pub fn new(
        timestamp: T,
        player_mode: PlayerMode,
        server_mode: ServerMode,
        connection_count: u32,
    ) -> Self {
        Self {
            timestamp,
            player_mode,
            server_mode,
            connection_count,
        }
    }

    pub fn try_parse(text: &str, timestamp: T) -> Option<Self> {
        let captures = CONFIG_RE.captures(text)?;

        let player_mode = captures[1].parse().ok()?;
        let server_mode = captures[2].parse().ok()?;
        let connection_count = captures[3].parse().ok()?;

        Some(Self::new(timestamp, player_mode, server_mode, connection_count))
    }

    pub fn player_mode(&self) -> PlayerMode {
        self.player_mode
    }

    pub fn server_mode(&self) -> ServerMode {
        self.server_mode
    }

    pub fn connection_count(&self) -> u32 {
        self.connection_count
    }

    pub fn into_timestamp(self) -> T {
        self.timestamp
    }

    pub fn map_timestamp<U>(self, f: impl FnOnce(T) -> U) -> NetStatusConfigLine<U> {
        NetStatusConfigLine::new(
            f(self.timestamp),
            self.player_mode,
            self.server_mode,
            self.connection_count,
        )
    }
}

impl<T> ConsoleLine for NetStatusConfigLine<T> {
    type Timestamp = T;

    fn line_type(&self) -> LineType {
        LineType::NetStatusConfig
    }

    fn timestamp(&self) -> &T {
        &self.timestamp
    }

    fn should_print(&self) -> bool {
        false
    }

    fn render(&self) -> String {
        format!(
            "- Config: {}, {}, {} connections",
            self.player_mode.as_str(),
            self.server_mode.as_str(),
            self.connection_count
        )
    }
}

impl<T> fmt::Display for NetStatusConfigLine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
