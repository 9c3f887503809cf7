pub mod classify;
pub mod line;

pub use classify::{LineClassifier, Parser};
pub use line::{
    ConsoleLine, DualFloatKind, DualFloatLine, LineRecord, LineType, NetChannelChokeLine,
    NetChannelFlowLine, NetChannelLatencyLossLine, NetChannelPacketsLine, NetChannelTotalLine,
    NetDataPerClientLine, NetDataTotalLine, NetLatencyLine, NetLossLine, NetPacketsPerClientLine,
    NetPacketsTotalLine, NetStatusConfigLine, PlayerMode, ServerMode, SocketType, SplitPacket,
    SplitPacketLine, UnknownPlayerMode, UnknownServerMode, UnknownSocketType, match_dual_float,
    render_dual_float,
};
