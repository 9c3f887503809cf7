use std::fmt;
use std::marker::PhantomData;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ConsoleLine, LineType};

/// A fixed line layout carrying exactly two decimal values.
pub trait DualFloatKind {
    const LINE_TYPE: LineType;
    /// Regex with two `\d+\.\d+`-style capture groups. Matched against the
    /// whole line.
    const PATTERN: &'static str;
    /// Render template with two `{.Nf}` slots.
    const TEMPLATE: &'static str;

    fn regex() -> &'static Regex;
}

fn compile_pattern(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("invalid dual float line pattern")
}

/// Extracts the two captures of `pattern` from `text` as `f32`s.
///
/// `pattern` must match the entire line. A capture that does not survive
/// conversion to a finite `f32` counts as a mismatch.
pub fn match_dual_float(text: &str, pattern: &Regex) -> Option<(f32, f32)> {
    let captures = pattern.captures(text)?;
    let whole = captures.get(0)?;
    if whole.start() != 0 || whole.end() != text.len() {
        return None;
    }

    let value0 = parse_decimal(captures.get(1)?.as_str())?;
    let value1 = parse_decimal(captures.get(2)?.as_str())?;
    Some((value0, value1))
}

fn parse_decimal(token: &str) -> Option<f32> {
    let value: f32 = token.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    // underflowed to zero
    if value == 0.0 && token.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        return None;
    }
    Some(value)
}

/// Fills the two `{.Nf}` slots of `template` with `value0` and `value1`.
pub fn render_dual_float(value0: f32, value1: f32, template: &str) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut values = [value0, value1].into_iter();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let slot = &rest[start..];
        match parse_slot(slot) {
            Some((precision, len)) => {
                if let Some(value) = values.next() {
                    out.push_str(&format!("{value:.precision$}"));
                }
                rest = &slot[len..];
            }
            None => {
                out.push('{');
                rest = &slot[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Returns `(precision, slot length)` for a slot like `{.2f}`.
fn parse_slot(slot: &str) -> Option<(usize, usize)> {
    let body = slot.strip_prefix("{.")?;
    let end = body.find("f}")?;
    let precision = body[..end].parse().ok()?;
    Some((precision, end + 4))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualFloatLine<K, T> {
    timestamp: T,
    value0: f32,
    value1: f32,
    #[serde(skip)]
    kind: PhantomData<K>,
}

impl<K: DualFloatKind, T> DualFloatLine<K, T> {
    pub fn new(timestamp: T, value0: f32, value1: f32) -> Self {
        Self {
            timestamp,
            value0,
            value1,
            kind: PhantomData,
        }
    }

    pub fn try_parse(text: &str, timestamp: T) -> Option<Self> {
        let (value0, value1) = match_dual_float(text, K::regex())?;
        Some(Self::new(timestamp, value0, value1))
    }

    /// Raw values in capture order.
    pub fn values(&self) -> (f32, f32) {
        (self.value0, self.value1)
    }

    pub fn into_timestamp(self) -> T {
        self.timestamp
    }

    pub fn map_timestamp<U>(self, f: impl FnOnce(T) -> U) -> DualFloatLine<K, U> {
        DualFloatLine::new(f(self.timestamp), self.value0, self.value1)
    }
}

impl<K: DualFloatKind, T> ConsoleLine for DualFloatLine<K, T> {
    type Timestamp = T;

    fn line_type(&self) -> LineType {
        K::LINE_TYPE
    }

    fn timestamp(&self) -> &T {
        &self.timestamp
    }

    fn should_print(&self) -> bool {
        false
    }

    fn render(&self) -> String {
        render_dual_float(self.value0, self.value1, K::TEMPLATE)
    }
}

impl<K: DualFloatKind, T> fmt::Display for DualFloatLine<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

macro_rules! dual_float_kind {
    ($(#[$meta:meta])* $kind:ident => $line_type:ident, $pattern:literal, $template:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $kind;

        impl DualFloatKind for $kind {
            const LINE_TYPE: LineType = LineType::$line_type;
            const PATTERN: &'static str = $pattern;
            const TEMPLATE: &'static str = $template;

            fn regex() -> &'static Regex {
                static REGEX: LazyLock<Regex> =
                    LazyLock::new(|| compile_pattern(<$kind as DualFloatKind>::PATTERN));
                &REGEX
            }
        }
    };
}

dual_float_kind!(
    /// `- latency: 12.3, loss 0.04`
    LatencyLoss => NetChannelLatencyLoss,
    r"- latency: (\d+\.\d+), loss (\d+\.\d+)",
    "- latency: {.1f}, loss {.2f}"
);
dual_float_kind!(
    ChannelPackets => NetChannelPackets,
    r"- packets: in (\d+\.\d+)/s, out (\d+\.\d+)/s",
    "- packets: in {.1f}/s, out {.1f}/s"
);
dual_float_kind!(
    ChannelChoke => NetChannelChoke,
    r"- choke: in (\d+\.\d+), out (\d+\.\d+)",
    "- choke: in {.2f}, out {.2f}"
);
dual_float_kind!(
    ChannelFlow => NetChannelFlow,
    r"- flow: in (\d+\.\d+), out (\d+\.\d+) kB/s",
    "- flow: in {.1f}, out {.1f} kB/s"
);
dual_float_kind!(
    ChannelTotal => NetChannelTotal,
    r"- total: in (\d+\.\d+), out (\d+\.\d+) MB",
    "- total: in {.1f}, out {.1f} MB"
);
dual_float_kind!(
    /// Captures out before in.
    AvgLatency => NetLatency,
    r"- Latency: avg out (\d+\.\d+)s, in (\d+\.\d+)s",
    "- Latency: avg out {.2f}s, in {.2f}s"
);
dual_float_kind!(
    /// Captures out before in.
    AvgLoss => NetLoss,
    r"- Loss:    avg out (\d+\.\d+), in (\d+\.\d+)",
    "- Loss:    avg out {.1f}, in {.1f}"
);
dual_float_kind!(
    /// Captures out before in. Single fractional digit.
    PacketsTotal => NetPacketsTotal,
    r"- Packets: net total out  (\d+\.\d)/s, in (\d+\.\d)/s",
    "- Packets: net total out  {.1f}/s, in {.1f}/s"
);
dual_float_kind!(
    /// Captures out before in. Single fractional digit.
    PacketsPerClient => NetPacketsPerClient,
    r"           per client out (\d+\.\d)/s, in (\d+\.\d)/s",
    "           per client out {.1f}/s, in {.1f}/s"
);
dual_float_kind!(
    /// Captures out before in. Single fractional digit.
    DataTotal => NetDataTotal,
    r"- Data:    net total out  (\d+\.\d), in (\d+\.\d) kB/s",
    "- Data:    net total out  {.1f}, in {.1f} kB/s"
);
dual_float_kind!(
    /// Captures out before in. Single fractional digit.
    DataPerClient => NetDataPerClient,
    r"           per client out (\d+\.\d), in (\d+\.\d) kB/s",
    "           per client out {.1f}, in {.1f} kB/s"
);

pub type NetChannelLatencyLossLine<T> = DualFloatLine<LatencyLoss, T>;
pub type NetChannelPacketsLine<T> = DualFloatLine<ChannelPackets, T>;
pub type NetChannelChokeLine<T> = DualFloatLine<ChannelChoke, T>;
pub type NetChannelFlowLine<T> = DualFloatLine<ChannelFlow, T>;
pub type NetChannelTotalLine<T> = DualFloatLine<ChannelTotal, T>;
pub type NetLatencyLine<T> = DualFloatLine<AvgLatency, T>;
pub type NetLossLine<T> = DualFloatLine<AvgLoss, T>;
pub type NetPacketsTotalLine<T> = DualFloatLine<PacketsTotal, T>;
pub type NetPacketsPerClientLine<T> = DualFloatLine<PacketsPerClient, T>;
pub type NetDataTotalLine<T> = DualFloatLine<DataTotal, T>;
pub type NetDataPerClientLine<T> = DualFloatLine<DataPerClient, T>;

impl<T> DualFloatLine<LatencyLoss, T> {
    pub fn latency(&self) -> f32 {
        self.value0
    }

    pub fn loss(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<ChannelPackets, T> {
    pub fn in_packets_per_second(&self) -> f32 {
        self.value0
    }

    pub fn out_packets_per_second(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<ChannelChoke, T> {
    pub fn in_percent_choke(&self) -> f32 {
        self.value0
    }

    pub fn out_percent_choke(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<ChannelFlow, T> {
    pub fn in_kbps(&self) -> f32 {
        self.value0
    }

    pub fn out_kbps(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<ChannelTotal, T> {
    pub fn in_mb(&self) -> f32 {
        self.value0
    }

    pub fn out_mb(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<AvgLatency, T> {
    pub fn out_latency(&self) -> f32 {
        self.value0
    }

    pub fn in_latency(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<AvgLoss, T> {
    pub fn out_loss_percent(&self) -> f32 {
        self.value0
    }

    pub fn in_loss_percent(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<PacketsTotal, T> {
    pub fn out_packets_per_second(&self) -> f32 {
        self.value0
    }

    pub fn in_packets_per_second(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<PacketsPerClient, T> {
    pub fn out_packets_per_second(&self) -> f32 {
        self.value0
    }

    pub fn in_packets_per_second(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<DataTotal, T> {
    pub fn out_kbps(&self) -> f32 {
        self.value0
    }

    pub fn in_kbps(&self) -> f32 {
        self.value1
    }
}

impl<T> DualFloatLine<DataPerClient, T> {
    pub fn out_kbps(&self) -> f32 {
        self.value0
    }

    pub fn in_kbps(&self) -> f32 {
        self.value1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_to(value: f32, precision: usize) -> f32 {
        format!("{value:.precision$}").parse().unwrap()
    }

    fn check_round_trip<K: DualFloatKind>(precision: (usize, usize)) {
        let pairs = [
            (0.0, 0.0),
            (12.34, 0.04),
            (1.05, 99.99),
            (250.0, 0.5),
            (123456.7, 3.25),
        ];
        for (a, b) in pairs {
            let line = DualFloatLine::<K, ()>::new((), a, b);
            let text = line.render();
            let parsed = DualFloatLine::<K, ()>::try_parse(&text, ())
                .unwrap_or_else(|| panic!("{:?} did not parse {text:?}", K::LINE_TYPE));
            assert_eq!(
                parsed.values(),
                (round_to(a, precision.0), round_to(b, precision.1)),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_round_trip_every_kind() {
        check_round_trip::<LatencyLoss>((1, 2));
        check_round_trip::<ChannelPackets>((1, 1));
        check_round_trip::<ChannelChoke>((2, 2));
        check_round_trip::<ChannelFlow>((1, 1));
        check_round_trip::<ChannelTotal>((1, 1));
        check_round_trip::<AvgLatency>((2, 2));
        check_round_trip::<AvgLoss>((1, 1));
        check_round_trip::<PacketsTotal>((1, 1));
        check_round_trip::<PacketsPerClient>((1, 1));
        check_round_trip::<DataTotal>((1, 1));
        check_round_trip::<DataPerClient>((1, 1));
    }

    #[test]
    fn test_latency_loss_scenario() {
        let line = NetChannelLatencyLossLine::try_parse("- latency: 12.3, loss 0.04", 42u64).unwrap();
        assert_eq!(line.latency(), 12.3);
        assert_eq!(line.loss(), 0.04);
        assert_eq!(line.line_type(), LineType::NetChannelLatencyLoss);
        assert_eq!(*line.timestamp(), 42);
        assert!(!line.should_print());
    }

    #[test]
    fn test_out_in_slot_order() {
        let line = NetLatencyLine::try_parse("- Latency: avg out 0.07s, in 0.01s", ()).unwrap();
        assert_eq!(line.out_latency(), 0.07);
        assert_eq!(line.in_latency(), 0.01);

        let line = NetChannelPacketsLine::try_parse("- packets: in 66.0/s, out 34.4/s", ()).unwrap();
        assert_eq!(line.in_packets_per_second(), 66.0);
        assert_eq!(line.out_packets_per_second(), 34.4);

        let line =
            NetDataTotalLine::try_parse("- Data:    net total out  3.5, in 2.6 kB/s", ()).unwrap();
        assert_eq!(line.out_kbps(), 3.5);
        assert_eq!(line.in_kbps(), 2.6);
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        assert!(NetChannelLatencyLossLine::try_parse("- latency: 12, loss 0.04", ()).is_none());
        assert!(NetChannelLatencyLossLine::try_parse("- latency: -1.0, loss 0.04", ()).is_none());
        assert!(NetChannelLatencyLossLine::try_parse("- latency: 1e3, loss 0.04", ()).is_none());
        assert!(
            NetChannelLatencyLossLine::try_parse("- latency: 12.3, loss 0.04, 1.0", ()).is_none()
        );
        assert!(NetChannelLatencyLossLine::try_parse(" - latency: 12.3, loss 0.04", ()).is_none());
        assert!(NetChannelLatencyLossLine::try_parse("- latency: 12.3, loss 0.04 ", ()).is_none());
    }

    #[test]
    fn test_single_fraction_digit_layouts() {
        assert!(NetPacketsTotalLine::try_parse("- Packets: net total out  34.4/s, in 66.0/s", ())
            .is_some());
        assert!(NetPacketsTotalLine::try_parse("- Packets: net total out  34.45/s, in 66.0/s", ())
            .is_none());
    }

    #[test]
    fn test_overflow_and_underflow_rejected() {
        let huge = format!("- latency: {}.0, loss 0.04", "9".repeat(60));
        assert!(NetChannelLatencyLossLine::try_parse(&huge, ()).is_none());

        let tiny = format!("- latency: 0.{}1, loss 0.04", "0".repeat(60));
        assert!(NetChannelLatencyLossLine::try_parse(&tiny, ()).is_none());

        assert!(NetChannelLatencyLossLine::try_parse("- latency: 0.000, loss 0.00", ()).is_some());
    }

    fn check_pattern_constant<K: DualFloatKind>() {
        let compiled = K::regex().as_str();
        assert_eq!(compiled, format!("^(?:{})$", K::PATTERN), "{:?}", K::LINE_TYPE);
    }

    #[test]
    fn test_regex_built_from_pattern_constant() {
        check_pattern_constant::<LatencyLoss>();
        check_pattern_constant::<ChannelPackets>();
        check_pattern_constant::<ChannelChoke>();
        check_pattern_constant::<ChannelFlow>();
        check_pattern_constant::<ChannelTotal>();
        check_pattern_constant::<AvgLatency>();
        check_pattern_constant::<AvgLoss>();
        check_pattern_constant::<PacketsTotal>();
        check_pattern_constant::<PacketsPerClient>();
        check_pattern_constant::<DataTotal>();
        check_pattern_constant::<DataPerClient>();
    }

    #[test]
    fn test_render_template_slots() {
        assert_eq!(render_dual_float(1.0, 2.345, "a {.1f} b {.2f}"), "a 1.0 b 2.35");
        assert_eq!(render_dual_float(1.0, 2.0, "{x} {.0f}"), "{x} 1");
        assert_eq!(render_dual_float(1.0, 2.0, "no slots"), "no slots");
    }

    #[test]
    fn test_match_requires_whole_line() {
        let unanchored = Regex::new(r"in (\d+\.\d+), out (\d+\.\d+)").unwrap();
        assert_eq!(
            match_dual_float("in 1.5, out 2.5", &unanchored),
            Some((1.5, 2.5))
        );
        assert_eq!(match_dual_float("- in 1.5, out 2.5", &unanchored), None);
    }
}
