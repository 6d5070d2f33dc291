// ── Node throughput labels ──
//
// One label per node, e.g. `Agg TX 12 Mbit/s / RX 240 Mbit/s`. The metric
// mode selects a strategy (prefix + computation) from a fixed table.

use crate::config::TransferMetricMode;
use crate::format::fmt_speed;
use crate::model::{RawClient, RawNode};

/// Transmit/receive pair in kbit/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Throughput {
    pub tx_kbps: u64,
    pub rx_kbps: u64,
}

struct RateStrategy {
    prefix: &'static str,
    compute: fn(&RawNode) -> Throughput,
}

fn strategy(mode: TransferMetricMode) -> RateStrategy {
    match mode {
        TransferMetricMode::Aggregate => RateStrategy {
            prefix: "Agg ",
            compute: aggregate,
        },
        TransferMetricMode::Uplink => RateStrategy {
            prefix: "Uplink ",
            compute: uplink,
        },
        TransferMetricMode::MaxSingle => RateStrategy {
            prefix: "Max ",
            compute: max_single,
        },
        TransferMetricMode::Average => RateStrategy {
            prefix: "Avg ",
            compute: average,
        },
    }
}

/// Computes throughput labels under one metric mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateAggregator {
    mode: TransferMetricMode,
}

impl RateAggregator {
    pub fn new(mode: TransferMetricMode) -> Self {
        Self { mode }
    }

    pub fn throughput(&self, node: &RawNode) -> Throughput {
        (strategy(self.mode).compute)(node)
    }

    /// `"<prefix>TX <v> / RX <v>"`, one side only, or empty when both are zero.
    pub fn label(&self, node: &RawNode) -> String {
        let RateStrategy { prefix, compute } = strategy(self.mode);
        let Throughput { tx_kbps, rx_kbps } = compute(node);
        match (fmt_speed(Some(tx_kbps)), fmt_speed(Some(rx_kbps))) {
            (Some(tx), Some(rx)) => format!("{prefix}TX {tx} / RX {rx}"),
            (Some(tx), None) => format!("{prefix}TX {tx}"),
            (None, Some(rx)) => format!("{prefix}RX {rx}"),
            (None, None) => String::new(),
        }
    }
}

// ── Strategies ──────────────────────────────────────────────────────

/// Precomputed client totals; uplink counters when the node has none.
fn aggregate(node: &RawNode) -> Throughput {
    if node.aggregate_tx_kbps.is_none() && node.aggregate_rx_kbps.is_none() {
        return uplink(node);
    }
    Throughput {
        tx_kbps: node.aggregate_tx_kbps.unwrap_or_default(),
        rx_kbps: node.aggregate_rx_kbps.unwrap_or_default(),
    }
}

fn uplink(node: &RawNode) -> Throughput {
    Throughput {
        tx_kbps: node.uplink_tx_kbps.unwrap_or_default(),
        rx_kbps: node.uplink_rx_kbps.unwrap_or_default(),
    }
}

fn max_single(node: &RawNode) -> Throughput {
    Throughput {
        tx_kbps: node.clients.iter().map(current_tx).max().unwrap_or_default(),
        rx_kbps: node.clients.iter().map(current_rx).max().unwrap_or_default(),
    }
}

/// Mean over all clients, rounded half up; zero without clients.
fn average(node: &RawNode) -> Throughput {
    let count = u64::try_from(node.clients.len()).unwrap_or(u64::MAX);
    if count == 0 {
        return Throughput::default();
    }
    let mean = |total: u64| total.saturating_add(count / 2) / count;
    Throughput {
        tx_kbps: mean(node.clients.iter().map(current_tx).fold(0, u64::saturating_add)),
        rx_kbps: mean(node.clients.iter().map(current_rx).fold(0, u64::saturating_add)),
    }
}

fn current_tx(client: &RawClient) -> u64 {
    client.cur_tx_kbps.unwrap_or_default()
}

fn current_rx(client: &RawClient) -> u64 {
    client.cur_rx_kbps.unwrap_or_default()
}
