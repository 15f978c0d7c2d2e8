use serde::{Deserialize, Serialize};

/// What the raw integer values of a call tree represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueUnit {
    /// CPU time in nanoseconds.
    Nanoseconds,
    /// Memory in bytes.
    Bytes,
}

impl ValueUnit {
    /// Format a value in this unit for display.
    ///
    /// Durations pick the largest unit that keeps the mantissa at or above 1
    /// (`850ns`, `12.5ms`, `1.5s`, `2m5s`). Byte counts use IEC prefixes with
    /// one decimal below 10 and none above (`512 B`, `1.5 KiB`, `20 MiB`).
    pub fn format_value(&self, value: i64) -> String {
        let sign = if value < 0 { "-" } else { "" };
        let magnitude = value.unsigned_abs();
        match self {
            Self::Nanoseconds => format!("{sign}{}", format_duration(magnitude)),
            Self::Bytes => format!("{sign}{}", format_bytes(magnitude)),
        }
    }
}

fn format_duration(ns: u64) -> String {
    const MINUTE: u64 = 60_000_000_000;
    if ns < 1_000 {
        format!("{ns}ns")
    } else if ns < 1_000_000 {
        format!("{}µs", trim_decimals(ns as f64 / 1e3))
    } else if ns < 1_000_000_000 {
        format!("{}ms", trim_decimals(ns as f64 / 1e6))
    } else if ns < MINUTE {
        format!("{}s", trim_decimals(ns as f64 / 1e9))
    } else {
        let minutes = ns / MINUTE;
        let rest = (ns % MINUTE) as f64 / 1e9;
        format!("{minutes}m{}s", trim_decimals(rest))
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if value < 10.0 {
        format!("{value:.1} {}", UNITS[unit])
    } else {
        format!("{value:.0} {}", UNITS[unit])
    }
}

/// Up to three decimals, without trailing zeros.
fn trim_decimals(value: f64) -> String {
    let s = format!("{value:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
