//! Discord message formatting for price snapshots

use crate::types::{display_symbol, PriceSnapshot};
use chrono::{DateTime, Utc};
use std::fmt::{self, Write};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const TITLE: &str = "📊 **CRYPTO MARKET UPDATE**";

/// Renders a snapshot as a single Discord message
///
/// Quotes are listed by market cap, largest first. Returns `None` when the
/// snapshot has no quotes.
pub fn format_snapshot(snapshot: &PriceSnapshot, now: DateTime<Utc>) -> Option<String> {
    if snapshot.is_empty() {
        return None;
    }

    let mut message = String::new();
    write_message(&mut message, snapshot, now).ok()?;
    Some(message)
}

fn write_message(
    out: &mut impl Write,
    snapshot: &PriceSnapshot,
    now: DateTime<Utc>,
) -> fmt::Result {
    writeln!(out, "{RULE}")?;
    writeln!(out, "{TITLE}")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "```")?;
    writeln!(out, "⏰ {} UTC", now.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out)?;

    for quote in snapshot.by_market_cap() {
        writeln!(
            out,
            "{} {}",
            quote.sentiment().emoji(),
            display_symbol(&quote.identifier)
        )?;
        writeln!(out, "  💰 ${}", format_usd(quote.price_usd))?;
        writeln!(out, "  📈 {:+.2}% (24h)", quote.change_24h_pct)?;
        writeln!(out, "  📊 MCap: ${:.2}B", quote.market_cap_usd / 1e9)?;
        writeln!(out, "  💹 Vol: ${:.1}M", quote.volume_24h_usd / 1e6)?;
        writeln!(out)?;
    }

    writeln!(out, "```")?;
    write!(out, "{RULE}")
}

/// Formats an amount with two decimals and comma-grouped thousands
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.00 renders without a sign
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
