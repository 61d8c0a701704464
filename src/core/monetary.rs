/// Bitcoin monetary units and display formatting
///
/// Every amount in the crate is an integer count of satoshis. Floating point
/// only appears at the display edge (USD conversion), never in fee or change
/// arithmetic.
///
/// ## Monetary Units
/// - **Satoshi**: the smallest unit
/// - **BTC**: 100,000,000 satoshis
///
/// Number of satoshis in one BTC
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Utility functions for monetary conversions
pub mod conversions {
    use super::*;

    /// Convert satoshis to BTC for display-only arithmetic
    pub fn sats_to_btc(sats: i64) -> f64 {
        sats as f64 / SATS_PER_BTC as f64
    }

    /// Format satoshis as BTC with exactly eight decimals
    ///
    /// # Examples
    /// ```
    /// use txlens::core::monetary::conversions::format_btc_fixed;
    /// assert_eq!(format_btc_fixed(12_003_740), "0.12003740");
    /// assert_eq!(format_btc_fixed(-1), "-0.00000001");
    /// ```
    pub fn format_btc_fixed(sats: i64) -> String {
        let sign = if sats < 0 { "-" } else { "" };
        let abs = sats.unsigned_abs();
        format!(
            "{sign}{}.{:08}",
            abs / SATS_PER_BTC,
            abs % SATS_PER_BTC
        )
    }

    /// Format satoshis as a BTC string without trailing zeros
    ///
    /// # Examples
    /// ```
    /// use txlens::core::monetary::conversions::sats_to_btc_string;
    /// assert_eq!(sats_to_btc_string(123_456), "0.00123456 BTC");
    /// assert_eq!(sats_to_btc_string(100_000_000), "1 BTC");
    /// assert_eq!(sats_to_btc_string(10_000_000), "0.1 BTC");
    /// ```
    pub fn sats_to_btc_string(sats: i64) -> String {
        let fixed = format_btc_fixed(sats);
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        format!("{trimmed} BTC")
    }

    /// Format satoshis as USD given a BTC/USD price
    ///
    /// A missing or non-positive price yields a placeholder rather than a
    /// misleading zero.
    pub fn sats_to_usd_string(sats: i64, btc_usd: Option<f64>) -> String {
        match btc_usd {
            Some(price) if price > 0.0 => {
                format!("${:.2} USD", sats_to_btc(sats) * price)
            }
            _ => "USD price unavailable".to_string(),
        }
    }

    /// Format an integer with thousands separators
    ///
    /// # Examples
    /// ```
    /// use txlens::core::monetary::conversions::format_number;
    /// assert_eq!(format_number(1_234_567), "1,234,567");
    /// assert_eq!(format_number(-1_000), "-1,000");
    /// ```
    pub fn format_number(num: i64) -> String {
        let digits = num.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if num < 0 {
            format!("-{grouped}")
        } else {
            grouped
        }
    }

    /// Format satoshis with thousands separators, e.g. "1,234,567 sats"
    pub fn format_sats(sats: i64) -> String {
        format!("{} sats", format_number(sats))
    }

    /// Format a unix timestamp (seconds) as e.g. "Jan 15, 2024 10:30 AM" (UTC)
    pub fn format_timestamp(unix_seconds: i64) -> String {
        match chrono::DateTime::from_timestamp(unix_seconds, 0) {
            Some(dt) => dt.format("%b %-d, %Y %-I:%M %p").to_string(),
            None => unix_seconds.to_string(),
        }
    }
}
