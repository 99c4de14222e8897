/// Amounts whose magnitude is at or below this are treated as settled.
pub const SPLIT_TOLERANCE: f64 = 0.01;

/// Decimal places kept when inverting a reverse-direction FX rate.
pub const FX_RATE_DECIMALS: u32 = 6;

// Audit action names.
pub const BALANCES_COMPUTED: &str = "BALANCES_COMPUTED";
pub const SETTLEMENT_GENERATED: &str = "SETTLEMENT_GENERATED";
pub const SETTLEMENT_GENERATION_DENIED: &str = "SETTLEMENT_GENERATION_DENIED";
pub const SETTLEMENT_INITIATED: &str = "SETTLEMENT_INITIATED";
pub const SETTLEMENT_COMPLETED: &str = "SETTLEMENT_COMPLETED";
pub const SETTLEMENT_REJECTED: &str = "SETTLEMENT_REJECTED";
pub const SETTLEMENTS_TERMINATED: &str = "SETTLEMENTS_TERMINATED";
pub const EVENT_SETTLED: &str = "EVENT_SETTLED";

/// Round to 2 decimal places, the resolution all money amounts carry.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Round an FX rate to [`FX_RATE_DECIMALS`].
pub fn round_rate(rate: f64) -> f64 {
    let scale = 10f64.powi(FX_RATE_DECIMALS as i32);
    (rate * scale).round() / scale
}
