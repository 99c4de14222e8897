use crate::constants::{round2, round_rate};
use crate::core::errors::SplitLedgerError;
use crate::core::models::{RateMode, RateQuote, RateSource};
use crate::infrastructure::rates::{RateCache, RateFetcher, day_key};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Payment routing policy. Deliberately trivial: one designated provider
/// for INR, a default for everything else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentProvider {
    Upi,
    Paypal,
}

pub fn payment_provider(currency: &str) -> PaymentProvider {
    if currency == "INR" {
        PaymentProvider::Upi
    } else {
        PaymentProvider::Paypal
    }
}

pub fn convert(amount: f64, rate: f64) -> f64 {
    round2(amount * rate)
}

pub struct FxRateResolver<C: RateCache, F: RateFetcher> {
    cache: C,
    fetcher: F,
}

impl<C: RateCache, F: RateFetcher> FxRateResolver<C, F> {
    pub fn new(cache: C, fetcher: F) -> Self {
        FxRateResolver { cache, fetcher }
    }

    /// Resolves a conversion rate from `from` to `to`.
    ///
    /// In predefined mode an admin-fixed rate wins, looked up forward then
    /// reverse-and-inverted; a missing predefined key falls through to EOD
    /// resolution rather than failing. EOD resolution serves from the
    /// per-day cache when it can, otherwise fetches the full table for
    /// `from`, caches it best-effort and reads the target out of it. When
    /// the fetch fails or lacks the target, the reverse-direction cache is
    /// tried before giving up with an error naming both currencies.
    pub async fn get_rate(
        &self,
        from: &str,
        to: &str,
        predefined: &HashMap<String, f64>,
        mode: RateMode,
    ) -> Result<RateQuote, SplitLedgerError> {
        let today = Utc::now().date_naive();

        if from == to {
            return Ok(RateQuote {
                from: from.to_string(),
                to: to.to_string(),
                rate: 1.0,
                date: today,
                source: match mode {
                    RateMode::Predefined => RateSource::Predefined,
                    RateMode::Eod => RateSource::Eod,
                },
            });
        }

        if mode == RateMode::Predefined {
            if let Some(&rate) = predefined.get(&format!("{}_{}", from, to)) {
                return Ok(RateQuote {
                    from: from.to_string(),
                    to: to.to_string(),
                    rate,
                    date: today,
                    source: RateSource::Predefined,
                });
            }
            if let Some(&reverse) = predefined.get(&format!("{}_{}", to, from)) {
                if reverse != 0.0 {
                    return Ok(RateQuote {
                        from: from.to_string(),
                        to: to.to_string(),
                        rate: round_rate(1.0 / reverse),
                        date: today,
                        source: RateSource::Predefined,
                    });
                }
            }
            debug!(from, to, "no predefined rate, falling through to EOD");
        }

        self.eod_rate(from, to).await
    }

    async fn eod_rate(&self, from: &str, to: &str) -> Result<RateQuote, SplitLedgerError> {
        let today = Utc::now().date_naive();
        let key = day_key(from, today);

        match self.cache.get(&key).await {
            Ok(Some(table)) => {
                if let Some(rate) = table.rate_for(to) {
                    return Ok(RateQuote {
                        from: from.to_string(),
                        to: to.to_string(),
                        rate,
                        date: table.date,
                        source: RateSource::Eod,
                    });
                }
            }
            Ok(None) => {}
            Err(e) => warn!(key = %key, error = %e, "rate cache read failed"),
        }

        match self.fetcher.fetch(from).await {
            Ok(table) => {
                if let Err(e) = self.cache.put(&key, table.clone()).await {
                    // Caching is best-effort; the fetched rate still serves
                    // this request.
                    warn!(key = %key, error = %e, "rate cache write failed");
                }
                if let Some(rate) = table.rate_for(to) {
                    return Ok(RateQuote {
                        from: from.to_string(),
                        to: to.to_string(),
                        rate,
                        date: table.date,
                        source: RateSource::Eod,
                    });
                }
                warn!(from, to, "fetched rate table lacks target currency");
            }
            Err(e) => warn!(from, error = %e, "rate fetch failed"),
        }

        self.reverse_cache_fallback(from, to).await
    }

    async fn reverse_cache_fallback(
        &self,
        from: &str,
        to: &str,
    ) -> Result<RateQuote, SplitLedgerError> {
        let today = Utc::now().date_naive();
        let reverse_key = day_key(to, today);

        if let Ok(Some(table)) = self.cache.get(&reverse_key).await {
            if let Some(reverse) = table.rate_for(from) {
                if reverse != 0.0 {
                    debug!(from, to, "resolved via reverse cache entry");
                    return Ok(RateQuote {
                        from: from.to_string(),
                        to: to.to_string(),
                        rate: round_rate(1.0 / reverse),
                        date: table.date,
                        source: RateSource::Eod,
                    });
                }
            }
        }

        Err(SplitLedgerError::RateUnavailable {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}
