//! Price decay and USD to CCD conversion. Nothing here touches the host.
use commons::{CustomContractError, RoundData, MICRO_CCD_PER_CCD};
use concordium_std::*;
use core::convert::TryFrom;

const MILLIS_PER_SECOND: u64 = 1000;

/// Whole seconds in `duration`.
pub fn duration_seconds(duration: Duration) -> u64 {
    duration.millis() / MILLIS_PER_SECOND
}

/// Whole seconds elapsed between `start` and `now`, zero if `now` is earlier.
pub fn elapsed_seconds(start: Timestamp, now: Timestamp) -> u64 {
    now.timestamp_millis()
        .saturating_sub(start.timestamp_millis())
        / MILLIS_PER_SECOND
}

/// Linearly decayed USD price.
///
/// `start - (start - end) * min(elapsed, duration) / duration`, rounded down
/// on the decrement, so the result never leaves `[end, start]`.
pub fn current_price_usd(
    start_price: u64,
    end_price: u64,
    start_time: Timestamp,
    duration: Duration,
    now: Timestamp,
) -> u64 {
    let total = duration_seconds(duration);
    if total == 0 || start_price <= end_price {
        return end_price;
    }

    let elapsed = elapsed_seconds(start_time, now).min(total);
    let range = u128::from(start_price - end_price);
    let decrement = range * u128::from(elapsed) / u128::from(total);

    // decrement <= range, so this fits in u64
    start_price - decrement as u64
}

/// Converts whole USD to micro-CCD at the rate of `round`, rounding down.
pub fn usd_to_micro_ccd(usd: u64, round: &RoundData) -> Result<Amount, CustomContractError> {
    ensure!(
        round.answer != 0 && round.round_id != 0,
        CustomContractError::PriceUnavailable
    );

    let scale = 10u128
        .checked_pow(u32::from(round.decimals))
        .ok_or(CustomContractError::Overflow)?;
    let micro_ccd = u128::from(usd)
        .checked_mul(scale)
        .and_then(|v| v.checked_mul(MICRO_CCD_PER_CCD))
        .ok_or(CustomContractError::Overflow)?
        / u128::from(round.answer);

    u64::try_from(micro_ccd)
        .map(Amount::from_micro_ccd)
        .map_err(|_| CustomContractError::Overflow)
}

/// Whether `round` is older than `max_age` at `now`.
pub fn is_stale(round: &RoundData, now: Timestamp, max_age: Duration) -> bool {
    now.timestamp_millis()
        .saturating_sub(round.updated_at.timestamp_millis())
        > max_age.millis()
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    fn at(seconds: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(1_000_000 + seconds * 1000)
    }

    fn round(answer: u64, decimals: u8) -> RoundData {
        RoundData {
            round_id: 1,
            answer,
            decimals,
            started_at: at(0),
            updated_at: at(0),
        }
    }

    #[concordium_test]
    fn test_halfway_price() {
        let price = current_price_usd(100, 10, at(0), Duration::from_seconds(100), at(50));
        claim_eq!(price, 55);
    }

    #[concordium_test]
    fn test_price_at_bounds() {
        let duration = Duration::from_seconds(100);
        claim_eq!(current_price_usd(100, 10, at(0), duration, at(0)), 100);
        claim_eq!(current_price_usd(100, 10, at(0), duration, at(100)), 10);
        claim_eq!(current_price_usd(100, 10, at(0), duration, at(10_000)), 10);
    }

    #[concordium_test]
    fn test_price_is_monotonic_and_bounded() {
        let cases = [(100, 10, 100), (1_000_000, 1, 7), (5, 5, 60), (u64::MAX, 0, 3600)];
        for (start, end, seconds) in cases.iter().copied() {
            let duration = Duration::from_seconds(seconds);
            let mut previous = start;
            for t in 0..=seconds + 5 {
                let price = current_price_usd(start, end, at(0), duration, at(t));
                claim!(price <= previous, "Price must never increase");
                claim!(price >= end && price <= start, "Price must stay in range");
                previous = price;
            }
            claim_eq!(previous, end);
        }
    }

    #[concordium_test]
    fn test_clock_before_start_gives_start_price() {
        let price = current_price_usd(100, 10, at(50), Duration::from_seconds(100), at(0));
        claim_eq!(price, 100);
    }

    #[concordium_test]
    fn test_sub_second_progress_is_ignored() {
        let start = at(0);
        let now = Timestamp::from_timestamp_millis(start.timestamp_millis() + 999);
        claim_eq!(
            current_price_usd(100, 10, start, Duration::from_seconds(100), now),
            100
        );
    }

    #[concordium_test]
    fn test_usd_to_micro_ccd() {
        // 1 CCD = 0.05 USD with 8 decimals
        let rate = round(5_000_000, 8);
        claim_eq!(usd_to_micro_ccd(55, &rate), Ok(Amount::from_ccd(1100)));

        // 1 CCD = 3 USD, floor of 10/3 CCD
        let rate = round(300, 2);
        claim_eq!(usd_to_micro_ccd(10, &rate), Ok(Amount::from_micro_ccd(3_333_333)));

        claim_eq!(usd_to_micro_ccd(0, &rate), Ok(Amount::zero()));
    }

    #[concordium_test]
    fn test_usd_to_micro_ccd_rejects_bad_rounds() {
        claim_eq!(
            usd_to_micro_ccd(10, &round(0, 8)),
            Err(CustomContractError::PriceUnavailable)
        );

        let mut never_updated = round(100, 2);
        never_updated.round_id = 0;
        claim_eq!(
            usd_to_micro_ccd(10, &never_updated),
            Err(CustomContractError::PriceUnavailable)
        );

        claim_eq!(
            usd_to_micro_ccd(u64::MAX, &round(1, 18)),
            Err(CustomContractError::Overflow)
        );
    }

    #[concordium_test]
    fn test_staleness() {
        let rate = round(100, 2);
        let max_age = Duration::from_seconds(60);
        claim!(!is_stale(&rate, at(60), max_age));
        claim!(is_stale(&rate, at(61), max_age));
        // A clock behind the round is not stale
        claim!(!is_stale(&rate, Timestamp::from_timestamp_millis(0), max_age));
    }
}
