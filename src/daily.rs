//! Round-order helpers: the casual shuffle for normal rounds and the
//! date-seeded daily selection, which gives everyone the same ten regions on
//! a given Stockholm calendar date.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Regions per daily round.
pub const DAILY_COUNT: usize = 10;

/// Seed string for a Stockholm calendar date, e.g. "2026-3-7" (no padding).
pub fn seed_string(year: i32, month: u32, day: u32) -> String {
    format!("{}-{}-{}", year, month, day)
}

/// FNV-1a. The seed hash has to be stable across builds and platforms, so
/// every client derives the same order from the same date.
fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for b in s.as_bytes() {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Daily region order: seeded Fisher-Yates over the whole dataset, first
/// `DAILY_COUNT` kept.
pub fn daily_order(region_count: usize, year: i32, month: u32, day: u32) -> Vec<usize> {
    let mut rng = SmallRng::seed_from_u64(fnv1a(&seed_string(year, month, day)));
    let mut indices: Vec<usize> = (0..region_count).collect();
    indices.shuffle(&mut rng);
    indices.truncate(DAILY_COUNT);
    indices
}

/// Fresh shuffle for a normal round, seeded from the browser clock.
pub fn random_order(region_count: usize) -> Vec<usize> {
    let now = js_sys::Date::now() as u64;
    let extra = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let mut rng = SmallRng::seed_from_u64(now ^ (extra << 16));
    let mut indices: Vec<usize> = (0..region_count).collect();
    indices.shuffle(&mut rng);
    indices
}

/// Today's date in Europe/Stockholm as (year, month, day), read from the
/// browser clock via the sv-SE locale format.
pub fn stockholm_today() -> (i32, u32, u32) {
    let options = js_sys::Object::new();
    let _ = js_sys::Reflect::set(
        &options,
        &"timeZone".into(),
        &"Europe/Stockholm".into(),
    );
    let formatted: String = js_sys::Date::new_0()
        .to_locale_date_string("sv-SE", &options)
        .into();
    parse_ymd(&formatted).unwrap_or((1970, 1, 1))
}

/// Parses "YYYY-MM-DD" (sv-SE date format).
fn parse_ymd(s: &str) -> Option<(i32, u32, u32)> {
    let mut parts = s.split('-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    Some((year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_date_gives_same_order() {
        let a = daily_order(40, 2026, 8, 23);
        let b = daily_order(40, 2026, 8, 23);
        assert_eq!(a, b);
        assert_eq!(a.len(), DAILY_COUNT);
    }

    #[test]
    fn different_dates_give_different_orders() {
        let a = daily_order(40, 2026, 8, 23);
        let b = daily_order(40, 2026, 8, 24);
        assert_ne!(a, b);
        let c = daily_order(40, 2027, 8, 23);
        assert_ne!(a, c);
    }

    #[test]
    fn order_entries_are_distinct_dataset_indices() {
        let order = daily_order(40, 2026, 1, 1);
        let mut seen = order.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), order.len());
        assert!(order.iter().all(|&i| i < 40));
    }

    #[test]
    fn small_dataset_is_taken_whole() {
        let mut order = daily_order(4, 2026, 8, 23);
        assert_eq!(order.len(), 4);
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn seed_string_is_unpadded() {
        assert_eq!(seed_string(2026, 3, 7), "2026-3-7");
        assert_eq!(seed_string(2026, 12, 31), "2026-12-31");
    }

    #[test]
    fn parse_ymd_reads_sv_se_dates() {
        assert_eq!(parse_ymd("2026-08-23"), Some((2026, 8, 23)));
        assert_eq!(parse_ymd("1999-1-2"), Some((1999, 1, 2)));
        assert_eq!(parse_ymd("not a date"), None);
        assert_eq!(parse_ymd("2026-08"), None);
    }
}
