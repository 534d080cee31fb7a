use chrono::{Duration, NaiveDate};
use rand::Rng;

/// Pick one value from predefined options using provided RNG
pub fn generate_from_options_with_rng<R: Rng>(options: &[&str], rng: &mut R) -> String {
    options[rng.gen_range(0..options.len())].to_string()
}

/// Generate ID with prefix and a random number in [low, high] using provided RNG
pub fn generate_prefixed_id_with_rng<R: Rng>(
    prefix: &str,
    low: u32,
    high: u32,
    rng: &mut R,
) -> String {
    format!("{}{}", prefix, rng.gen_range(low..=high))
}

/// Round a monetary amount to two decimal places
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Zero-padded account number, e.g. 7 -> "ACC0007"
pub fn account_number(index: usize) -> String {
    format!("ACC{index:04}")
}

/// Posted date as YYYY-MM-DD, `day_offset` days after the base date
pub fn posted_date_string(base_date: NaiveDate, day_offset: i64) -> String {
    (base_date + Duration::days(day_offset))
        .format("%Y-%m-%d")
        .to_string()
}

/// Format an integer count with comma thousands separators
pub fn group_digits(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn posted_dates_cycle_through_december_window() {
        let base = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(posted_date_string(base, 0), "2024-12-01");
        assert_eq!(posted_date_string(base, 29), "2024-12-30");
        // modulo cycling keeps every offset inside the 30-day window
        for txn_idx in 0..100usize {
            let date = posted_date_string(base, (txn_idx % 30) as i64);
            assert!(date.starts_with("2024-12-"));
        }
    }

    #[test]
    fn account_numbers_are_zero_padded() {
        assert_eq!(account_number(1), "ACC0001");
        assert_eq!(account_number(250), "ACC0250");
    }

    #[test]
    fn prefixed_ids_stay_in_range() {
        let mut rng = thread_rng();
        for _ in 0..100 {
            let id = generate_prefixed_id_with_rng("TXN", 100_000, 999_999, &mut rng);
            let digits: u32 = id.strip_prefix("TXN").unwrap().parse().unwrap();
            assert!((100_000..=999_999).contains(&digits));
        }
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round_to_cents(12.3456), 12.35);
        assert_eq!(round_to_cents(-0.005), -0.01);
        assert_eq!(round_to_cents(1000.0), 1000.0);
    }

    #[test]
    fn group_digits_inserts_separators() {
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(10_000), "10,000");
        assert_eq!(group_digits(250_000), "250,000");
    }
}
