pub fn format_duration_secs(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

pub fn format_cost(usd: f64) -> String {
    let usd = usd.abs(); // avoid negative zero display
    format!("${:.4}", usd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_buckets() {
        assert_eq!(format_duration_secs(42), "42s");
        assert_eq!(format_duration_secs(150), "2m 30s");
        assert_eq!(format_duration_secs(7260), "2h 1m");
        assert_eq!(format_duration_secs(-5), "0s");
    }

    #[test]
    fn cost_is_four_decimals() {
        assert_eq!(format_cost(0.0314), "$0.0314");
        assert_eq!(format_cost(0.0), "$0.0000");
    }
}
