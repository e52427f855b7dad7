use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

/// Procento s jedním desetinným místem pro reason stringy
/// Příklad: 10.0 -> "10.0", 14.55 -> "14.6"
pub fn format_percent(value: f64) -> String {
    format!("{:.1}", value)
}

/// Lag v sekundách bez zbytečných nul, max. 3 desetinná místa
/// Příklad: 45.0 -> "45", 30.001 -> "30.001"
pub fn format_lag(secs: f64) -> String {
    let rounded = (secs * 1000.0).round() / 1000.0;
    format!("{}", rounded)
}

/// Popisek hrany topologie podle lagu followera
pub fn format_lag_label(secs: Option<f64>) -> String {
    match secs {
        Some(secs) => format!("{}s", format_lag(secs)),
        None => "lag unknown".to_string(),
    }
}

/// Jeden segment URL cesty, např. cluster_id "AG 1/prod" -> "AG%201%2Fprod"
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, NON_ALPHANUMERIC).to_string()
}

/// Formátuje číslo s oddělovači pro lepší čitelnost
/// Příklad: 1234567 -> "1 234 567"
pub fn format_number(num: u64) -> String {
    let num_str = num.to_string();
    let mut result = String::new();

    for (count, c) in num_str.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(' ');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(10.0), "10.0");
        assert_eq!(format_percent(19.5), "19.5");
        assert_eq!(format_percent(0.0), "0.0");
    }

    #[test]
    fn test_format_lag() {
        assert_eq!(format_lag(45.0), "45");
        assert_eq!(format_lag(30.001), "30.001");
        assert_eq!(format_lag(12.5), "12.5");
        assert_eq!(format_lag(0.0), "0");
    }

    #[test]
    fn test_format_lag_label() {
        assert_eq!(format_lag_label(Some(7.0)), "7s");
        assert_eq!(format_lag_label(None), "lag unknown");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("rs0"), "rs0");
        assert_eq!(encode_path_segment("AG 1/prod"), "AG%201%2Fprod");
        assert_eq!(encode_path_segment("a?b#c"), "a%3Fb%23c");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1 234");
        assert_eq!(format_number(1234567), "1 234 567");
    }
}
