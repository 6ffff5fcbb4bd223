//! Currency helpers. Prices are whole rupees stored as `i64`.

/// Format rupees with thousands separators, e.g. `Rs. 150,000`.
pub fn format_rupees(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("Rs. -{}", grouped)
    } else {
        format!("Rs. {}", grouped)
    }
}

/// Price with its billing period, e.g. `Rs. 4,500/night`.
pub fn format_price(amount: i64, period: &str) -> String {
    format!("{}/{}", format_rupees(amount), period)
}

/// Parse a user-typed amount such as `150,000` into rupees.
pub fn parse_rupees(amount_str: &str) -> Result<i64, String> {
    amount_str
        .trim()
        .replace(',', "")
        .parse::<i64>()
        .map_err(|_| "Invalid amount format".to_string())
        .and_then(|amount| {
            if amount < 0 {
                Err("Amount cannot be negative".to_string())
            } else {
                Ok(amount)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(0), "Rs. 0");
        assert_eq!(format_rupees(999), "Rs. 999");
        assert_eq!(format_rupees(1000), "Rs. 1,000");
        assert_eq!(format_rupees(150000), "Rs. 150,000");
        assert_eq!(format_rupees(12345678), "Rs. 12,345,678");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(150000, "month"), "Rs. 150,000/month");
        assert_eq!(format_price(4500, "night"), "Rs. 4,500/night");
    }

    #[test]
    fn test_parse_rupees() {
        assert_eq!(parse_rupees("150,000"), Ok(150000));
        assert_eq!(parse_rupees(" 50 "), Ok(50));
        assert_eq!(parse_rupees("-100"), Err("Amount cannot be negative".to_string()));
        assert_eq!(parse_rupees("abc"), Err("Invalid amount format".to_string()));
    }
}
