use rust_decimal::{Decimal, RoundingStrategy};

/// Formata um valor em Real no padrão pt-BR: `R$ 1.234,56`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let plain = format!("{:.2}", rounded.abs());
    let (integer, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R$ {grouped},{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn formats_thousands_and_cents() {
        assert_eq!(format_currency(dec("1234.5")), "R$ 1.234,50");
        assert_eq!(format_currency(dec("1234567.891")), "R$ 1.234.567,89");
        assert_eq!(format_currency(dec("999")), "R$ 999,00");
    }

    #[test]
    fn formats_zero_and_negative() {
        assert_eq!(format_currency(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_currency(dec("-0.001")), "R$ 0,00");
        assert_eq!(format_currency(dec("-10.5")), "-R$ 10,50");
    }
}
