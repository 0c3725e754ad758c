use crate::errors::ServiceError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Hard per-line quantity ceiling; any line above it rejects the whole sale.
pub const MAX_LINE_QUANTITY: i32 = 20;

/// Quantity-tier discount fraction. Tier boundaries are inclusive-upper.
pub fn discount_fraction(quantity: i32) -> Decimal {
    if quantity < 4 {
        Decimal::ZERO
    } else if quantity <= 9 {
        dec!(0.10)
    } else if quantity <= 20 {
        dec!(0.20)
    } else {
        // unreachable behind the ceiling guard
        Decimal::ZERO
    }
}

/// Line total after the tier discount: `unit_price * (1 - discount) * quantity`.
pub fn line_total(unit_price: Decimal, quantity: i32, discount: Decimal) -> Decimal {
    unit_price * (Decimal::ONE - discount) * Decimal::from(quantity)
}

/// Prices one line, returning the applied discount fraction and the total.
pub fn price_line(unit_price: Decimal, quantity: i32) -> (Decimal, Decimal) {
    let discount = discount_fraction(quantity);
    (discount, line_total(unit_price, quantity, discount))
}

/// Checks every line against the quantity ceiling in one pass; all offending
/// product names are reported together, not just the first.
pub fn check_quantity_ceiling<'a, I>(lines: I) -> Result<(), ServiceError>
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    let offending: Vec<String> = lines
        .into_iter()
        .filter(|(_, quantity)| *quantity > MAX_LINE_QUANTITY)
        .map(|(name, _)| name.to_string())
        .collect();

    if offending.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::QuantityLimitExceeded(offending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn discount_tier_boundaries() {
        assert_eq!(discount_fraction(1), Decimal::ZERO);
        assert_eq!(discount_fraction(3), Decimal::ZERO);
        assert_eq!(discount_fraction(4), dec!(0.10));
        assert_eq!(discount_fraction(9), dec!(0.10));
        assert_eq!(discount_fraction(10), dec!(0.20));
        assert_eq!(discount_fraction(20), dec!(0.20));
    }

    #[test]
    fn line_totals_are_exact_at_boundaries() {
        // q=3: no discount
        assert_eq!(price_line(dec!(50), 3), (Decimal::ZERO, dec!(150)));
        // q=4: 10%
        assert_eq!(price_line(dec!(100), 4), (dec!(0.10), dec!(360.00)));
        // q=9: 10%
        assert_eq!(price_line(dec!(10), 9), (dec!(0.10), dec!(81.00)));
        // q=10: 20%
        assert_eq!(price_line(dec!(10), 10), (dec!(0.20), dec!(80.00)));
        // q=20: 20%
        assert_eq!(price_line(dec!(5), 20), (dec!(0.20), dec!(80.00)));
    }

    #[test]
    fn scenario_values_from_the_discount_table() {
        // 5 x 100 at 10% -> 450
        assert_eq!(price_line(dec!(100), 5).1, dec!(450.00));
        // 12 x 20 at 20% -> 192
        assert_eq!(price_line(dec!(20), 12).1, dec!(192.00));
    }

    #[test]
    fn ceiling_guard_reports_every_offender() {
        let lines = vec![("Beer", 25), ("Water", 5), ("Soda", 21)];
        let err = check_quantity_ceiling(lines).unwrap_err();
        assert_matches!(err, ServiceError::QuantityLimitExceeded(names) => {
            assert_eq!(names, vec!["Beer".to_string(), "Soda".to_string()]);
        });
    }

    #[test]
    fn ceiling_guard_accepts_the_boundary() {
        assert!(check_quantity_ceiling(vec![("Beer", 20)]).is_ok());
    }
}
