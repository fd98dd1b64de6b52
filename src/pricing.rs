use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Price/tax snapshot for one line of a quote, cart or order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineSnapshot {
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub tax_percent: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Accumulated totals over a set of lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub total: Decimal,
}

/// Service for calculating line snapshots and document totals
pub struct PriceCalculator;

impl PriceCalculator {
    /// Unit price for a product: the discount price when set and positive,
    /// the general price otherwise
    pub fn unit_price(general_price: Decimal, discount_price: Option<Decimal>) -> Decimal {
        match discount_price {
            Some(discounted) if discounted > Decimal::ZERO => discounted,
            _ => general_price,
        }
    }

    /// Calculate subtotal for a line
    ///
    /// # Returns
    /// quantity * unit_price
    pub fn calculate_subtotal(quantity: i32, unit_price: Decimal) -> Decimal {
        Decimal::from(quantity) * unit_price
    }

    /// Tax for a line subtotal, rounded to whole units (half away from zero)
    ///
    /// 105 at 19% is 19.95 which rounds to 20.
    pub fn tax_amount(subtotal: Decimal, tax_percent: Decimal) -> Decimal {
        (subtotal * tax_percent / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Full snapshot for a line
    pub fn line(unit_price: Decimal, quantity: i32, tax_percent: Decimal) -> LineSnapshot {
        let subtotal = Self::calculate_subtotal(quantity, unit_price);
        let tax_amount = Self::tax_amount(subtotal, tax_percent);
        LineSnapshot {
            quantity,
            unit_price,
            subtotal,
            tax_percent,
            tax_amount,
            total: subtotal + tax_amount,
        }
    }

    /// Sum subtotals and taxes of all lines; total = subtotal + tax
    pub fn totals<'a, I>(lines: I) -> Totals
    where
        I: IntoIterator<Item = &'a LineSnapshot>,
    {
        let (subtotal, tax_total) = lines
            .into_iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(sub, tax), line| {
                (sub + line.subtotal, tax + line.tax_amount)
            });
        Totals {
            subtotal,
            tax_total,
            total: subtotal + tax_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unit_price_uses_general_when_discount_is_zero() {
        assert_eq!(PriceCalculator::unit_price(dec!(1000), Some(dec!(0))), dec!(1000));
    }

    #[test]
    fn test_unit_price_uses_general_when_discount_missing() {
        assert_eq!(PriceCalculator::unit_price(dec!(1000), None), dec!(1000));
    }

    #[test]
    fn test_unit_price_uses_positive_discount() {
        assert_eq!(PriceCalculator::unit_price(dec!(1000), Some(dec!(850))), dec!(850));
    }

    #[test]
    fn test_calculate_subtotal_basic() {
        assert_eq!(PriceCalculator::calculate_subtotal(2, dec!(4.50)), dec!(9.00));
    }

    #[test]
    fn test_tax_rounding_boundary() {
        // 105 * 19 / 100 = 19.95
        assert_eq!(PriceCalculator::tax_amount(dec!(105), dec!(19)), dec!(20));
    }

    #[test]
    fn test_tax_rounds_down_below_midpoint() {
        // 101 * 19 / 100 = 19.19
        assert_eq!(PriceCalculator::tax_amount(dec!(101), dec!(19)), dec!(19));
    }

    #[test]
    fn test_tax_exact_midpoint_rounds_up() {
        // 50 * 1 / 100 = 0.5
        assert_eq!(PriceCalculator::tax_amount(dec!(50), dec!(1)), dec!(1));
    }

    #[test]
    fn test_line_two_units_at_thousand() {
        let line = PriceCalculator::line(dec!(1000), 2, dec!(19));
        assert_eq!(line.subtotal, dec!(2000));
        assert_eq!(line.tax_amount, dec!(380));
        assert_eq!(line.total, dec!(2380));
        assert_eq!(line.tax_percent, dec!(19));
    }

    #[test]
    fn test_totals_multiple_lines() {
        let lines = vec![
            PriceCalculator::line(dec!(1000), 2, dec!(19)),
            PriceCalculator::line(dec!(105), 1, dec!(19)),
        ];
        let totals = PriceCalculator::totals(&lines);
        assert_eq!(totals.subtotal, dec!(2105));
        assert_eq!(totals.tax_total, dec!(400));
        assert_eq!(totals.total, dec!(2505));
    }

    #[test]
    fn test_totals_empty() {
        let lines: Vec<LineSnapshot> = vec![];
        assert_eq!(PriceCalculator::totals(&lines), Totals::default());
    }
}
