//! Derived pricing and stock availability.
//!
//! Pure helpers shared by every consumer of the catalog. A single rounding
//! policy (two decimals, midpoint away from zero) so the list and detail
//! views never disagree on a displayed price.

use rust_decimal::{Decimal, RoundingStrategy};

/// Displayed price after applying the discount percentage.
///
/// `precio * (1 - porcentaje_oferta / 100)`, rounded to two decimals.
/// Recomputed on every read, never stored.
pub fn final_price(precio: Decimal, porcentaje_oferta: Decimal) -> Decimal {
    let factor = Decimal::ONE - porcentaje_oferta / Decimal::ONE_HUNDRED;
    (precio * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Stock label shown next to a product.
pub fn availability_label(cantidad: u32) -> String {
    if cantidad > 0 {
        format!("{cantidad} unidades disponibles")
    } else {
        "Agotado".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_price_with_discount() {
        assert_eq!(
            final_price(Decimal::new(100, 0), Decimal::new(10, 0)),
            Decimal::new(90, 0)
        );
    }

    #[test]
    fn test_final_price_no_discount_is_identity() {
        assert_eq!(
            final_price(Decimal::new(99999, 2), Decimal::ZERO),
            Decimal::new(99999, 2)
        );
    }

    #[test]
    fn test_final_price_full_discount() {
        assert_eq!(
            final_price(Decimal::new(4999, 2), Decimal::ONE_HUNDRED),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_final_price_rounds_to_two_decimals() {
        // 19.99 * 0.85 = 16.9915 -> 16.99
        assert_eq!(
            final_price(Decimal::new(1999, 2), Decimal::new(15, 0)),
            Decimal::new(1699, 2)
        );
    }

    #[test]
    fn test_final_price_monotone_in_discount() {
        let precio = Decimal::new(12345, 2);
        let mut previous = final_price(precio, Decimal::ZERO);
        for pct in 1..=100u32 {
            let current = final_price(precio, Decimal::from(pct));
            assert!(current <= previous, "price rose at {pct}%");
            previous = current;
        }
    }

    #[test]
    fn test_availability_label() {
        assert_eq!(availability_label(0), "Agotado");
        assert_eq!(availability_label(5), "5 unidades disponibles");
        assert_eq!(availability_label(1), "1 unidades disponibles");
    }
}
