//! Fixed price catalog for the investigation report and its add-ons.
//!
//! Prices are defined at compile time; there is no catalog storage or
//! admin surface. Unknown add-on ids are simply not priced, which the
//! request builder treats as "silently dropped".

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Id of the base product, always the first line item of every order.
pub const BASE_ITEM_ID: &str = "full-report";

pub const BASE_ITEM_TITLE: &str = "Full Investigation Report";
pub const BASE_ITEM_DESCRIPTION: &str = "Complete access to the investigation report.";

pub const ADDON_DESCRIPTION: &str = "Additional monitoring tool.";

const BASE_PRICE: Decimal = dec!(47.00);

const ADDON_PRICES: [(&str, Decimal); 4] = [
    ("whats", dec!(37.00)),
    ("insta", dec!(17.00)),
    ("facebook", dec!(17.00)),
    ("gps", dec!(7.00)),
];

/// Price of the base report item.
pub fn base_price() -> Decimal {
    BASE_PRICE
}

/// Price of a recognized add-on, `None` for ids outside the catalog.
pub fn addon_price(id: &str) -> Option<Decimal> {
    ADDON_PRICES
        .iter()
        .find(|(addon_id, _)| *addon_id == id)
        .map(|(_, price)| *price)
}

/// Display title for an add-on line item, e.g. "Whats Check".
pub fn addon_title(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => format!("{}{} Check", first.to_uppercase(), chars.as_str()),
        None => "Check".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_price_is_forty_seven() {
        assert_eq!(base_price(), dec!(47.00));
    }

    #[test]
    fn known_addons_are_priced() {
        assert_eq!(addon_price("whats"), Some(dec!(37.00)));
        assert_eq!(addon_price("insta"), Some(dec!(17.00)));
        assert_eq!(addon_price("facebook"), Some(dec!(17.00)));
        assert_eq!(addon_price("gps"), Some(dec!(7.00)));
    }

    #[test]
    fn unknown_addon_has_no_price() {
        assert_eq!(addon_price("crystal-ball"), None);
        assert_eq!(addon_price(""), None);
    }

    #[test]
    fn addon_titles_are_capitalized() {
        assert_eq!(addon_title("whats"), "Whats Check");
        assert_eq!(addon_title("gps"), "Gps Check");
    }
}
