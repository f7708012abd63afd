//! Localized ineligibility messages.
//!
//! Supported languages: `pt_br` and default English. These are the
//! user-facing texts carried in `invalid_coupon_message`.

/// Whether the request language selects Brazilian Portuguese.
fn is_pt_br(lang: Option<&str>) -> bool {
    lang == Some("pt_br")
}

/// No promoted product is present in the cart.
#[must_use]
pub fn no_promotion_products(lang: Option<&str>) -> String {
    if is_pt_br(lang) {
        "Nenhum produto da promoção está incluído no carrinho".to_string()
    } else {
        "No promotion products are included in the cart".to_string()
    }
}

/// The cart contains a product the promotion excludes.
#[must_use]
pub fn invalid_for_product(lang: Option<&str>, product_name: &str) -> String {
    if is_pt_br(lang) {
        format!("Promoção é inválida para o produto {product_name}")
    } else {
        format!("Invalid promotion for product {product_name}")
    }
}

/// The matched rule is non-cumulative and another discount is present.
#[must_use]
pub fn not_cumulative(lang: Option<&str>) -> String {
    if is_pt_br(lang) {
        "A promoção não pôde ser aplicada porque este desconto não é cumulativo".to_string()
    } else {
        "This discount is not cumulative".to_string()
    }
}

/// The promotion reached its usage limit.
#[must_use]
pub fn usage_limit_reached(lang: Option<&str>) -> String {
    if is_pt_br(lang) {
        "A promoção não pôde ser aplicada porque já atingiu o limite de usos".to_string()
    } else {
        "The promotion could not be applied because it has already reached the usage limit"
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language_is_english() {
        assert_eq!(
            no_promotion_products(None),
            "No promotion products are included in the cart"
        );
        assert_eq!(not_cumulative(Some("es")), "This discount is not cumulative");
    }

    #[test]
    fn test_pt_br_translations() {
        assert!(usage_limit_reached(Some("pt_br")).contains("limite de usos"));
        assert_eq!(
            invalid_for_product(Some("pt_br"), "Caneca"),
            "Promoção é inválida para o produto Caneca"
        );
    }
}
