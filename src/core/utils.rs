//! Identifier helpers exposed to templates as filters.
//!
//! BAM activity, checkpoint and view names are free text typed into Excel
//! ("Order Received", "PO_Number", "2nd Shipment"). Templates need them as
//! identifiers in the generated language.

/// Converts a string to snake_case.
///
/// Handles camelCase, PascalCase, kebab-case and space-separated input.
///
/// # Examples
/// ```
/// use bamgen::core::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("OrderReceived"), "order_received");
/// assert_eq!(to_snake_case("order-received"), "order_received");
/// assert_eq!(to_snake_case("Order Received Time"), "order_received_time");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && prev_is_lowercase {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase();
        } else if !result.is_empty() && !result.ends_with('_') {
            result.push('_');
            prev_is_lowercase = false;
        }
    }

    result.trim_matches('_').to_string()
}

/// Converts free text to a PascalCase identifier.
///
/// Words are split on anything that is not alphanumeric. The first letter
/// of each word is upper-cased and the rest is kept as typed, so acronyms
/// survive ("PO_Number" becomes "PONumber"). A leading digit gets an
/// underscore prefix so the result is always a legal identifier.
///
/// # Examples
/// ```
/// use bamgen::core::utils::to_pascal_case;
///
/// assert_eq!(to_pascal_case("order received"), "OrderReceived");
/// assert_eq!(to_pascal_case("PO_Number"), "PONumber");
/// assert_eq!(to_pascal_case("2nd shipment"), "_2ndShipment");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    let mut result: String = s
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect();

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}
