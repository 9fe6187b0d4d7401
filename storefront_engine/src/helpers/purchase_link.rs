use crate::db_types::Product;

const MESSAGING_BASE_URL: &str = "https://wa.me";

/// Builds the pre-filled chat link a customer follows to ask about buying `product`.
pub fn purchase_link(product: &Product, phone: &str) -> String {
    let phone = phone.chars().filter(char::is_ascii_digit).collect::<String>();
    let message = format!("Olá! Tenho interesse no produto: {} - {}", product.name, product.price);
    format!("{MESSAGING_BASE_URL}/{phone}?text={}", urlencoding::encode(&message))
}
