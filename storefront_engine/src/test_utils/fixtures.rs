//! A small, known catalog for tests.
use crate::{
    db_types::{Banner, Category, NewBanner, NewCategory, NewProduct, NewProductImage, Product},
    MemoryCatalog,
};

pub const ADMIN_EMAIL: &str = "admin@loja.com";
pub const ADMIN_PASSWORD: &str = "senha-forte";
pub const SHOPPER_EMAIL: &str = "cliente@loja.com";
pub const SHOPPER_PASSWORD: &str = "outra-senha";

pub struct SeededCatalog {
    pub db: MemoryCatalog,
    pub shirts: Category,
    pub trousers: Category,
    pub blue_shirt: Product,
    pub red_shirt: Product,
    pub jeans: Product,
    pub banners: Vec<Banner>,
}

fn price(s: &str) -> storefront_common::Price {
    s.parse().unwrap_or_default()
}

/// Two categories, three products, two active banners and one inactive one. `ADMIN_EMAIL` and `SHOPPER_EMAIL` are
/// registered with the auth service.
pub fn seeded_catalog() -> SeededCatalog {
    let db = MemoryCatalog::new();
    let shirts = db.seed_category(NewCategory::new("Camisas").with_display_order(1));
    let trousers = db.seed_category(NewCategory::new("Calças").with_display_order(2));
    let blue_shirt = db.seed_product(
        NewProduct::new("Camisa Azul", price("100"))
            .with_category(shirts.id.clone())
            .with_description("Algodão")
            .featured(true)
            .with_display_order(2),
    );
    let red_shirt = db.seed_product(
        NewProduct::new("Camisa Vermelha", price("50")).with_category(shirts.id.clone()).with_display_order(1),
    );
    let jeans = db.seed_product(NewProduct::new("Calça Jeans", price("149.90")).with_category(trousers.id.clone()));
    db.seed_product_image(NewProductImage {
        product_id: blue_shirt.id.clone(),
        image_url: "https://cdn.example.com/azul-2.jpg".into(),
        display_order: 2,
    });
    db.seed_product_image(NewProductImage {
        product_id: blue_shirt.id.clone(),
        image_url: "https://cdn.example.com/azul-1.jpg".into(),
        display_order: 1,
    });
    let banners = vec![
        db.seed_banner(NewBanner::new("https://cdn.example.com/hero-2.jpg").with_title("Inverno").with_display_order(2)),
        db.seed_banner(NewBanner::new("https://cdn.example.com/hero-1.jpg").with_title("Verão").with_display_order(1)),
        db.seed_banner(NewBanner::new("https://cdn.example.com/old.jpg").active(false)),
    ];
    db.add_user(ADMIN_EMAIL, ADMIN_PASSWORD);
    db.add_user(SHOPPER_EMAIL, SHOPPER_PASSWORD);
    SeededCatalog { db, shirts, trousers, blue_shirt, red_shirt, jeans, banners }
}
