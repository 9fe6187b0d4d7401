use std::{fmt::Display, time::Duration};

use serde::{Deserialize, Serialize};
use storefront_common::helpers::parse_boolean_flag;
use storefront_engine::{
    carousel::{Carousel, Slide},
    db_types::Product,
    helpers::purchase_link,
    query_objects::CatalogFilter,
};

/// Query parameters of the public catalog listing. The names match the storefront's URLs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogParams {
    pub categoria: Option<String>,
    pub busca: Option<String>,
    pub ordem: Option<String>,
    pub destaque: Option<String>,
}

impl CatalogParams {
    pub fn into_filter(self) -> CatalogFilter {
        let featured = parse_boolean_flag(self.destaque, false);
        CatalogFilter::new(self.categoria, self.busca, self.ordem, featured)
    }
}

/// A product as the detail page shows it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub purchase_link: String,
    pub primary_image: Option<String>,
}

impl ProductDetail {
    pub fn new(product: Product, whatsapp_number: &str) -> Self {
        let purchase_link = purchase_link(&product, whatsapp_number);
        let primary_image = product.primary_image().map(|i| i.image_url.clone());
        Self { product, purchase_link, primary_image }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadParams {
    pub folder: Option<String>,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroResponse {
    pub slides: Vec<Slide>,
    pub current: usize,
    /// Seconds between slides. Zero when the carousel does not rotate.
    pub interval_secs: u64,
}

impl HeroResponse {
    pub fn new(carousel: &Carousel, interval: Duration) -> Self {
        let interval_secs = if carousel.rotates() { interval.as_secs() } else { 0 };
        Self { slides: carousel.slides().to_vec(), current: carousel.current_index(), interval_secs }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

#[cfg(test)]
mod test {
    use storefront_engine::{
        db_types::{Banner, ProductImage},
        query_objects::SortMode,
        test_utils::fixtures::seeded_catalog,
    };

    use super::*;

    fn image(product: &Product, id: &str, url: &str, display_order: i32) -> ProductImage {
        ProductImage { id: id.into(), product_id: product.id.clone(), image_url: url.into(), display_order }
    }

    #[test]
    fn catalog_params_become_a_filter() {
        let params = CatalogParams {
            categoria: Some("camisas".into()),
            busca: Some("  ".into()),
            ordem: Some("price_desc".into()),
            destaque: Some("sim".into()),
        };
        let filter = params.into_filter();
        assert_eq!(filter.category_slug.as_deref(), Some("camisas"));
        assert_eq!(filter.search, None);
        assert_eq!(filter.sort, SortMode::PriceDesc);
        assert!(filter.featured);

        let filter = CatalogParams::default().into_filter();
        assert_eq!(filter, CatalogFilter::default());
    }

    #[test]
    fn product_detail_includes_link_and_primary_image() {
        let mut product = seeded_catalog().blue_shirt;
        let second = image(&product, "p-2", "https://cdn.example.com/azul-2.jpg", 2);
        let first = image(&product, "p-1", "https://cdn.example.com/azul-1.jpg", 1);
        product.images = vec![second, first];
        let detail = ProductDetail::new(product, "+55 (88) 99237-6857");
        assert!(detail.purchase_link.starts_with("https://wa.me/5588992376857?text="));
        assert_eq!(detail.primary_image.as_deref(), Some("https://cdn.example.com/azul-1.jpg"));
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["slug"], "camisa-azul");
        assert_eq!(json["name"], "Camisa Azul");
        assert!(json["purchase_link"].as_str().unwrap().contains("Camisa%20Azul"));
    }

    #[test]
    fn hero_response_reports_rotation() {
        let seeded = seeded_catalog();
        let fallback = Slide::new("/assets/hero-banner.jpg");
        let carousel = Carousel::from_banners(&seeded.banners, fallback.clone());
        let hero = HeroResponse::new(&carousel, Duration::from_secs(5));
        assert_eq!(hero.slides.len(), 2);
        assert_eq!(hero.current, 0);
        assert_eq!(hero.interval_secs, 5);

        let carousel = Carousel::from_banners(&Vec::<Banner>::new(), fallback);
        let hero = HeroResponse::new(&carousel, Duration::from_secs(5));
        assert_eq!(hero.slides.len(), 1);
        assert_eq!(hero.interval_secs, 0);
    }
}
