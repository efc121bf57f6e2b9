/// Map a vendor-facing category slug to the catalog category wholesalers
/// file products under. Unknown slugs fall back to `Produce`.
pub fn catalog_category_for_slug(slug: &str) -> &'static str {
    match slug {
        "vegetables" => "Vegetables",
        "dry-ingredients" => "Spices & Condiments",
        "dairy" => "Dairy Products",
        "breads" => "Grains & Cereals",
        "prepared" => "Packaged Foods",
        "oils-sauces" => "Sauces & Pastes",
        "snacks" | "beverage" | "desserts" => "Snacks & Beverages",
        "packaging" | "seafood-meat" => "Other",
        _ => "Produce",
    }
}
