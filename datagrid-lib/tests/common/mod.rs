//! Shared fixtures for the table integration tests.

#![allow(dead_code)]

use datagrid_lib::{CellValue, Filters, MemorySource, TableRow};

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub in_stock: bool,
}

impl TableRow for Product {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }

    fn field(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "category" => self.category.as_str().into(),
            "price" => self.price.into(),
            "inStock" => self.in_stock.into(),
            _ => CellValue::Empty,
        }
    }
}

pub fn product(id: u32, name: &str, category: &str, price: f64) -> Product {
    Product {
        id,
        name: name.to_string(),
        category: category.to_string(),
        price,
        in_stock: id % 3 != 0,
    }
}

/// Twelve products over three categories.
pub fn catalog() -> Vec<Product> {
    vec![
        product(1, "Laptop", "Electronics", 999.0),
        product(2, "Desk Chair", "Furniture", 189.5),
        product(3, "Novel", "Books", 14.99),
        product(4, "Headphones", "Electronics", 79.0),
        product(5, "Bookshelf", "Furniture", 120.0),
        product(6, "Cookbook", "Books", 24.5),
        product(7, "Monitor", "Electronics", 249.0),
        product(8, "Lamp", "Furniture", 39.99),
        product(9, "Atlas", "Books", 45.0),
        product(10, "Keyboard", "Electronics", 59.0),
        product(11, "Sofa", "Furniture", 799.0),
        product(12, "Poetry", "Books", 9.99),
    ]
}

/// Category and price range filtering, the way a product listing does it.
pub fn matches(product: &Product, filters: &Filters) -> bool {
    let category = filters.get_str("category").unwrap_or("All");
    if !category.is_empty() && category != "All" && product.category != category {
        return false;
    }
    if let Some(search) = filters.get_str("search")
        && !product.name.to_lowercase().contains(&search.to_lowercase())
    {
        return false;
    }
    let min = filters.get_f64("minPrice").unwrap_or(f64::MIN);
    let max = filters.get_f64("maxPrice").unwrap_or(f64::MAX);
    product.price >= min && product.price <= max
}

pub fn catalog_source() -> MemorySource<Product> {
    MemorySource::new(catalog()).with_filter(matches)
}

pub fn default_filters() -> Filters {
    Filters::new()
        .with("search", "")
        .with("category", "All")
        .with("minPrice", 0)
        .with("maxPrice", 1000)
}
