//! Mock data sets served through `MemorySource`.

use std::time::Duration;

use datagrid_lib::{CellValue, Filters, MemorySource, TableRow};
use serde::Serialize;

/// Simulated round trip of the mock services.
const LATENCY: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
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

fn product(id: u32, name: &str, category: &str, price: f64, in_stock: bool) -> Product {
    Product {
        id,
        name: name.to_string(),
        category: category.to_string(),
        price,
        in_stock,
    }
}

pub fn products() -> Vec<Product> {
    vec![
        product(1, "Wireless Mouse", "Electronics", 29.99, true),
        product(2, "Mechanical Keyboard", "Electronics", 89.0, true),
        product(3, "Standing Desk", "Furniture", 449.0, false),
        product(4, "Office Chair", "Furniture", 259.5, true),
        product(5, "The Rust Programming Language", "Books", 39.95, true),
        product(6, "Noise Cancelling Headphones", "Electronics", 199.0, true),
        product(7, "Bookshelf", "Furniture", 119.0, true),
        product(8, "Design Patterns", "Books", 54.0, false),
        product(9, "USB-C Hub", "Electronics", 34.5, true),
        product(10, "Desk Lamp", "Furniture", 42.0, true),
        product(11, "Clean Code", "Books", 37.0, true),
        product(12, "4K Monitor", "Electronics", 329.0, false),
        product(13, "Filing Cabinet", "Furniture", 139.0, true),
        product(14, "Refactoring", "Books", 47.5, true),
        product(15, "Webcam", "Electronics", 64.0, true),
        product(16, "Footrest", "Furniture", 24.0, true),
        product(17, "Programming Pearls", "Books", 31.0, false),
        product(18, "Laptop Stand", "Electronics", 45.0, true),
    ]
}

/// Search, category and price range, as a product listing filters.
pub fn product_matches(product: &Product, filters: &Filters) -> bool {
    if let Some(search) = filters.get_str("search")
        && !product.name.to_lowercase().contains(&search.to_lowercase())
    {
        return false;
    }
    if let Some(category) = filters.get_str("category")
        && !category.is_empty()
        && category != "All"
        && product.category != category
    {
        return false;
    }
    let min = filters.get_f64("minPrice").unwrap_or(f64::MIN);
    let max = filters.get_f64("maxPrice").unwrap_or(f64::MAX);
    product.price >= min && product.price <= max
}

pub fn product_source() -> MemorySource<Product> {
    MemorySource::new(products())
        .with_filter(product_matches)
        .with_latency(LATENCY)
}

pub fn product_filters() -> Filters {
    Filters::new()
        .with("search", "")
        .with("category", "All")
        .with("minPrice", 0)
        .with("maxPrice", 1000)
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
}

impl TableRow for User {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }

    fn field(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "role" => self.role.as_str().into(),
            "active" => self.active.into(),
            _ => CellValue::Empty,
        }
    }
}

fn user(id: u32, name: &str, role: &str, active: bool) -> User {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    User {
        id,
        name: name.to_string(),
        email,
        role: role.to_string(),
        active,
    }
}

pub fn users() -> Vec<User> {
    vec![
        user(1, "Ada Lovelace", "admin", true),
        user(2, "Alan Turing", "user", true),
        user(3, "Grace Hopper", "admin", true),
        user(4, "Edsger Dijkstra", "user", false),
        user(5, "Barbara Liskov", "manager", true),
        user(6, "Donald Knuth", "user", true),
        user(7, "Margaret Hamilton", "manager", false),
        user(8, "Ken Thompson", "user", true),
        user(9, "Frances Allen", "user", false),
        user(10, "John McCarthy", "manager", true),
        user(11, "Radia Perlman", "user", true),
    ]
}

/// Search over name and email, plus role and status.
pub fn user_matches(user: &User, filters: &Filters) -> bool {
    if let Some(search) = filters.get_str("search") {
        let search = search.to_lowercase();
        if !user.name.to_lowercase().contains(&search) && !user.email.contains(&search) {
            return false;
        }
    }
    if let Some(role) = filters.get_str("role")
        && !role.is_empty()
        && user.role != role
    {
        return false;
    }
    match filters.get_str("status") {
        Some("active") => user.active,
        Some("inactive") => !user.active,
        _ => true,
    }
}

pub fn user_source() -> MemorySource<User> {
    MemorySource::new(users())
        .with_filter(user_matches)
        .with_latency(LATENCY)
}

pub fn user_filters() -> Filters {
    Filters::new()
        .with("search", "")
        .with("role", "")
        .with("status", "")
}
