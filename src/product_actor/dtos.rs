// DTOs for Product
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<u64>,
}
