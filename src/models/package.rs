use crate::entities::package_entity as packages;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PackageResponse {
    pub id: i64,
    pub name: String,
    pub duration_days: i32,
    pub price: f64,
    pub description: String,
}

impl From<packages::Model> for PackageResponse {
    fn from(p: packages::Model) -> Self {
        Self {
            id: p.id,
            name: p.name,
            duration_days: p.duration_days,
            price: p.price,
            description: p.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PackageRequest {
    #[schema(example = "Gold Plan")]
    pub name: String,
    #[schema(example = 30)]
    pub duration_days: i32,
    #[schema(example = 50.0)]
    pub price: f64,
    #[schema(example = "Premium access")]
    #[serde(default)]
    pub description: String,
}
