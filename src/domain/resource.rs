use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Server-managed collections administered through the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Products,
    Categories,
    Branches,
    Users,
    StockOrders,
    Transactions,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Products,
        Resource::Categories,
        Resource::Branches,
        Resource::Users,
        Resource::StockOrders,
        Resource::Transactions,
    ];

    /// Path segment under which the collection endpoints live.
    pub const fn path(self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Categories => "categories",
            Resource::Branches => "branches",
            Resource::Users => "users",
            Resource::StockOrders => "stock",
            Resource::Transactions => "transactions",
        }
    }

    /// Singular label used in notifications.
    pub const fn label(self) -> &'static str {
        match self {
            Resource::Products => "Product",
            Resource::Categories => "Category",
            Resource::Branches => "Branch",
            Resource::Users => "User",
            Resource::StockOrders => "Stock order",
            Resource::Transactions => "Transaction",
        }
    }

    /// Fields the list screen searches by default.
    pub const fn search_fields(self) -> &'static [&'static str] {
        match self {
            Resource::Products => &["name", "sku", "description"],
            Resource::Categories => &["name", "type"],
            Resource::Branches => &["name", "location"],
            Resource::Users => &["name", "email", "role"],
            Resource::StockOrders => &["reference", "supplier", "status"],
            Resource::Transactions => &["reference", "pallet_type", "transaction_type"],
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "products" | "product" => Ok(Resource::Products),
            "categories" | "category" => Ok(Resource::Categories),
            "branches" | "branch" => Ok(Resource::Branches),
            "users" | "user" => Ok(Resource::Users),
            "stock" | "stock_orders" | "stock_order" => Ok(Resource::StockOrders),
            "transactions" | "transaction" => Ok(Resource::Transactions),
            _ => Err(TypeConstraintError::InvalidValue(s.to_string())),
        }
    }
}
