//! Catalogue entities: products and their categories.

pub mod dto;

use crate::resource::{Column, ColumnKind, DeleteGuard, Relation, Resource, Schema};

pub use dto::{CreateCategory, CreateProduct, UpdateCategory, UpdateProduct};

/// Marker for the `categories` table.
#[derive(Debug, Clone, Copy)]
pub struct Categories;

/// Marker for the `products` table.
#[derive(Debug, Clone, Copy)]
pub struct Products;

/// Descriptor of the `categories` table.
pub static CATEGORY_SCHEMA: Schema = Schema {
    table: "categories",
    columns: &[
        Column::new("id", ColumnKind::Uuid),
        Column::new("name", ColumnKind::Text),
        Column::new("description", ColumnKind::Text),
        Column::new("created_by", ColumnKind::Uuid),
        Column::new("created_at", ColumnKind::Timestamp),
        Column::new("updated_at", ColumnKind::Timestamp),
    ],
    relations: &[],
    owned: true,
    delete_guards: &[DeleteGuard {
        table: "products",
        column: "category_id",
        array: false,
    }],
};

/// Descriptor of the `products` table.
pub static PRODUCT_SCHEMA: Schema = Schema {
    table: "products",
    columns: &[
        Column::new("id", ColumnKind::Uuid),
        Column::new("name", ColumnKind::Text),
        Column::new("image_url", ColumnKind::Text),
        Column::new("description", ColumnKind::Text),
        Column::new("category_id", ColumnKind::Uuid),
        Column::new("price", ColumnKind::Float),
        Column::new("created_by", ColumnKind::Uuid),
        Column::new("created_at", ColumnKind::Timestamp),
        Column::new("updated_at", ColumnKind::Timestamp),
    ],
    relations: &[Relation {
        name: "category",
        local_column: "category_id",
        target: &CATEGORY_SCHEMA,
        many: false,
        auto: false,
    }],
    owned: true,
    delete_guards: &[],
};

impl Resource for Categories {
    const NAME: &'static str = "category";
    const SCHEMA: &'static Schema = &CATEGORY_SCHEMA;
    type Create = CreateCategory;
    type Update = UpdateCategory;
}

impl Resource for Products {
    const NAME: &'static str = "product";
    const SCHEMA: &'static Schema = &PRODUCT_SCHEMA;
    type Create = CreateProduct;
    type Update = UpdateProduct;
}
