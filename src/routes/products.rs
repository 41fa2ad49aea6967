use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AdminUser;
use crate::models::dto::{CreateProductRequest, UpdateProductRequest};
use crate::models::products::{self, Entity as Products, ImageList};

/// GET /api/products - Catalogue complet, trié par position (PUBLIC)
/// Pas de pagination ni de filtre côté serveur.
#[get("")]
pub async fn list_products(db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    let products = Products::find()
        .order_by_asc(products::Column::Position)
        .all(db.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(products))
}

/// GET /api/products/{id} - Détail d'un produit (PUBLIC)
#[get("/{id}")]
pub async fn get_product(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let product = Products::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await?
        .ok_or(ApiError::ProductNotFound)?;

    Ok(HttpResponse::Ok().json(product))
}

/// POST /api/products - Ajouter un produit (ADMIN)
#[post("")]
pub async fn create_product(
    _admin: AdminUser,
    body: web::Json<CreateProductRequest>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    if body.price <= Decimal::ZERO {
        return Err(ApiError::Validation("Price must be positive".to_string()));
    }
    if body.stock < 0 {
        return Err(ApiError::Validation("Stock cannot be negative".to_string()));
    }

    let product = products::ActiveModel {
        name: Set(body.name.clone()),
        price: Set(body.price),
        category: Set(body.category.clone()),
        stock: Set(body.stock),
        description: Set(body.description.clone()),
        brand: Set(body.brand.clone()),
        position: Set(body.position),
        images: Set(ImageList(body.images.clone())),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "product": product,
    })))
}

/// PATCH /api/products/{id} - Modifier un produit, champs optionnels (ADMIN)
#[patch("/{id}")]
pub async fn update_product(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<UpdateProductRequest>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let product = Products::find_by_id(path.into_inner())
        .one(db.get_ref())
        .await?
        .ok_or(ApiError::ProductNotFound)?;

    if let Some(price) = body.price {
        if price <= Decimal::ZERO {
            return Err(ApiError::Validation("Price must be positive".to_string()));
        }
    }
    if let Some(stock) = body.stock {
        if stock < 0 {
            return Err(ApiError::Validation("Stock cannot be negative".to_string()));
        }
    }

    let mut active = product.into_active_model();
    if let Some(name) = &body.name {
        active.name = Set(name.clone());
    }
    if let Some(price) = body.price {
        active.price = Set(price);
    }
    if let Some(category) = &body.category {
        active.category = Set(category.clone());
    }
    if let Some(stock) = body.stock {
        active.stock = Set(stock);
    }
    if let Some(description) = &body.description {
        active.description = Set(description.clone());
    }
    if let Some(brand) = &body.brand {
        active.brand = Set(brand.clone());
    }
    if let Some(position) = body.position {
        active.position = Set(position);
    }
    if let Some(images) = &body.images {
        active.images = Set(ImageList(images.clone()));
    }
    let product = active.update(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "product": product,
    })))
}

/// DELETE /api/products/{id} - Supprimer un produit (ADMIN)
/// Les commandes existantes gardent leur référence produit.
#[delete("/{id}")]
pub async fn delete_product(
    _admin: AdminUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let result = Products::delete_by_id(path.into_inner())
        .exec(db.get_ref())
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::ProductNotFound);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

pub fn product_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .service(list_products)
            .service(get_product)
            .service(create_product)
            .service(update_product)
            .service(delete_product),
    );
}
