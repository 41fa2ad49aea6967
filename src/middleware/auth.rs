use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::{Ready, ready};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::utils::jwt;

/// Structure qui contient les infos de l'utilisateur authentifié.
/// Utilisée comme extracteur dans les routes protégées.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}

/// Extracteur réservé aux administrateurs: mêmes vérifications que
/// AuthUser, puis contrôle du rôle (403 sinon).
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

fn extract_user(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    // Le secret JWT vient de la configuration partagée, injectée au démarrage
    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| ApiError::Internal("AppConfig missing from app data".to_string()))?;

    // 1. Extraire le header Authorization
    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or(ApiError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| ApiError::MissingToken)?;

    // 2. Extraire le token (format: "Bearer <token>")
    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(ApiError::MissingToken)?;

    // 3. Vérifier le token JWT
    let claims = jwt::verify_token(&config.jwt_secret, token)?;

    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req).and_then(|user| {
            if user.role == "admin" {
                Ok(Self(user))
            } else {
                Err(ApiError::AdminOnly)
            }
        }))
    }
}
