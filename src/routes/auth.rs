use actix_web::{HttpResponse, get, post, put, web};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use validator::Validate;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::dto::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserResponse, VerifyRequest,
};
use crate::models::users::{self, Column as UserColumn, Entity as Users};
use crate::services::mailer::{EmailQueue, OutboundEmail};
use crate::utils::{codes, jwt, password};

fn send_verification_email(emails: &EmailQueue, to: &str, code: &str) {
    emails.enqueue(OutboundEmail {
        to: to.to_string(),
        subject: "Your Verification Code".to_string(),
        body: format!("Your verification code is: {}", code),
    });
}

/// POST /api/auth/register - Créer un compte (PUBLIC)
/// Un email déjà inscrit mais non vérifié reçoit un nouveau code au lieu
/// d'une erreur; un email vérifié renvoie un conflit.
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
    emails: web::Data<EmailQueue>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    if body.password != body.confirm_password {
        return Err(ApiError::PasswordMismatch);
    }
    if !password::is_strong_password(&body.password) {
        return Err(ApiError::WeakPassword);
    }

    let existing = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await?;

    if let Some(user) = existing {
        if user.verified {
            return Err(ApiError::EmailTaken);
        }

        // compte non vérifié: on régénère le code et on renvoie l'email
        let code = codes::generate_verification_code();
        let password_hash = password::hash_password(&body.password)?;

        let mut active = user.into_active_model();
        active.verification_code = Set(Some(code.clone()));
        active.password_hash = Set(password_hash);
        let user = active.update(db.get_ref()).await?;

        send_verification_email(&emails, &user.email, &code);

        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "user": UserResponse::from(user),
            "message": "This email is already registered but not verified. A new verification code has been sent."
        })));
    }

    let code = codes::generate_verification_code();
    let password_hash = password::hash_password(&body.password)?;

    let user = users::ActiveModel {
        name: Set(body.name.clone()),
        email: Set(body.email.clone()),
        password_hash: Set(password_hash),
        role: Set(users::ROLE_CUSTOMER.to_string()),
        verified: Set(false),
        verification_code: Set(Some(code.clone())),
        phone: Set(Some(body.phone.clone())),
        address: Set(body.address.clone()),
        state: Set(body.state.clone()),
        region: Set(body.region.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db.get_ref())
    .await?;

    send_verification_email(&emails, &user.email, &code);

    Ok(HttpResponse::Created().json(serde_json::json!({
        "user": UserResponse::from(user),
        "message": "Registered. Check your email for the verification code."
    })))
}

/// POST /api/auth/login - Se connecter (PUBLIC)
/// Un compte non vérifié est refusé avant même le contrôle du mot de passe.
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let user = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !user.verified {
        return Err(ApiError::Unverified);
    }

    if !password::verify_password(&body.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = jwt::generate_token(&config.jwt_secret, user.id, &user.email, &user.role)
        .map_err(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// POST /api/auth/verify - Confirmer le code reçu par email (PUBLIC)
/// Ne réussit qu'une seule fois: un compte déjà vérifié est rejeté.
#[post("/verify")]
pub async fn verify(
    body: web::Json<VerifyRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    emails: web::Data<EmailQueue>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let user = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .one(db.get_ref())
        .await?
        .ok_or(ApiError::InvalidVerification)?;

    if user.verified || user.verification_code.as_deref() != Some(body.code.as_str()) {
        return Err(ApiError::InvalidVerification);
    }

    let mut active = user.into_active_model();
    active.verified = Set(true);
    active.verification_code = Set(None);
    let user = active.update(db.get_ref()).await?;

    // email de bienvenue best-effort
    emails.enqueue(OutboundEmail {
        to: user.email.clone(),
        subject: "Email verified".to_string(),
        body: "You have successfully verified your email. Thank you for joining us!".to_string(),
    });

    let token = jwt::generate_token(&config.jwt_secret, user.id, &user.email, &user.role)
        .map_err(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Email verified successfully",
        "token": token,
        "user": UserResponse::from(user),
    })))
}

/// GET /api/auth/me - Profil de l'utilisateur courant (PROTÉGÉE)
#[get("/me")]
pub async fn me(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    let user = Users::find_by_id(auth_user.user_id)
        .one(db.get_ref())
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PUT /api/auth/profile - Mise à jour partielle du profil (PROTÉGÉE)
#[put("/profile")]
pub async fn update_profile(
    auth_user: AuthUser,
    body: web::Json<UpdateProfileRequest>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let user = Users::find_by_id(auth_user.user_id)
        .one(db.get_ref())
        .await?
        .ok_or(ApiError::UserNotFound)?;

    let mut active = user.into_active_model();
    if let Some(name) = &body.name {
        active.name = Set(name.clone());
    }
    if let Some(phone) = &body.phone {
        active.phone = Set(Some(phone.clone()));
    }
    if let Some(address) = &body.address {
        active.address = Set(Some(address.clone()));
    }
    if let Some(state) = &body.state {
        active.state = Set(Some(state.clone()));
    }
    if let Some(region) = &body.region {
        active.region = Set(Some(region.clone()));
    }
    let user = active.update(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Profile updated successfully",
        "user": UserResponse::from(user),
    })))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(register)
            .service(login)
            .service(verify)
            .service(me)
            .service(update_profile),
    );
}
