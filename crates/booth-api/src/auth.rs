use argon2::{Argon2, PasswordHasher, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::State, response::IntoResponse};
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use booth_types::api::{BoothAuthRequest, IdResponse};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::{AppState, db_call};

const BOOTH_PASSWORD_LEN: usize = 10;
const BOOTH_PASSWORD_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Hash a user password with Argon2id and a random salt (PHC string).
pub fn hash_user_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

/// Fresh exhibitor password for a new booth.
pub fn generate_booth_password() -> String {
    let mut rng = rand::rng();
    (0..BOOTH_PASSWORD_LEN)
        .map(|_| BOOTH_PASSWORD_ALPHABET[rng.random_range(0..BOOTH_PASSWORD_ALPHABET.len())] as char)
        .collect()
}

/// Booth passwords are looked up by value, so they are stored as an unsalted digest.
pub fn booth_password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// POST /booth/auth: exchange an exhibitor password for its booth id.
pub async fn auth_booth(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BoothAuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.password.is_empty() {
        return Err(ApiError::InvalidPassword);
    }

    let digest = booth_password_digest(&req.password);
    let booth_id = db_call(&state, move |db| db.find_booth_by_password_digest(&digest))
        .await?
        .ok_or_else(|| {
            warn!("Booth auth failed");
            ApiError::InvalidPassword
        })?;

    info!(booth_id, "Booth authenticated");
    Ok(Json(IdResponse { id: booth_id }))
}
