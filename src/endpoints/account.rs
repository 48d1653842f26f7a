use axum::{Json, debug_handler, extract::State, http::StatusCode};
use tracing::instrument;

use super::ApiResponse;
use crate::models::{Account, AccountPayload};
use crate::service::RegistrationError;
use crate::state::SharedState;

#[instrument(skip_all, fields(username = ?candidate.username))]
#[debug_handler]
pub async fn register(
    State(state): State<SharedState>,
    Json(candidate): Json<AccountPayload>,
) -> ApiResponse<Account> {
    match state.accounts.register(&candidate).await {
        Ok(account) => ApiResponse::Body(account),
        Err(RegistrationError::NameTaken) => ApiResponse::Error(StatusCode::CONFLICT),
        Err(RegistrationError::Database(_)) => {
            ApiResponse::Error(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(RegistrationError::BlankUsername | RegistrationError::Invalid(_)) => {
            // An existing username wins over any other validation failure.
            match state.accounts.login(&candidate).await {
                Ok(Some(_)) => ApiResponse::Error(StatusCode::CONFLICT),
                Ok(None) => ApiResponse::Error(StatusCode::BAD_REQUEST),
                Err(error) => {
                    tracing::error!(?error, "Database error during registration");
                    ApiResponse::Error(StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
    }
}

#[instrument(skip_all, fields(username = ?credentials.username))]
#[debug_handler]
pub async fn login(
    State(state): State<SharedState>,
    Json(credentials): Json<AccountPayload>,
) -> ApiResponse<Account> {
    match state.accounts.login(&credentials).await {
        Ok(Some(account)) if credentials.password.as_deref() == Some(account.password.as_str()) => {
            tracing::debug!(account.id, "Login successful");
            ApiResponse::Body(account)
        }
        Ok(_) => {
            tracing::debug!("Rejecting login attempt: invalid credentials");
            ApiResponse::Error(StatusCode::UNAUTHORIZED)
        }
        Err(error) => {
            tracing::error!(?error, "Database error during login");
            ApiResponse::Error(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
