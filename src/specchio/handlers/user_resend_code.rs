use crate::idp::IdpClient;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct UserResendCode {
    username: String,
}

#[utoipa::path(
    post,
    path= "/resend-confirmation-code",
    request_body = UserResendCode,
    responses (
        (status = 200, description = "Confirmation code resent successfully"),
        (status = 400, description = "Provider failure"),
    ),
    tag= "confirm"
)]
#[instrument]
pub async fn resend_code(
    idp: Extension<IdpClient>,
    payload: Option<Json<UserResendCode>>,
) -> impl IntoResponse {
    let user: UserResendCode = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Missing payload"})),
            )
        }
    };

    debug!("user: {:?}", user);

    match idp.resend_confirmation_code(&user.username).await {
        Ok(response) => (
            StatusCode::OK,
            Json(json!({"message": "Confirmation code resent successfully", "data": response})),
        ),
        Err(e) => {
            error!("Failed to resend confirmation code: {:?}", e);

            (
                StatusCode::BAD_REQUEST,
                Json(
                    json!({"message": "Failed to resend confirmation code", "error": e.to_string()}),
                ),
            )
        }
    }
}
