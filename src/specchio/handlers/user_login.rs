use crate::idp::IdpClient;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct UserLogin {
    username: String,
    #[schema(value_type = String)]
    password: SecretString,
}

#[utoipa::path(
    post,
    path= "/login",
    request_body = UserLogin,
    responses (
        (status = 200, description = "User logged in successfully, token payload relayed"),
        (status = 401, description = "Authentication failed"),
    ),
    tag= "login"
)]
#[instrument]
pub async fn login(
    idp: Extension<IdpClient>,
    payload: Option<Json<UserLogin>>,
) -> impl IntoResponse {
    let user: UserLogin = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Missing payload"})),
            )
        }
    };

    debug!("user: {:?}", user);

    // The provider decides: unconfirmed accounts are not special-cased here
    match idp.initiate_auth(&user.username, &user.password).await {
        Ok(response) => (
            StatusCode::OK,
            Json(json!({"message": "User logged in successfully", "data": response})),
        ),
        Err(e) => {
            error!("Login failed: {:?}", e);

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Login failed", "error": e.to_string()})),
            )
        }
    }
}
