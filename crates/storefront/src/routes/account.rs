//! Account route handlers.
//!
//! These routes require a signed-in shopper (see [`RequireShopper`]).

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::instrument;

use lustre_core::{Address, AddressId, AddressInput, UserProfile};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireShopper;
use crate::profile::ProfileDetails;
use crate::state::AppState;

/// Multipart field carrying the avatar image.
const AVATAR_FIELD: &str = "file";

/// Display the shopper's profile.
#[instrument(skip_all, fields(user = %user))]
pub async fn index(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
) -> Result<Json<UserProfile>> {
    Ok(Json(state.profiles().profile(&user).await?))
}

/// Update name and phone.
#[instrument(skip_all, fields(user = %user))]
pub async fn update(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Json(details): Json<ProfileDetails>,
) -> Result<Json<UserProfile>> {
    let profile = state.profiles().update_details(&user, &details).await?;
    add_breadcrumb("account", "Profile updated", None);
    Ok(Json(profile))
}

/// Upload a new avatar image.
#[instrument(skip_all, fields(user = %user))]
pub async fn upload_avatar(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    mut multipart: Multipart,
) -> Result<Json<UserProfile>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("avatar").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let profile = state
            .profiles()
            .update_avatar(&user, &file_name, &content_type, bytes.to_vec())
            .await?;
        add_breadcrumb("account", "Avatar updated", None);
        return Ok(Json(profile));
    }

    Err(AppError::BadRequest(format!(
        "Missing \"{AVATAR_FIELD}\" field"
    )))
}

/// List saved addresses.
#[instrument(skip_all, fields(user = %user))]
pub async fn addresses(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
) -> Result<Json<Vec<Address>>> {
    Ok(Json(state.profiles().addresses(&user).await?))
}

/// Save a new address.
#[instrument(skip_all, fields(user = %user))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Json(input): Json<AddressInput>,
) -> Result<(StatusCode, Json<Address>)> {
    let address = state.profiles().add_address(&user, &input).await?;
    add_breadcrumb(
        "account",
        "Address added",
        Some(&[("address_id", address.id.as_str())]),
    );
    Ok((StatusCode::CREATED, Json(address)))
}

/// Replace an address.
#[instrument(skip_all, fields(user = %user, address = %id))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Path(id): Path<String>,
    Json(input): Json<AddressInput>,
) -> Result<Json<Address>> {
    let id = parse_id(&id)?;
    let address = state.profiles().update_address(&user, &id, &input).await?;
    Ok(Json(address))
}

/// Delete an address.
#[instrument(skip_all, fields(user = %user, address = %id))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    state.profiles().delete_address(&user, &id).await?;
    add_breadcrumb("account", "Address deleted", Some(&[("address_id", id.as_str())]));
    Ok(StatusCode::NO_CONTENT)
}

/// Make an address the default.
#[instrument(skip_all, fields(user = %user, address = %id))]
pub async fn set_default_address(
    State(state): State<AppState>,
    RequireShopper(user): RequireShopper,
    Path(id): Path<String>,
) -> Result<Json<Vec<Address>>> {
    let id = parse_id(&id)?;
    Ok(Json(state.profiles().set_default_address(&user, &id).await?))
}

fn parse_id(raw: &str) -> Result<AddressId> {
    AddressId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}
