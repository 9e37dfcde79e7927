use crate::Credentials;
use crate::model::{CredentialResponse, HolderCredentials, IssueReceipt, IssueRequest};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use skc_kernel::domain::constants::CREDENTIALS_TAG;
use skc_kernel::server::{ApiJson, ApiResult, ApiState, ErrorBody};
use skc_storage::ContentAddress;

use crate::error::CredentialError;

#[utoipa::path(
    post,
    path = "/credentials",
    request_body = IssueRequest,
    responses(
        (status = CREATED, description = "Credential encrypted and pinned", body = IssueReceipt),
        (status = BAD_REQUEST, description = "Missing holder or issuer", body = ErrorBody),
    ),
    tag = CREDENTIALS_TAG,
)]
pub(super) async fn issue_handler(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<IssueRequest>,
) -> ApiResult<impl IntoResponse> {
    let credentials = state.try_get_slice::<Credentials>()?;
    let receipt = credentials.issue(request).await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

#[utoipa::path(
    get,
    path = "/credentials/{address}",
    params(("address" = String, Path, description = "Content address of the pinned credential")),
    responses(
        (status = OK, description = "Pinned credential document", body = CredentialResponse),
        (status = BAD_REQUEST, description = "Malformed address", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown address", body = ErrorBody),
    ),
    tag = CREDENTIALS_TAG,
)]
pub(super) async fn fetch_handler(
    State(state): State<ApiState>,
    Path(address): Path<String>,
) -> ApiResult<Json<CredentialResponse>> {
    let credentials = state.try_get_slice::<Credentials>()?;
    let address = ContentAddress::parse(&address).map_err(CredentialError::from)?;
    let credential = credentials.fetch(&address).await?;

    Ok(Json(CredentialResponse { success: true, credential }))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/holders/{holder}/credentials",
    params(("holder" = String, Path, description = "Wallet address of the holder")),
    responses((status = OK, description = "Addresses issued to the holder", body = HolderCredentials)),
    tag = CREDENTIALS_TAG,
)]
pub(super) async fn list_handler(
    State(state): State<ApiState>,
    Path(holder): Path<String>,
) -> ApiResult<Json<HolderCredentials>> {
    let credentials = state.try_get_slice::<Credentials>()?;
    let addresses = credentials.list(&holder);

    Ok(Json(HolderCredentials { success: true, holder, addresses }))
}
