use crate::Verification;
use crate::error::{VerificationError, VerificationErrorExt};
use crate::model::{
    GenerateProofRequest, ProofRequest, ProofResponse, RevocationStatus, RevokeRequest,
    VerificationReport, VerifyRequest,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use skc_credentials::{CredentialError, Credentials};
use skc_kernel::domain::constants::VERIFICATION_TAG;
use skc_kernel::server::{ApiJson, ApiResult, ApiState, ErrorBody};
use skc_storage::ContentAddress;

#[utoipa::path(
    post,
    path = "/proofs",
    request_body = GenerateProofRequest,
    responses(
        (status = OK, description = "Proof over the decrypted credential", body = ProofResponse),
        (status = BAD_REQUEST, description = "Unknown claim or malformed address", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown credential", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Credential could not be decrypted", body = ErrorBody),
    ),
    tag = VERIFICATION_TAG,
)]
pub(super) async fn generate_handler(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<GenerateProofRequest>,
) -> ApiResult<Json<ProofResponse>> {
    let verification = state.try_get_slice::<Verification>()?;
    let credentials = state.try_get_slice::<Credentials>()?;

    let address = ContentAddress::parse(request.credential_id.trim())
        .map_err(CredentialError::from)
        .context("Resolving proof credential")?;
    let envelope = credentials.open(&address).await.context("Opening credential for proof")?;
    let claims = serde_json::to_value(&envelope).map_err(|e| VerificationError::Internal {
        message: e.to_string().into(),
        context: Some("Encoding claims".into()),
    })?;

    let proof = verification.verifier.generate(&ProofRequest {
        credential_id: address.to_string(),
        claims,
        reveal: request.reveal,
    })?;

    Ok(Json(ProofResponse { success: true, proof }))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    post,
    path = "/verify",
    request_body = VerifyRequest,
    responses(
        (status = OK, description = "Verification report", body = VerificationReport),
        (status = BAD_REQUEST, description = "Proof names no credential", body = ErrorBody),
    ),
    tag = VERIFICATION_TAG,
)]
pub(super) async fn verify_handler(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<VerifyRequest>,
) -> ApiResult<Json<VerificationReport>> {
    let verification = state.try_get_slice::<Verification>()?;
    let report = verification.verifier.verify(request)?;

    Ok(Json(report))
}

#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    path = "/revocations/{id}",
    params(("id" = String, Path, description = "Credential id")),
    responses((status = OK, description = "Revocation state", body = RevocationStatus)),
    tag = VERIFICATION_TAG,
)]
pub(super) async fn status_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RevocationStatus>> {
    let verification = state.try_get_slice::<Verification>()?;
    let revoked = verification.verifier.is_revoked(&id);

    Ok(Json(RevocationStatus { success: true, credential_id: id, revoked, newly_revoked: None }))
}

#[utoipa::path(
    post,
    path = "/revocations",
    request_body = RevokeRequest,
    params(("x-admin-token" = String, Header, description = "Operator token")),
    responses(
        (status = OK, description = "Credential revoked", body = RevocationStatus),
        (status = UNAUTHORIZED, description = "Missing or wrong admin token", body = ErrorBody),
        (status = SERVICE_UNAVAILABLE, description = "No admin token configured", body = ErrorBody),
    ),
    tag = VERIFICATION_TAG,
)]
pub(super) async fn revoke_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<RevokeRequest>,
) -> ApiResult<Json<RevocationStatus>> {
    state.admin.authorize(&headers)?;
    let verification = state.try_get_slice::<Verification>()?;

    let credential_id = request.credential_id.trim().to_owned();
    let newly = verification.verifier.revoke(&credential_id).await?;

    Ok(Json(RevocationStatus {
        success: true,
        credential_id,
        revoked: true,
        newly_revoked: Some(newly),
    }))
}
