use axum::{
	Json, Router,
	body::Body,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, PathRejection, QueryRejection},
	},
	http::{HeaderMap, Request, StatusCode},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::state::AppState;
use vms_domain::{Angle, CadenceStatus};
use vms_service::{
	AddLeadRequest, CadenceWithSteps, DueRequest, DueStep, EnrollRequest, LeadView,
	ListCadencesRequest, SocialSearchRequest, SocialSearchResponse, StepActionRequest,
	StepActionResponse, UpdateStatusRequest, UpdateStatusResponse, Vendor,
};

pub const HEADER_USER_ID: &str = "X-VMS-User-Id";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

#[derive(Debug, Deserialize)]
struct ListCadencesQuery {
	#[serde(default)]
	status: Option<CadenceStatus>,
}

#[derive(Debug, Deserialize)]
struct DueQuery {
	#[serde(default, with = "vms_service::time_serde::date::option")]
	as_of: Option<Date>,
}

#[derive(Debug, Deserialize)]
struct EnrollBody {
	lead_id: Uuid,
	angle: Angle,
}

#[derive(Debug, Deserialize)]
struct StepBody {
	step_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct UpdateStatusBody {
	status: CadenceStatus,
	#[serde(default)]
	reason: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EnrichBatchBody {
	pub vendors: Vec<Vendor>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn error_code(&self) -> &str {
		&self.error_code
	}
}
impl From<vms_service::Error> for ApiError {
	fn from(err: vms_service::Error) -> Self {
		match err {
			vms_service::Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			vms_service::Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			vms_service::Error::NotEntitled { message } =>
				json_error(StatusCode::FORBIDDEN, "NOT_ENTITLED", message, None),
			vms_service::Error::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "CONFLICT", message, None),
			vms_service::Error::InvalidState { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_STATE", message, None),
			vms_service::Error::ProviderNotConfigured { provider } => json_error(
				StatusCode::NOT_FOUND,
				"PROVIDER_NOT_CONFIGURED",
				format!("Provider {provider} is not configured."),
				None,
			),
			vms_service::Error::Provider { message } => {
				tracing::warn!(error = %message, "Upstream provider failed.");

				json_error(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message, None)
			},
			vms_service::Error::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", "Internal error.", None)
			},
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
	}
}
impl From<QueryRejection> for ApiError {
	fn from(err: QueryRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
	}
}
impl From<PathRejection> for ApiError {
	fn from(err: PathRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	let v1 = Router::new()
		.route("/v1/leads", post(add_lead))
		.route("/v1/cadences", get(list_cadences).post(enroll))
		.route("/v1/cadences/due", get(list_due))
		.route("/v1/cadences/steps/mark_sent", post(mark_sent))
		.route("/v1/cadences/steps/skip", post(skip))
		.route("/v1/cadences/{cadence_id}", get(get_cadence).patch(update_status))
		.route("/v1/enrichment/batch", post(enrich_batch))
		.route("/v1/social/reddit/search", post(search_social))
		.layer(middleware::from_fn_with_state(state.clone(), api_auth_middleware));

	Router::new().route("/health", get(health)).merge(v1).with_state(state)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn api_auth_middleware(
	State(state): State<AppState>,
	req: Request<Body>,
	next: Next,
) -> Response {
	if !is_authorized(req.headers(), state.api_auth_token()) {
		return json_error(
			StatusCode::UNAUTHORIZED,
			"UNAUTHENTICATED",
			"Missing or invalid bearer token.",
			None,
		)
		.into_response();
	}

	next.run(req).await
}

async fn add_lead(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<AddLeadRequest>, JsonRejection>,
) -> Result<Json<LeadView>, ApiError> {
	let user_id = caller_id(&headers)?;
	let Json(mut req) = payload?;

	req.user_id = user_id;

	let response = state.service.add_lead(req).await?;

	Ok(Json(response))
}

async fn list_cadences(
	State(state): State<AppState>,
	headers: HeaderMap,
	query: Result<Query<ListCadencesQuery>, QueryRejection>,
) -> Result<Json<Vec<CadenceWithSteps>>, ApiError> {
	let user_id = caller_id(&headers)?;
	let Query(query) = query?;
	let response =
		state.service.list_cadences(ListCadencesRequest { user_id, status: query.status }).await?;

	Ok(Json(response))
}

async fn enroll(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<EnrollBody>, JsonRejection>,
) -> Result<(StatusCode, Json<CadenceWithSteps>), ApiError> {
	let user_id = caller_id(&headers)?;
	let Json(body) = payload?;
	let response = state
		.service
		.enroll(EnrollRequest { user_id, lead_id: body.lead_id, angle: body.angle })
		.await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn list_due(
	State(state): State<AppState>,
	headers: HeaderMap,
	query: Result<Query<DueQuery>, QueryRejection>,
) -> Result<Json<Vec<DueStep>>, ApiError> {
	let user_id = caller_id(&headers)?;
	let Query(query) = query?;
	let response = state.service.list_due(DueRequest { user_id, as_of: query.as_of }).await?;

	Ok(Json(response))
}

async fn get_cadence(
	State(state): State<AppState>,
	headers: HeaderMap,
	cadence_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<CadenceWithSteps>, ApiError> {
	let user_id = caller_id(&headers)?;
	let Path(cadence_id) = cadence_id?;
	let response = state.service.get_cadence(user_id, cadence_id).await?;

	Ok(Json(response))
}

async fn update_status(
	State(state): State<AppState>,
	headers: HeaderMap,
	cadence_id: Result<Path<Uuid>, PathRejection>,
	payload: Result<Json<UpdateStatusBody>, JsonRejection>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
	let user_id = caller_id(&headers)?;
	let Path(cadence_id) = cadence_id?;
	let Json(body) = payload?;
	let response = state
		.service
		.update_status(UpdateStatusRequest {
			user_id,
			cadence_id,
			status: body.status,
			reason: body.reason,
		})
		.await?;

	Ok(Json(response))
}

async fn mark_sent(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<StepBody>, JsonRejection>,
) -> Result<Json<StepActionResponse>, ApiError> {
	let user_id = caller_id(&headers)?;
	let Json(body) = payload?;
	let response =
		state.service.mark_sent(StepActionRequest { user_id, step_id: body.step_id }).await?;

	Ok(Json(response))
}

async fn skip(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<StepBody>, JsonRejection>,
) -> Result<Json<StepActionResponse>, ApiError> {
	let user_id = caller_id(&headers)?;
	let Json(body) = payload?;
	let response =
		state.service.skip(StepActionRequest { user_id, step_id: body.step_id }).await?;

	Ok(Json(response))
}

async fn enrich_batch(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<EnrichBatchBody>, JsonRejection>,
) -> Result<Json<EnrichBatchBody>, ApiError> {
	caller_id(&headers)?;

	let Json(body) = payload?;
	let vendors = state.service.enrich_batch(body.vendors).await;

	Ok(Json(EnrichBatchBody { vendors }))
}

async fn search_social(
	State(state): State<AppState>,
	headers: HeaderMap,
	payload: Result<Json<SocialSearchRequest>, JsonRejection>,
) -> Result<Json<SocialSearchResponse>, ApiError> {
	let user_id = caller_id(&headers)?;
	let Json(mut req) = payload?;

	req.user_id = user_id;

	let response = state.service.search_social(req).await?;

	Ok(Json(response))
}

fn caller_id(headers: &HeaderMap) -> Result<Uuid, ApiError> {
	let raw = headers
		.get(HEADER_USER_ID)
		.and_then(|value| value.to_str().ok())
		.map(str::trim)
		.filter(|value| !value.is_empty())
		.ok_or_else(|| {
			json_error(
				StatusCode::UNAUTHORIZED,
				"UNAUTHENTICATED",
				format!("{HEADER_USER_ID} header is required."),
				None,
			)
		})?;

	Uuid::parse_str(raw).map_err(|_| {
		json_error(
			StatusCode::UNAUTHORIZED,
			"UNAUTHENTICATED",
			format!("{HEADER_USER_ID} must be a UUID."),
			Some(vec![HEADER_USER_ID.to_string()]),
		)
	})
}

fn is_authorized(headers: &HeaderMap, expected: Option<&str>) -> bool {
	match expected {
		None => true,
		Some(expected) => read_bearer_token(headers).is_some_and(|token| token == expected),
	}
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(HEADER_AUTHORIZATION)?;
	let value = raw.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}
