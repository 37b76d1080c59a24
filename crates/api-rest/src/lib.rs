//! REST API surface for the FPR patient registry.
//!
//! ## Purpose
//! Maps HTTP verbs and paths onto `fpr_core::PatientService` operations and
//! shapes the JSON responses, including the OpenAPI/Swagger documentation.
//!
//! The router is exposed separately from the binary so integration tests can
//! drive it in-process without binding a socket.

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use fpr_core::{
    CoreConfig, Gender, PatientRecord, PatientService, PatientUpdate, PatientView, RegistryError,
    SortKey, SortOrder, SortedPatient, Verdict,
};

/// Application state for the REST API server
///
/// Contains shared state that needs to be accessible to all request handlers.
/// Services are constructed per request from the shared configuration; no
/// record data is cached across requests.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    fn service(&self) -> PatientService {
        PatientService::new(self.cfg.clone())
    }
}

/// Static message payload used by the root and about endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

/// Error payload returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Request body for creating a patient, the stored record plus its id.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    pub id: String,
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
}

impl CreatePatientReq {
    fn into_parts(self) -> (String, PatientRecord) {
        (
            self.id,
            PatientRecord {
                name: self.name,
                city: self.city,
                age: self.age,
                gender: self.gender,
                height: self.height,
                weight: self.weight,
            },
        )
    }
}

/// Query parameters for the sort endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// Attribute to sort on: age, bmi, weight, or height.
    pub sort_by: SortKey,
    /// Sort direction, asc (default) or desc.
    #[serde(default)]
    pub order: SortOrder,
}

/// Registry error carried out of a handler.
///
/// The conversion to an HTTP response owns the status-code mapping: validation
/// and conflicts are the caller's fault (400), unknown ids are 404, and
/// storage failures are logged and surfaced as an opaque 500.
pub struct ApiError(RegistryError);

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            RegistryError::InvalidInput(_) | RegistryError::Conflict(_) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            RegistryError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            other => {
                tracing::error!("registry storage failure: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal storage error".to_string(),
                )
            }
        };

        (status, Json(ErrorRes { error })).into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        about,
        list_patients,
        get_patient,
        sort_patients,
        create_patient,
        update_patient,
        delete_patient,
    ),
    components(schemas(
        MessageRes,
        ErrorRes,
        CreatePatientReq,
        PatientRecord,
        PatientUpdate,
        PatientView,
        SortedPatient,
        Gender,
        Verdict,
        SortKey,
        SortOrder,
    ))
)]
pub struct ApiDoc;

/// Builds the application router with all registry routes, the Swagger UI, and
/// a permissive CORS layer.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/about", get(about))
        .route("/patients", get(list_patients))
        .route("/patients/:patient_id", get(get_patient))
        .route("/sort", get(sort_patients))
        .route("/create", post(create_patient))
        .route("/update/:patient_id", put(update_patient))
        .route("/delete/:patient_id", delete(delete_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service greeting", body = MessageRes)
    )
)]
#[axum::debug_handler]
async fn root() -> Json<MessageRes> {
    Json(MessageRes {
        message: "Patient Management System API".into(),
    })
}

#[utoipa::path(
    get,
    path = "/about",
    responses(
        (status = 200, description = "Service description", body = MessageRes)
    )
)]
#[axum::debug_handler]
async fn about() -> Json<MessageRes> {
    Json(MessageRes {
        message: "A fully functional API to create, read, update, delete and sort patient records"
            .into(),
    })
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "Full collection keyed by patient id", body = BTreeMap<String, PatientView>),
        (status = 500, description = "Storage failure", body = ErrorRes)
    )
)]
/// List all patients in the registry
///
/// Re-reads the registry file and returns every record with its derived
/// BMI and verdict attached.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, PatientView>>, ApiError> {
    let patients = state.service().list()?;
    Ok(Json(patients))
}

#[utoipa::path(
    get,
    path = "/patients/{patient_id}",
    params(
        ("patient_id" = String, Path, description = "Client-assigned patient id")
    ),
    responses(
        (status = 200, description = "Single patient record", body = PatientView),
        (status = 404, description = "Unknown patient id", body = ErrorRes),
        (status = 500, description = "Storage failure", body = ErrorRes)
    )
)]
/// Fetch a single patient by id
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(patient_id): AxumPath<String>,
) -> Result<Json<PatientView>, ApiError> {
    let patient = state.service().get(&patient_id)?;
    Ok(Json(patient))
}

#[utoipa::path(
    get,
    path = "/sort",
    params(SortParams),
    responses(
        (status = 200, description = "Collection ordered by the chosen attribute", body = [SortedPatient]),
        (status = 400, description = "Unknown sort attribute or order", body = ErrorRes),
        (status = 500, description = "Storage failure", body = ErrorRes)
    )
)]
/// Sort the collection by age, bmi, weight, or height
///
/// Values outside the enumerated sets are rejected by query deserialization
/// before the registry file is touched.
#[axum::debug_handler]
async fn sort_patients(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<SortedPatient>>, ApiError> {
    let sorted = state.service().sorted(params.sort_by, params.order)?;
    Ok(Json(sorted))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient created", body = PatientView),
        (status = 400, description = "Duplicate id or validation failure", body = ErrorRes),
        (status = 500, description = "Storage failure", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// The id is assigned by the client and must not already exist. On any
/// failure the registry file is left untouched.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<CreatePatientReq>,
) -> Result<(StatusCode, Json<PatientView>), ApiError> {
    let (id, record) = req.into_parts();
    let created = state.service().create(id, record)?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/update/{patient_id}",
    params(
        ("patient_id" = String, Path, description = "Client-assigned patient id")
    ),
    request_body = PatientUpdate,
    responses(
        (status = 200, description = "Patient updated", body = PatientView),
        (status = 400, description = "Merged record is invalid", body = ErrorRes),
        (status = 404, description = "Unknown patient id", body = ErrorRes),
        (status = 500, description = "Storage failure", body = ErrorRes)
    )
)]
/// Apply a partial update to an existing patient
///
/// Fields absent from the body keep their stored values; BMI and verdict are
/// recomputed from the merged height and weight.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    AxumPath(patient_id): AxumPath<String>,
    Json(update): Json<PatientUpdate>,
) -> Result<Json<PatientView>, ApiError> {
    let updated = state.service().update(&patient_id, update)?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/delete/{patient_id}",
    params(
        ("patient_id" = String, Path, description = "Client-assigned patient id")
    ),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Unknown patient id", body = ErrorRes),
        (status = 500, description = "Storage failure", body = ErrorRes)
    )
)]
/// Remove a patient record
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(patient_id): AxumPath<String>,
) -> Result<Json<MessageRes>, ApiError> {
    state.service().delete(&patient_id)?;
    Ok(Json(MessageRes {
        message: format!("patient {patient_id} deleted"),
    }))
}
