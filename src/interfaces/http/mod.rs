use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::error::InternalError;
use actix_web::{
    dev::Server, get, post, put, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::application::use_cases::bulk_upload_session::{SessionAction, SessionController};
use crate::application::use_cases::csv_normalizer::normalize;
use crate::application::use_cases::property_builder::build_property_records;
use crate::application::use_cases::property_gateway::PropertyGateway;
use crate::application::use_cases::table_editor::CellValue;
use crate::domain::error::{AppError, Result};
use crate::domain::object_type::ObjectType;
use crate::domain::property::{NormalizedTable, PropertyOption};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::CsvParser;

/// Largest accepted request body (CSV uploads and JSON).
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub struct HttpState {
    pub gateway: Arc<PropertyGateway>,
    pub session: Arc<SessionController>,
}

#[derive(Deserialize)]
struct ObjectTypeQuery {
    #[serde(rename = "objectType")]
    object_type: Option<String>,
}

#[derive(Deserialize)]
struct NormalizeQuery {
    #[serde(rename = "excludeDefaults", default = "default_exclude")]
    exclude_defaults: bool,
}

fn default_exclude() -> bool {
    true
}

#[derive(Deserialize)]
struct ExcludeDefaultsRequest {
    exclude: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectTypeRequest {
    object_type: ObjectType,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomObjectRequest {
    object_type_id: String,
}

#[derive(Deserialize)]
struct CellRequest {
    value: CellValue,
}

#[derive(Deserialize)]
struct ValueRequest {
    value: String,
}

#[derive(Deserialize)]
struct OptionsRequest {
    options: Vec<PropertyOption>,
}

fn error_response(err: &AppError) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(status = status.as_u16(), error = %err, "Request failed");
    } else {
        warn!(status = status.as_u16(), error = %err, "Request rejected");
    }
    HttpResponse::build(status).json(json!({ "error": err.message() }))
}

fn respond<T: Serialize>(result: Result<T>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(err) => error_response(&err),
    }
}

fn bad_request<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    InternalError::from_response(err, response).into()
}

// ---------- gateway ----------

#[get("/hubspot-schemas")]
async fn hubspot_schemas(data: web::Data<HttpState>) -> impl Responder {
    respond(data.gateway.fetch_schemas().await)
}

#[get("/hubspot-property-groups")]
async fn hubspot_property_groups(
    data: web::Data<HttpState>,
    query: web::Query<ObjectTypeQuery>,
) -> impl Responder {
    respond(
        data.gateway
            .fetch_property_groups(query.object_type.as_deref())
            .await,
    )
}

#[post("/hubspot-upload")]
async fn hubspot_upload(
    data: web::Data<HttpState>,
    query: web::Query<ObjectTypeQuery>,
    body: web::Bytes,
) -> impl Responder {
    respond(
        data.gateway
            .upload_request(query.object_type.as_deref(), &body)
            .await,
    )
}

// ---------- stateless helpers ----------

#[post("/csv/normalize")]
async fn normalize_csv(query: web::Query<NormalizeQuery>, body: web::Bytes) -> impl Responder {
    let result = CsvParser::new()
        .parse_bytes(&body)
        .map(|raw| normalize(&raw, query.exclude_defaults));
    respond(result)
}

#[post("/properties/build")]
async fn build_properties(table: web::Json<NormalizedTable>) -> impl Responder {
    HttpResponse::Ok().json(build_property_records(&table))
}

// ---------- edit session ----------

async fn dispatch(data: &HttpState, action: SessionAction) -> HttpResponse {
    respond(data.session.dispatch(action).await)
}

#[get("/session")]
async fn session_snapshot(data: web::Data<HttpState>) -> impl Responder {
    respond(data.session.snapshot())
}

#[post("/session/csv")]
async fn session_load_csv(data: web::Data<HttpState>, body: web::Bytes) -> impl Responder {
    info!(bytes = body.len(), "Loading CSV into session");
    dispatch(&data, SessionAction::LoadCsv(body.to_vec())).await
}

#[post("/session/reset")]
async fn session_reset(data: web::Data<HttpState>) -> impl Responder {
    dispatch(&data, SessionAction::Reset).await
}

#[put("/session/exclude-defaults")]
async fn session_exclude_defaults(
    data: web::Data<HttpState>,
    req: web::Json<ExcludeDefaultsRequest>,
) -> impl Responder {
    dispatch(&data, SessionAction::SetExcludeDefaults(req.exclude)).await
}

#[put("/session/object-type")]
async fn session_object_type(
    data: web::Data<HttpState>,
    req: web::Json<ObjectTypeRequest>,
) -> impl Responder {
    dispatch(&data, SessionAction::SelectObjectType(req.object_type)).await
}

#[put("/session/custom-object")]
async fn session_custom_object(
    data: web::Data<HttpState>,
    req: web::Json<CustomObjectRequest>,
) -> impl Responder {
    let req = req.into_inner();
    dispatch(&data, SessionAction::SelectCustomObject(req.object_type_id)).await
}

#[post("/session/rows/{row}/delete")]
async fn session_delete_row(data: web::Data<HttpState>, path: web::Path<usize>) -> impl Responder {
    dispatch(&data, SessionAction::DeleteRow(path.into_inner())).await
}

#[post("/session/rows/{row}/clone")]
async fn session_clone_row(data: web::Data<HttpState>, path: web::Path<usize>) -> impl Responder {
    dispatch(&data, SessionAction::CloneRow(path.into_inner())).await
}

#[put("/session/rows/{row}/cells/{col}")]
async fn session_set_cell(
    data: web::Data<HttpState>,
    path: web::Path<(usize, usize)>,
    req: web::Json<CellRequest>,
) -> impl Responder {
    let (row, col) = path.into_inner();
    let value = req.into_inner().value;
    dispatch(&data, SessionAction::SetCell { row, col, value }).await
}

#[put("/session/rows/{row}/type")]
async fn session_set_type(
    data: web::Data<HttpState>,
    path: web::Path<usize>,
    req: web::Json<ValueRequest>,
) -> impl Responder {
    let action = SessionAction::SetType {
        row: path.into_inner(),
        value: req.into_inner().value,
    };
    dispatch(&data, action).await
}

#[put("/session/rows/{row}/field-type")]
async fn session_set_field_type(
    data: web::Data<HttpState>,
    path: web::Path<usize>,
    req: web::Json<ValueRequest>,
) -> impl Responder {
    let action = SessionAction::SetFieldType {
        row: path.into_inner(),
        value: req.into_inner().value,
    };
    dispatch(&data, action).await
}

#[put("/session/rows/{row}/options")]
async fn session_set_options(
    data: web::Data<HttpState>,
    path: web::Path<usize>,
    req: web::Json<OptionsRequest>,
) -> impl Responder {
    let action = SessionAction::SetOptions {
        row: path.into_inner(),
        options: req.into_inner().options,
    };
    dispatch(&data, action).await
}

#[post("/session/generate")]
async fn session_generate(data: web::Data<HttpState>) -> impl Responder {
    dispatch(&data, SessionAction::GenerateImportObject).await
}

#[post("/session/upload")]
async fn session_upload(data: web::Data<HttpState>) -> impl Responder {
    dispatch(&data, SessionAction::Upload).await
}

#[post("/session/notifications/dismiss")]
async fn session_dismiss(data: web::Data<HttpState>) -> impl Responder {
    dispatch(&data, SessionAction::DismissNotifications).await
}

/// Routes and extractor settings, shared by the server and tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .app_data(
            web::JsonConfig::default()
                .limit(MAX_BODY_BYTES)
                .error_handler(|err, _req: &HttpRequest| bad_request(err)),
        )
        .app_data(web::QueryConfig::default().error_handler(|err, _req| bad_request(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _req| bad_request(err)))
        .service(
            web::scope("/api")
                .service(hubspot_schemas)
                .service(hubspot_property_groups)
                .service(hubspot_upload)
                .service(normalize_csv)
                .service(build_properties)
                .service(session_snapshot)
                .service(session_load_csv)
                .service(session_reset)
                .service(session_exclude_defaults)
                .service(session_object_type)
                .service(session_custom_object)
                .service(session_delete_row)
                .service(session_clone_row)
                .service(session_set_cell)
                .service(session_set_type)
                .service(session_set_field_type)
                .service(session_set_options)
                .service(session_generate)
                .service(session_upload)
                .service(session_dismiss),
        );
}

pub fn start_server(config: &AppConfig, state: HttpState) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    info!(host = %config.host, port = config.port, "HTTP server listening");
    Ok(server)
}
