// ============================================================
// BULK UPLOAD SESSION
// ============================================================
// Single in-memory edit session. `reduce` applies an action to a state
// and may emit one command; the controller runs that command against the
// gateway and folds the outcome back in with `complete`.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::csv_normalizer::{normalize, renormalize};
use super::property_builder::build_property_records;
use super::property_gateway::PropertyGateway;
use super::table_editor::{self, CellValue};
use crate::domain::crm::{
    custom_objects_from_schemas, group_names_from_listing, CustomObject, UploadSummary,
};
use crate::domain::error::{AppError, Result};
use crate::domain::object_type::ObjectType;
use crate::domain::property::{
    columns, FieldType, NormalizedTable, PropertyOption, PropertyRecord, PropertyType,
};
use crate::infrastructure::csv::CsvParser;

pub const UPLOAD_PRECONDITION_MESSAGE: &str =
    "Please generate the Hubspot Import Object first and ensure an object type is selected.";
pub const UPLOAD_IN_PROGRESS_MESSAGE: &str = "An upload is already in progress";
pub const NO_CUSTOM_OBJECTS_MESSAGE: &str = "No custom objects found";
pub const NO_GROUPS_MESSAGE: &str = "No groups found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    fn success(title: &str, description: String) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.to_string(),
            description,
            at: Utc::now(),
        }
    }

    fn error(title: &str, description: String) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.to_string(),
            description,
            at: Utc::now(),
        }
    }
}

/// Everything the edit screen renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadState {
    pub object_type: Option<ObjectType>,
    pub selected_custom_object: Option<String>,
    pub exclude_default_properties: bool,
    pub table: Option<NormalizedTable>,
    pub import_object: Option<Vec<PropertyRecord>>,
    pub is_uploading: bool,
    pub is_loading_lookups: bool,
    pub custom_objects: Vec<CustomObject>,
    pub available_groups: Vec<String>,
    pub lookup_error: Option<String>,
    pub last_upload: Option<UploadSummary>,
    pub notifications: Vec<Notification>,
}

impl BulkUploadState {
    pub fn new() -> Self {
        Self {
            exclude_default_properties: true,
            ..Self::default()
        }
    }

    /// Object type id an upload goes to: the custom object id when `custom`
    /// is selected.
    pub fn upload_target(&self) -> Option<String> {
        match self.object_type? {
            ObjectType::Custom => self.selected_custom_object.clone(),
            standard => Some(standard.as_str().to_string()),
        }
    }

    /// Field types selectable on each row, in row order.
    pub fn field_type_choices(&self) -> Vec<Vec<FieldType>> {
        let Some(table) = &self.table else {
            return Vec::new();
        };
        (0..table.len())
            .map(|row| {
                let cell = table.cell_by_name(row, columns::TYPE).unwrap_or("").trim();
                let property_type = if cell.is_empty() {
                    PropertyType::String
                } else {
                    PropertyType::parse(cell)
                };
                property_type.field_type_choices()
            })
            .collect()
    }

    fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

/// State plus derived per-row data, as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub state: BulkUploadState,
    pub field_type_choices: Vec<Vec<FieldType>>,
}

impl From<BulkUploadState> for SessionSnapshot {
    fn from(state: BulkUploadState) -> Self {
        let field_type_choices = state.field_type_choices();
        Self {
            state,
            field_type_choices,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionAction {
    LoadCsv(Vec<u8>),
    Reset,
    SetExcludeDefaults(bool),
    SelectObjectType(ObjectType),
    SelectCustomObject(String),
    DeleteRow(usize),
    CloneRow(usize),
    SetCell { row: usize, col: usize, value: CellValue },
    SetType { row: usize, value: String },
    SetFieldType { row: usize, value: String },
    SetOptions { row: usize, options: Vec<PropertyOption> },
    GenerateImportObject,
    Upload,
    DismissNotifications,
}

/// Network work requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    FetchCustomObjects,
    FetchPropertyGroups { object_type: String },
    UploadProperties { object_type: String, records: Vec<PropertyRecord> },
}

impl SessionCommand {
    fn name(&self) -> &'static str {
        match self {
            SessionCommand::FetchCustomObjects => "fetch_custom_objects",
            SessionCommand::FetchPropertyGroups { .. } => "fetch_property_groups",
            SessionCommand::UploadProperties { .. } => "upload_properties",
        }
    }
}

#[derive(Debug, Clone)]
pub enum CommandOutcome {
    CustomObjects(Result<Value>),
    PropertyGroups { object_type: String, result: Result<Value> },
    Upload(Result<UploadSummary>),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: BulkUploadState,
    pub command: Option<SessionCommand>,
}

impl Transition {
    fn to(state: BulkUploadState) -> Self {
        Self { state, command: None }
    }

    fn with(state: BulkUploadState, command: SessionCommand) -> Self {
        Self {
            state,
            command: Some(command),
        }
    }
}

fn edit_table<F>(mut state: BulkUploadState, edit: F) -> Result<Transition>
where
    F: FnOnce(&NormalizedTable) -> Result<NormalizedTable>,
{
    if let Some(table) = &state.table {
        state.table = Some(edit(table)?);
    }
    Ok(Transition::to(state))
}

/// Apply `action` to `state`. An `Err` means the action was rejected and the
/// previous state stands.
pub fn reduce(state: BulkUploadState, action: SessionAction) -> Result<Transition> {
    let mut state = state;
    match action {
        SessionAction::LoadCsv(bytes) => {
            let raw = CsvParser::new().parse_bytes(&bytes)?;
            state.table = normalize(&raw, state.exclude_default_properties);
            state.import_object = None;
            Ok(Transition::to(state))
        }
        SessionAction::Reset => {
            state.object_type = None;
            state.selected_custom_object = None;
            state.table = None;
            state.import_object = None;
            state.is_loading_lookups = false;
            state.custom_objects.clear();
            state.available_groups.clear();
            state.lookup_error = None;
            Ok(Transition::to(state))
        }
        SessionAction::SetExcludeDefaults(exclude) => {
            state.exclude_default_properties = exclude;
            if let Some(table) = &state.table {
                state.table = renormalize(table, exclude);
            }
            Ok(Transition::to(state))
        }
        SessionAction::SelectObjectType(object_type) => {
            if state.object_type.is_some() {
                return Err(AppError::ValidationError(
                    "An object type is already selected; reset the session to change it"
                        .to_string(),
                ));
            }
            state.object_type = Some(object_type);
            state.selected_custom_object = None;
            state.custom_objects.clear();
            state.available_groups.clear();
            state.lookup_error = None;
            state.is_loading_lookups = true;
            let command = match object_type {
                ObjectType::Custom => SessionCommand::FetchCustomObjects,
                standard => SessionCommand::FetchPropertyGroups {
                    object_type: standard.as_str().to_string(),
                },
            };
            Ok(Transition::with(state, command))
        }
        SessionAction::SelectCustomObject(object_type_id) => {
            if state.object_type != Some(ObjectType::Custom) {
                return Err(AppError::ValidationError(
                    "Select the custom object type first".to_string(),
                ));
            }
            let groups = state
                .custom_objects
                .iter()
                .find(|object| object.object_type_id == object_type_id)
                .map(|object| object.group_names.clone())
                .ok_or_else(|| {
                    AppError::ValidationError(format!("Unknown custom object: {}", object_type_id))
                })?;
            state.available_groups = groups;
            state.selected_custom_object = Some(object_type_id);
            Ok(Transition::to(state))
        }
        SessionAction::DeleteRow(row) => edit_table(state, |t| table_editor::delete_row(t, row)),
        SessionAction::CloneRow(row) => edit_table(state, |t| table_editor::clone_row(t, row)),
        SessionAction::SetCell { row, col, value } => {
            edit_table(state, |t| table_editor::set_cell(t, row, col, value))
        }
        SessionAction::SetType { row, value } => {
            edit_table(state, |t| table_editor::set_type(t, row, &value))
        }
        SessionAction::SetFieldType { row, value } => {
            edit_table(state, |t| table_editor::set_field_type(t, row, &value))
        }
        SessionAction::SetOptions { row, options } => {
            edit_table(state, |t| table_editor::set_options(t, row, &options))
        }
        SessionAction::GenerateImportObject => {
            if let Some(table) = &state.table {
                state.import_object = Some(build_property_records(table));
            }
            Ok(Transition::to(state))
        }
        SessionAction::Upload => {
            if state.is_uploading {
                return Err(AppError::ValidationError(UPLOAD_IN_PROGRESS_MESSAGE.to_string()));
            }
            let target = match (&state.import_object, state.upload_target()) {
                (Some(_), Some(target)) => target,
                _ => {
                    return Err(AppError::ValidationError(
                        UPLOAD_PRECONDITION_MESSAGE.to_string(),
                    ))
                }
            };
            let records = match &state.table {
                Some(table) => build_property_records(table),
                None => state.import_object.clone().unwrap_or_default(),
            };
            state.import_object = Some(records.clone());
            state.is_uploading = true;
            Ok(Transition::with(
                state,
                SessionCommand::UploadProperties {
                    object_type: target,
                    records,
                },
            ))
        }
        SessionAction::DismissNotifications => {
            state.notifications.clear();
            Ok(Transition::to(state))
        }
    }
}

/// Fold a finished command back into `state`. Lookup results that no longer
/// match the selected object type are discarded.
pub fn complete(state: BulkUploadState, outcome: CommandOutcome) -> BulkUploadState {
    let mut state = state;
    match outcome {
        CommandOutcome::CustomObjects(result) => {
            if state.object_type != Some(ObjectType::Custom) {
                return state;
            }
            state.is_loading_lookups = false;
            match result {
                Ok(listing) => {
                    let has_results = listing["results"]
                        .as_array()
                        .map(|results| !results.is_empty())
                        .unwrap_or(false);
                    state.custom_objects = custom_objects_from_schemas(&listing);
                    if !has_results {
                        state.lookup_error = Some(NO_CUSTOM_OBJECTS_MESSAGE.to_string());
                    }
                }
                Err(err) => {
                    state.lookup_error = Some(err.message().to_string());
                    state.push(Notification::error(
                        "Failed to fetch custom objects",
                        err.message().to_string(),
                    ));
                }
            }
        }
        CommandOutcome::PropertyGroups { object_type, result } => {
            if state.object_type.map(|ot| ot.as_str()) != Some(object_type.as_str()) {
                return state;
            }
            state.is_loading_lookups = false;
            match result {
                Ok(listing) => {
                    state.available_groups = group_names_from_listing(&listing);
                    if state.available_groups.is_empty() {
                        state.lookup_error = Some(NO_GROUPS_MESSAGE.to_string());
                    }
                }
                Err(err) => {
                    state.lookup_error = Some(err.message().to_string());
                    state.push(Notification::error(
                        "Failed to fetch property groups",
                        err.message().to_string(),
                    ));
                }
            }
        }
        CommandOutcome::Upload(result) => {
            state.is_uploading = false;
            match result {
                Ok(summary) => {
                    let count = summary.num_properties_created;
                    let noun = if count == 1 { "property" } else { "properties" };
                    state.push(Notification::success(
                        "Successful request",
                        format!("Uploaded {} {} to HubSpot.", count, noun),
                    ));
                    state.last_upload = Some(summary);
                }
                Err(err) => {
                    state.push(Notification::error("Error", err.message().to_string()));
                }
            }
        }
    }
    state
}

/// Owns the session state and runs the commands its transitions emit.
pub struct SessionController {
    state: Mutex<BulkUploadState>,
    gateway: Arc<PropertyGateway>,
}

impl SessionController {
    pub fn new(gateway: Arc<PropertyGateway>) -> Self {
        Self {
            state: Mutex::new(BulkUploadState::new()),
            gateway,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BulkUploadState>> {
        self.state
            .lock()
            .map_err(|_| AppError::Internal("Session state lock poisoned".to_string()))
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        Ok(self.lock()?.clone().into())
    }

    /// Apply `action`, run any resulting command to completion, and return
    /// the resulting snapshot. The lock is not held while a command runs.
    pub async fn dispatch(&self, action: SessionAction) -> Result<SessionSnapshot> {
        let command = {
            let mut guard = self.lock()?;
            let transition = reduce(guard.clone(), action)?;
            *guard = transition.state;
            transition.command
        };

        if let Some(command) = command {
            info!(command = command.name(), "Running session command");
            let outcome = self.execute(command).await;
            let mut guard = self.lock()?;
            *guard = complete(guard.clone(), outcome);
        }

        self.snapshot()
    }

    async fn execute(&self, command: SessionCommand) -> CommandOutcome {
        match command {
            SessionCommand::FetchCustomObjects => {
                CommandOutcome::CustomObjects(self.gateway.fetch_schemas().await)
            }
            SessionCommand::FetchPropertyGroups { object_type } => {
                let result = self.gateway.fetch_property_groups(Some(&object_type)).await;
                CommandOutcome::PropertyGroups {
                    object_type,
                    result,
                }
            }
            SessionCommand::UploadProperties {
                object_type,
                records,
            } => {
                let result = self.gateway.upload_properties(&object_type, &records).await;
                if let Err(err) = &result {
                    warn!(object_type = %object_type, error = %err, "Session upload failed");
                }
                CommandOutcome::Upload(result)
            }
        }
    }
}
