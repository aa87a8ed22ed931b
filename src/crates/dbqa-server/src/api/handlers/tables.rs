//! Table listing and schema lookup handlers.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{SchemaResponse, TablesResponse};
use crate::api::routes::AppState;

/// Handler for `GET /tables`.
pub async fn tables(State(state): State<AppState>) -> ApiResult<Json<TablesResponse>> {
    let tables = state.service.available_tables().await?;
    Ok(Json(TablesResponse { tables }))
}

/// Handler for `GET /schema/{table_name}`.
///
/// 404 whenever the table is not among the queryable tables or the lookup
/// fails.
pub async fn schema(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> ApiResult<Json<SchemaResponse>> {
    match state.service.table_schema(&table_name).await {
        Ok(Some(schema)) => Ok(Json(SchemaResponse {
            table: table_name,
            schema,
        })),
        Ok(None) => Err(ApiError::NotFound(format!(
            "Table {} not found",
            table_name
        ))),
        Err(err) => {
            tracing::error!(%err, table = %table_name, "schema lookup failed");
            Err(ApiError::NotFound(format!(
                "Table {} not found or error: {}",
                table_name, err
            )))
        }
    }
}
