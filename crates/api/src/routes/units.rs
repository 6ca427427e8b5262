//! Building, flat and housing unit routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use society_core::auth::SocietyRole;
use society_db::UnitRepository;
use society_db::repositories::{CreateBuildingInput, CreateFlatInput, CreateHousingUnitInput};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiResult;
use crate::middleware::{AuthUser, require_role};
use crate::schemas::{self, UpdateRateInput, validate_input};

/// Creates the units router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/societies/{society_id}/buildings",
            get(list_buildings).post(create_building),
        )
        .route(
            "/societies/{society_id}/flats",
            get(list_flats).post(create_flat),
        )
        .route(
            "/societies/{society_id}/flats/{flat_id}/rate",
            put(update_flat_rate),
        )
        .route(
            "/societies/{society_id}/housing-units",
            get(list_housing_units).post(create_housing_unit),
        )
        .route(
            "/societies/{society_id}/housing-units/{housing_id}/rate",
            put(update_housing_rate),
        )
}

#[derive(Debug, Default, Deserialize)]
struct FlatQuery {
    building_id: Option<Uuid>,
}

fn repo(state: &AppState) -> UnitRepository {
    UnitRepository::new((*state.db).clone())
}

/// POST /societies/{society_id}/buildings - Create a building.
async fn create_building(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<schemas::CreateBuildingInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let building = repo(&state)
        .create_building(
            society_id,
            CreateBuildingInput {
                name: payload.name.trim().to_string(),
                total_floors: payload.total_floors,
            },
        )
        .await?;

    info!(society_id = %society_id, building_id = %building.id, "Building created");
    Ok((StatusCode::CREATED, Json(building)))
}

/// GET /societies/{society_id}/buildings - List buildings.
async fn list_buildings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    Ok(Json(repo(&state).list_buildings(society_id).await?))
}

/// POST /societies/{society_id}/flats - Create a flat in a building.
async fn create_flat(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<schemas::CreateFlatInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let flat = repo(&state)
        .create_flat(
            society_id,
            CreateFlatInput {
                building_id: payload.building_id,
                flat_number: payload.flat_number.trim().to_string(),
                floor_number: payload.floor_number,
                square_foot: payload.square_foot,
                current_maintenance: payload.current_maintenance,
            },
        )
        .await?;

    info!(society_id = %society_id, flat_id = %flat.id, "Flat created");
    Ok((StatusCode::CREATED, Json(flat)))
}

/// GET /societies/{society_id}/flats - List flats, optionally per building.
async fn list_flats(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Query(query): Query<FlatQuery>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    Ok(Json(
        repo(&state)
            .list_flats(society_id, query.building_id)
            .await?,
    ))
}

/// PUT /societies/{society_id}/flats/{flat_id}/rate - Change a flat's rate.
async fn update_flat_rate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, flat_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateRateInput>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let flat = repo(&state)
        .update_flat_rate(society_id, flat_id, payload.current_maintenance)
        .await?;

    info!(society_id = %society_id, flat_id = %flat_id, rate = %flat.current_maintenance, "Flat rate updated");
    Ok(Json(flat))
}

/// POST /societies/{society_id}/housing-units - Create a housing unit.
async fn create_housing_unit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
    Json(payload): Json<schemas::CreateHousingUnitInput>,
) -> ApiResult<impl IntoResponse> {
    validate_input(&payload)?;
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let unit = repo(&state)
        .create_housing_unit(
            society_id,
            CreateHousingUnitInput {
                unit_number: payload.unit_number.trim().to_string(),
                unit_type: payload.unit_type,
                square_foot: payload.square_foot,
                current_maintenance: payload.current_maintenance,
            },
        )
        .await?;

    info!(society_id = %society_id, housing_id = %unit.id, "Housing unit created");
    Ok((StatusCode::CREATED, Json(unit)))
}

/// GET /societies/{society_id}/housing-units - List housing units.
async fn list_housing_units(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(society_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Member).await?;
    Ok(Json(repo(&state).list_housing_units(society_id).await?))
}

/// PUT /societies/{society_id}/housing-units/{housing_id}/rate - Change a housing unit's rate.
async fn update_housing_rate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((society_id, housing_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateRateInput>,
) -> ApiResult<impl IntoResponse> {
    require_role(&state, society_id, auth.user_id(), SocietyRole::Admin).await?;

    let unit = repo(&state)
        .update_housing_rate(society_id, housing_id, payload.current_maintenance)
        .await?;

    info!(society_id = %society_id, housing_id = %housing_id, rate = %unit.current_maintenance, "Housing unit rate updated");
    Ok(Json(unit))
}
