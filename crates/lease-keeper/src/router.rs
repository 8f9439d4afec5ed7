use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::calendar;
use crate::domain::{
    Housing, HousingId, HousingSituation, Key, KeyId, LeaseId, Tenant, TenantId, TenantSituation,
    UpcomingIndexation,
};
use crate::error::AppError;
use crate::keeper::LeaseKeeper;
use crate::lifecycle::LeaseDraft;
use crate::live;
use crate::repository::{HousingRepository, LeaseRepository, RepositoryError, TenantRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeaseRequest {
    #[serde(flatten)]
    pub lease: LeaseDraft,
    #[serde(default)]
    pub keys: Vec<Key>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseLeaseRequest {
    pub end_epoch_day: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexationQuery {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HousingSituationView {
    pub housing_id: HousingId,
    pub situation: HousingSituation,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TenantSituationView {
    pub tenant_id: TenantId,
    #[serde(flatten)]
    pub situation: TenantSituation,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexationView {
    #[serde(flatten)]
    pub indexation: UpcomingIndexation,
    pub next_indexation_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexationReport {
    pub today: NaiveDate,
    pub indexations: Vec<IndexationView>,
}

impl IndexationReport {
    pub fn new(today: NaiveDate, indexations: Vec<UpcomingIndexation>) -> Self {
        let indexations = indexations
            .into_iter()
            .map(|indexation| IndexationView {
                next_indexation_date: indexation.next_indexation_date(),
                indexation,
            })
            .collect();
        Self { today, indexations }
    }
}

/// Router exposing the lifecycle use-cases and the live views as point-in-time reads.
pub fn lease_keeper_router<S>(keeper: Arc<LeaseKeeper<S>>) -> Router
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    Router::new()
        .route("/api/v1/housings", post(create_housing::<S>))
        .route(
            "/api/v1/housings/:housing_id",
            put(update_housing::<S>).delete(delete_housing::<S>),
        )
        .route(
            "/api/v1/housings/:housing_id/situation",
            get(housing_situation::<S>),
        )
        .route("/api/v1/tenants", post(create_tenant::<S>))
        .route(
            "/api/v1/tenants/:tenant_id",
            put(update_tenant::<S>).delete(delete_tenant::<S>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/situation",
            get(tenant_situation::<S>),
        )
        .route("/api/v1/leases", post(create_lease::<S>))
        .route("/api/v1/leases/:lease_id/close", post(close_lease::<S>))
        .route("/api/v1/leases/:lease_id/keys", post(add_key::<S>))
        .route("/api/v1/keys/:key_id", delete(remove_key::<S>))
        .route("/api/v1/indexations", get(upcoming_indexations::<S>))
        .with_state(keeper)
}

type KeeperState<S> = State<Arc<LeaseKeeper<S>>>;

pub(crate) async fn create_housing<S>(
    State(keeper): KeeperState<S>,
    Json(housing): Json<Housing>,
) -> Result<impl IntoResponse, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let housing_id = keeper.housings.create_housing(housing).await?;
    Ok((StatusCode::CREATED, Json(json!({ "housing_id": housing_id }))))
}

pub(crate) async fn update_housing<S>(
    State(keeper): KeeperState<S>,
    Path(housing_id): Path<i64>,
    Json(mut housing): Json<Housing>,
) -> Result<StatusCode, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    housing.id = HousingId(housing_id);
    keeper.housings.update_housing(housing).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn delete_housing<S>(
    State(keeper): KeeperState<S>,
    Path(housing_id): Path<i64>,
) -> Result<StatusCode, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    keeper.housings.delete_housing(HousingId(housing_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn housing_situation<S>(
    State(keeper): KeeperState<S>,
    Path(housing_id): Path<i64>,
) -> Result<Json<HousingSituationView>, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let housing_id = HousingId(housing_id);
    let housing = live::current(keeper.housings.observe_housing(housing_id))
        .await?
        .ok_or(RepositoryError::NotFound {
            entity: "housing",
            id: housing_id.0,
        })?;
    let situation =
        live::first_emission(keeper.situations.observe_housing_situation(housing)).await?;

    Ok(Json(HousingSituationView {
        housing_id,
        situation,
        label: situation.label(),
    }))
}

pub(crate) async fn create_tenant<S>(
    State(keeper): KeeperState<S>,
    Json(tenant): Json<Tenant>,
) -> Result<impl IntoResponse, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let tenant_id = keeper.tenants.create_tenant(tenant).await?;
    Ok((StatusCode::CREATED, Json(json!({ "tenant_id": tenant_id }))))
}

pub(crate) async fn update_tenant<S>(
    State(keeper): KeeperState<S>,
    Path(tenant_id): Path<i64>,
    Json(mut tenant): Json<Tenant>,
) -> Result<StatusCode, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    tenant.id = TenantId(tenant_id);
    keeper.tenants.update_tenant(tenant).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn delete_tenant<S>(
    State(keeper): KeeperState<S>,
    Path(tenant_id): Path<i64>,
) -> Result<StatusCode, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    keeper.tenants.delete_tenant(TenantId(tenant_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn tenant_situation<S>(
    State(keeper): KeeperState<S>,
    Path(tenant_id): Path<i64>,
) -> Result<Json<TenantSituationView>, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let tenant_id = TenantId(tenant_id);
    let tenant = live::current(keeper.tenants.observe_tenant(tenant_id))
        .await?
        .ok_or(RepositoryError::NotFound {
            entity: "tenant",
            id: tenant_id.0,
        })?;
    let situation =
        live::first_emission(keeper.situations.observe_tenant_situation(tenant)).await?;

    Ok(Json(TenantSituationView {
        tenant_id,
        situation,
    }))
}

pub(crate) async fn create_lease<S>(
    State(keeper): KeeperState<S>,
    Json(request): Json<CreateLeaseRequest>,
) -> Result<impl IntoResponse, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let lease_id = keeper
        .leases
        .create_lease(request.lease, request.keys)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "lease_id": lease_id }))))
}

pub(crate) async fn close_lease<S>(
    State(keeper): KeeperState<S>,
    Path(lease_id): Path<i64>,
    Json(request): Json<CloseLeaseRequest>,
) -> Result<StatusCode, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    keeper
        .leases
        .close_lease(LeaseId(lease_id), request.end_epoch_day)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn add_key<S>(
    State(keeper): KeeperState<S>,
    Path(lease_id): Path<i64>,
    Json(key): Json<Key>,
) -> Result<impl IntoResponse, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let key_id = keeper.leases.add_key(LeaseId(lease_id), key).await?;
    Ok((StatusCode::CREATED, Json(json!({ "key_id": key_id }))))
}

pub(crate) async fn remove_key<S>(
    State(keeper): KeeperState<S>,
    Path(key_id): Path<i64>,
) -> Result<StatusCode, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    keeper.leases.remove_key(KeyId(key_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn upcoming_indexations<S>(
    State(keeper): KeeperState<S>,
    Query(query): Query<IndexationQuery>,
) -> Result<Json<IndexationReport>, AppError>
where
    S: HousingRepository + TenantRepository + LeaseRepository + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    let upcoming = live::first_emission(
        keeper
            .indexations
            .observe_upcoming_indexations(calendar::epoch_day(today)),
    )
    .await?;

    Ok(Json(IndexationReport::new(today, upcoming)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> (Router, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let keeper = Arc::new(LeaseKeeper::new(store.clone()));
        (lease_keeper_router(keeper), store)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn lease_with_out_of_range_due_day_is_unprocessable() {
        let (router, store) = router();

        let response = router
            .oneshot(json_request(
                "POST",
                "/api/v1/leases",
                json!({
                    "housing_id": 1,
                    "tenant_id": 1,
                    "start_date_epoch_day": 19_000,
                    "rent_due_day_of_month": 31
                }),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json_body(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("due day"));
        assert_eq!(store.lease_count(), 0);
    }

    #[tokio::test]
    async fn situation_of_unknown_housing_is_not_found() {
        let (router, _) = router();
        let response = router
            .oneshot(
                Request::get("/api/v1/housings/99/situation")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn indexations_report_dates() {
        let (router, store) = router();
        let lease = crate::domain::Lease {
            housing_id: HousingId(1),
            tenant_id: TenantId(1),
            start_date_epoch_day: 0,
            rent_due_day_of_month: 1,
            index_anniversary_epoch_day: Some(0),
            ..crate::domain::Lease::default()
        };
        store
            .create_lease_with_keys(lease, Vec::new())
            .await
            .expect("lease stored");

        let response = router
            .oneshot(
                Request::get("/api/v1/indexations?today=1971-02-05")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json_body(response).await;
        assert_eq!(body["today"], "1971-02-05");
        assert_eq!(body["indexations"][0]["days_until"], 330);
        assert_eq!(body["indexations"][0]["next_indexation_date"], "1972-01-01");
        assert_eq!(body["indexations"][0]["lease_id"], 1);
    }
}
