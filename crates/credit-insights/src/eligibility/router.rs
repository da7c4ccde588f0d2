use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::decision::DecisionSnapshot;
use super::offers::{CustomerId, OfferId, OfferResponse};
use super::profile::{Profile, ProfileInput};
use super::repository::{OfferStore, RepositoryError};
use super::service::{InsightsService, InsightsServiceError};
use crate::error::AppError;

/// Router builder exposing offer and decision-explanation endpoints.
pub fn insights_router<S>(service: Arc<InsightsService<S>>) -> Router
where
    S: OfferStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/customers/:customer_id/offers",
            post(offers_handler::<S>),
        )
        .route(
            "/api/v1/customers/:customer_id/offers/:offer_id/accept",
            post(accept_handler::<S>),
        )
        .route(
            "/api/v1/customers/:customer_id/offers/:offer_id/reject",
            post(reject_handler::<S>),
        )
        .route(
            "/api/v1/customers/:customer_id/offers/:offer_id/hide",
            post(hide_handler::<S>),
        )
        .route("/api/v1/decisions/explain", post(explain_handler::<S>))
        .with_state(service)
}

pub(crate) async fn offers_handler<S>(
    State(service): State<Arc<InsightsService<S>>>,
    Path(customer_id): Path<String>,
    axum::Json(input): axum::Json<ProfileInput>,
) -> Result<Response, AppError>
where
    S: OfferStore + 'static,
{
    let profile = Profile::from_input(input)?;
    let offers = service.offers_for(&CustomerId(customer_id), &profile, Utc::now());
    Ok((StatusCode::OK, axum::Json(offers)).into_response())
}

pub(crate) async fn accept_handler<S>(
    State(service): State<Arc<InsightsService<S>>>,
    Path((customer_id, offer_id)): Path<(String, String)>,
) -> Response
where
    S: OfferStore + 'static,
{
    respond(&service, customer_id, offer_id, OfferResponse::Accept)
}

pub(crate) async fn reject_handler<S>(
    State(service): State<Arc<InsightsService<S>>>,
    Path((customer_id, offer_id)): Path<(String, String)>,
) -> Response
where
    S: OfferStore + 'static,
{
    respond(&service, customer_id, offer_id, OfferResponse::Reject)
}

pub(crate) async fn hide_handler<S>(
    State(service): State<Arc<InsightsService<S>>>,
    Path((customer_id, offer_id)): Path<(String, String)>,
) -> Response
where
    S: OfferStore + 'static,
{
    respond(&service, customer_id, offer_id, OfferResponse::Hide)
}

fn respond<S>(
    service: &InsightsService<S>,
    customer_id: String,
    offer_id: String,
    response: OfferResponse,
) -> Response
where
    S: OfferStore + 'static,
{
    let offer_id = OfferId(offer_id);
    match service.respond(&CustomerId(customer_id), &offer_id, response, Utc::now()) {
        Ok(offer) => (StatusCode::OK, axum::Json(offer)).into_response(),
        Err(InsightsServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "offer_id": offer_id.0,
                "error": "offer not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(InsightsServiceError::Transition(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(InsightsServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            let payload = json!({
                "error": format!("offer store unavailable: {reason}"),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn explain_handler<S>(
    State(service): State<Arc<InsightsService<S>>>,
    axum::Json(decision): axum::Json<DecisionSnapshot>,
) -> Response
where
    S: OfferStore + 'static,
{
    let explanation = service.explain(&decision);
    (StatusCode::OK, axum::Json(explanation)).into_response()
}
