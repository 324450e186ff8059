//! Payment HTTP Routes
//!
//! CRUD endpoints for payments under `/v1/payments`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::db::{Db, RecordIter};
use crate::error::{Result, StoreError};
use crate::payment::{Links, Payment, PaymentResponse};
use crate::storage::RecordId;

use super::response::ApiError;
use super::URL_PREFIX;

/// Build the payment router over any [`Db`]
pub fn payment_routes<D>(db: Arc<D>) -> Router
where
    D: Db<Payment> + 'static,
{
    Router::new()
        .route(
            URL_PREFIX,
            get(list_payments::<D>).post(create_payment::<D>),
        )
        .route(
            &format!("{URL_PREFIX}/:id"),
            get(get_payment::<D>)
                .put(update_payment::<D>)
                .delete(delete_payment::<D>),
        )
        .with_state(db)
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("api not found".to_string())
}

fn parse_payment(body: &[u8]) -> std::result::Result<Payment, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Run store work on the blocking pool
///
/// Store calls are synchronous transactions that may wait on the single
/// writer or a commit fsync; they must not run on a runtime worker. If the
/// request times out the task still runs to completion.
async fn blocking<F, R>(work: F) -> std::result::Result<R, ApiError>
where
    F: FnOnce() -> std::result::Result<R, ApiError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "store task failed");
        ApiError::Internal(e.to_string())
    })?
}

// ==================
// Handlers
// ==================

async fn get_payment<D: Db<Payment> + 'static>(
    State(db): State<Arc<D>>,
    Path(id): Path<String>,
) -> std::result::Result<Json<PaymentResponse>, ApiError> {
    let id: RecordId = id.parse()?;
    let mut payment = blocking(move || Ok(db.get(id)?)).await?;
    payment.id = id.to_string();
    Ok(Json(PaymentResponse::single(payment)))
}

async fn create_payment<D: Db<Payment> + 'static>(
    State(db): State<Arc<D>>,
    body: Bytes,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let mut payment = parse_payment(&body)?;
    payment.verify()?;

    let (id, mut payment) = blocking(move || {
        let id = db.create(&payment)?;
        Ok((id, payment))
    })
    .await?;
    payment.id = id.to_string();
    tracing::info!(%id, "payment created");

    let location = format!("{URL_PREFIX}/{id}");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PaymentResponse::single(payment)),
    ))
}

/// Replace an existing payment
///
/// The store's update is an upsert, so existence is checked here first.
async fn update_payment<D: Db<Payment> + 'static>(
    State(db): State<Arc<D>>,
    Path(id): Path<String>,
    body: Bytes,
) -> std::result::Result<Json<PaymentResponse>, ApiError> {
    let id: RecordId = id.parse()?;

    let payment = blocking(move || {
        db.get(id)?;

        let mut payment = parse_payment(&body)?;
        payment.id = id.to_string();
        payment.verify()?;

        db.update(id, &payment)?;
        Ok(payment)
    })
    .await?;

    tracing::info!(%id, "payment updated");
    Ok(Json(PaymentResponse::single(payment)))
}

async fn delete_payment<D: Db<Payment> + 'static>(
    State(db): State<Arc<D>>,
    Path(id): Path<String>,
) -> std::result::Result<Json<PaymentResponse>, ApiError> {
    let id: RecordId = id.parse()?;
    blocking(move || Ok(db.delete(id)?)).await?;
    tracing::info!(%id, "payment deleted");
    Ok(Json(PaymentResponse::default()))
}

async fn list_payments<D: Db<Payment> + 'static>(
    State(db): State<Arc<D>>,
) -> std::result::Result<Json<PaymentResponse>, ApiError> {
    let data = blocking(move || {
        let mut iter = match db.list() {
            Ok(iter) => iter,
            // Never-written bucket: nothing to list yet
            Err(StoreError::NotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let drained = drain(&mut iter);
        let closed = iter.close();
        let data = drained?;
        closed?;
        Ok(data)
    })
    .await?;

    Ok(Json(PaymentResponse {
        data,
        links: Some(Links {
            self_link: URL_PREFIX.to_string(),
        }),
    }))
}

/// Scan every remaining payment, stamping ids from the keys
fn drain<I: RecordIter<Payment>>(iter: &mut I) -> Result<Vec<Payment>> {
    let mut payments = Vec::new();
    while iter.has_next() {
        let (id, mut payment) = iter.scan()?;
        payment.id = id.to_string();
        payments.push(payment);
    }
    Ok(payments)
}
