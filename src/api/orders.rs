use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::{AttachFileRequest, OrderView, ParametersRequest, SelectProductRequest};
use crate::api::errors::is_user_recoverable;
use crate::api::sessions::SessionStore;
use crate::api::AppState;
use crate::domain::aggregates::{OrderWizard, WizardError};
use crate::Result;

type OrderResponse = Result<(StatusCode, Json<OrderView>)>;

/// Runs a wizard operation and answers with the resulting view. Input the
/// user can correct gets 422 plus the view, so the notifications still reach
/// them; anything else becomes an error body.
async fn apply<T>(store: &SessionStore, id: Uuid, op: impl FnOnce(&mut OrderWizard) -> std::result::Result<T, WizardError>) -> OrderResponse {
    let (outcome, view) = store.update(id, |w| (op(w), OrderView::drain(w))).await?;
    match outcome {
        Ok(_) => Ok((StatusCode::OK, Json(view))),
        Err(e) if is_user_recoverable(&e) => {
            tracing::info!(order = %id, error = %e, "wizard input rejected");
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(view)))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn open(State(s): State<AppState>) -> OrderResponse {
    let id = s.sessions.open().await;
    let view = s.sessions.update(id, OrderView::drain).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn show(State(s): State<AppState>, Path(id): Path<Uuid>) -> OrderResponse {
    apply(&s.sessions, id, |w| {
        w.keep_alive();
        Ok(())
    })
    .await
}

pub async fn close(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    s.sessions.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn select_product(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<SelectProductRequest>) -> OrderResponse {
    r.validate()?;
    apply(&s.sessions, id, |w| w.select_product(&r.product)).await
}

pub async fn set_parameters(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<ParametersRequest>) -> OrderResponse {
    r.validate()?;
    let quantity = r.quantity.resolve()?;
    apply(&s.sessions, id, |w| w.set_parameters(r.size.as_deref(), r.material.as_deref(), quantity)).await
}

pub async fn attach_file(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<AttachFileRequest>) -> OrderResponse {
    r.validate()?;
    let handle = r.into_handle()?;
    let (name, size, content_type) = (handle.name.clone(), handle.size, handle.content_type.clone());
    let mut job = None;
    let response = apply(&s.sessions, id, |w| {
        job = w.attach_file(handle)?;
        Ok(())
    })
    .await?;
    if response.0 == StatusCode::OK {
        tracing::info!(order = %id, file = %name, size, content_type = %content_type, "artwork accepted");
    } else {
        tracing::info!(order = %id, file = %name, size, content_type = %content_type, "artwork rejected");
    }
    if let Some(job) = job {
        s.sessions.spawn_preview(id, job);
    }
    Ok(response)
}

pub async fn remove_file(State(s): State<AppState>, Path(id): Path<Uuid>) -> OrderResponse {
    apply(&s.sessions, id, |w| w.remove_file()).await
}

pub async fn next(State(s): State<AppState>, Path(id): Path<Uuid>) -> OrderResponse {
    apply(&s.sessions, id, |w| {
        let step = w.advance()?;
        tracing::debug!(order = %w.id(), %step, "wizard advanced");
        Ok(())
    })
    .await
}

pub async fn back(State(s): State<AppState>, Path(id): Path<Uuid>) -> OrderResponse {
    apply(&s.sessions, id, |w| w.back()).await
}

pub async fn reset(State(s): State<AppState>, Path(id): Path<Uuid>) -> OrderResponse {
    apply(&s.sessions, id, |w| w.reset()).await
}

pub async fn confirm(State(s): State<AppState>, Path(id): Path<Uuid>) -> OrderResponse {
    apply(&s.sessions, id, |w| {
        let total = w.confirm()?;
        tracing::info!(order = %w.id(), total = total.amount(), "order confirmed");
        Ok(())
    })
    .await
}
