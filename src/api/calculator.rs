use axum::Json;
use validator::Validate;

use crate::api::dto::{CalculatorForm, CalculatorView, SubmitResponse};
use crate::Result;

pub async fn evaluate(Json(form): Json<CalculatorForm>) -> Result<Json<CalculatorView>> {
    form.validate()?;
    let calc = form.into_calculator()?;
    Ok(Json(CalculatorView::from(&calc)))
}

pub async fn submit(Json(form): Json<CalculatorForm>) -> Result<Json<SubmitResponse>> {
    form.validate()?;
    let mut calc = form.into_calculator()?;
    let quote = calc.submit()?;
    tracing::info!(product = quote.product, quantity = quote.quantity, total = quote.total.amount(), "calculator order submitted");
    Ok(Json(SubmitResponse { formatted_total: quote.total.to_string(), quote, notifications: calc.take_notifications() }))
}
