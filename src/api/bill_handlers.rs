use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::error::{api_error, invalid, unavailable, ApiError};
use crate::app::AppState;
use crate::logic::{parse_date, ValidationError};
use crate::model::{Caller, Period};

#[derive(Debug, Default, Deserialize)]
pub struct BillQuery {
    /// Any day of the month to bill, `YYYYMMDD`
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

fn optional_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    raw.map(|value| parse_date(field, value)).transpose()
}

/// Resolve the billing period from the query, defaulting to the month of `today`
pub fn resolve_period(query: &BillQuery, today: NaiveDate) -> Result<Period, ApiError> {
    let date = optional_date("date", query.date.as_deref()).map_err(invalid)?;
    let from = optional_date("from", query.from.as_deref()).map_err(invalid)?;
    let to = optional_date("to", query.to.as_deref()).map_err(invalid)?;

    if let Some(date) = date {
        if from.is_some() || to.is_some() {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "date",
                "use either date or from/to, not both",
            ));
        }
        return Ok(Period::month_of(date));
    }

    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        (Some(from), None) => (from, Period::month_of(from).to),
        (None, Some(to)) => (Period::month_of(to).from, to),
        (None, None) => {
            let month = Period::month_of(today);
            (month.from, month.to)
        }
    };

    Period::new(from, to).ok_or_else(|| invalid(ValidationError::InvertedPeriod { from, to }))
}

/// GET /bill/
/// The caller's bill for a period, rendered as XML
pub async fn get_bill(
    State(ctx): State<AppState>,
    caller: Caller,
    Query(query): Query<BillQuery>,
) -> Result<Response, ApiError> {
    let period = resolve_period(&query, chrono::Utc::now().date_naive())?;

    let bill = ctx
        .billing
        .bill(caller.user_id(), period)
        .await
        .map_err(|e| unavailable("bill", &e))?;

    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        bill.to_xml(),
    )
        .into_response())
}
