/*
 * Responsibility
 * - GET /api/v1/calc/double/{value}  (policy: calc:double)
 * - GET /api/v1/calc/square/{value}  (policy: calc:square)
 * - scope の判定は route_layer 側。handler は計算だけ
 */
use axum::Json;

use crate::api::v1::dto::calc::CalcResponse;
use crate::api::v1::extractors::Operand;
use crate::error::AppError;

fn overflow() -> AppError {
    AppError::bad_request("OVERFLOW", "result does not fit in a 64-bit integer")
}

pub fn double_value(value: i64) -> Result<i64, AppError> {
    value.checked_mul(2).ok_or_else(overflow)
}

pub fn square_value(value: i64) -> Result<i64, AppError> {
    value.checked_mul(value).ok_or_else(overflow)
}

#[utoipa::path(
    get,
    path = "/api/v1/calc/double/{value}",
    tag = "calc",
    params(("value" = i64, Path, description = "Operand")),
    responses(
        (status = 200, description = "Twice the operand", body = CalcResponse),
        (status = 400, description = "Invalid operand or overflow"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Token lacks the calc:double scope"),
    ),
    security(("bearer_auth" = ["calc:double"]))
)]
pub async fn double(Operand(value): Operand) -> Result<Json<CalcResponse>, AppError> {
    let result = double_value(value)?;
    Ok(Json(CalcResponse { value, result }))
}

#[utoipa::path(
    get,
    path = "/api/v1/calc/square/{value}",
    tag = "calc",
    params(("value" = i64, Path, description = "Operand")),
    responses(
        (status = 200, description = "The operand squared", body = CalcResponse),
        (status = 400, description = "Invalid operand or overflow"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 403, description = "Token lacks the calc:square scope"),
    ),
    security(("bearer_auth" = ["calc:square"]))
)]
pub async fn square(Operand(value): Operand) -> Result<Json<CalcResponse>, AppError> {
    let result = square_value(value)?;
    Ok(Json(CalcResponse { value, result }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubles_and_squares() {
        assert_eq!(double_value(21).ok(), Some(42));
        assert_eq!(double_value(-4).ok(), Some(-8));
        assert_eq!(square_value(-12).ok(), Some(144));
        assert_eq!(square_value(0).ok(), Some(0));
    }

    #[test]
    fn overflow_is_a_bad_request() {
        assert!(matches!(
            double_value(i64::MAX),
            Err(AppError::BadRequest { code: "OVERFLOW", .. })
        ));
        assert!(matches!(
            square_value(i64::MIN),
            Err(AppError::BadRequest { code: "OVERFLOW", .. })
        ));
    }
}
