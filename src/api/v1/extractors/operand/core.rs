/*
 * Responsibility
 * - Path の String を受け、i64 の operand へ変換する
 * - 失敗時は AppError::bad_request("INVALID_VALUE") (JSON error body) へ変換
 *   (axum 標準の Path<i64> rejection は plain text なので使わない)
 */
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand(pub i64);

fn parse_operand(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request("INVALID_VALUE", "value must be a 64-bit integer"))
}

impl<S> FromRequestParts<S> for Operand
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("INVALID_VALUE", "missing value"))?;
        parse_operand(&raw).map(Operand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_integers() {
        assert_eq!(parse_operand("21").ok(), Some(21));
        assert_eq!(parse_operand("-7").ok(), Some(-7));
        assert_eq!(parse_operand(&i64::MAX.to_string()).ok(), Some(i64::MAX));
    }

    #[test]
    fn rejects_non_integers() {
        for raw in ["", "abc", "1.5", "9223372036854775808"] {
            assert!(matches!(
                parse_operand(raw),
                Err(AppError::BadRequest {
                    code: "INVALID_VALUE",
                    ..
                })
            ));
        }
    }
}
