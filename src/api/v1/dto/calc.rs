/*
 * Responsibility
 * - calc の response DTO
 */
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CalcResponse {
    /// Operand taken from the path.
    pub value: i64,
    pub result: i64,
}
