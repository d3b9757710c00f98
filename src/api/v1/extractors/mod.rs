/*
 * Responsibility
 * - handler 向け extractor の公開
 *   - CurrentPrincipal: access middleware が検証済みの Principal
 *   - Operand: Path の数値 (不正なら 400 INVALID_VALUE)
 */
mod operand;
mod principal;

pub use operand::Operand;
pub use principal::CurrentPrincipal;
