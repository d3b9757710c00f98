/**
 * Responsibility
 *  - Path の文字列を計算用の i64 として受け取る extractor
 */
mod core;

pub use self::core::Operand;
