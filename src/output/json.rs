use serde::Serialize;

use crate::error::AppResult;

pub fn print<T: Serialize>(value: &T) -> AppResult<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

/// One document per line, for streams of session snapshots.
pub fn print_compact<T: Serialize>(value: &T) -> AppResult<()> {
    let payload = serde_json::to_string(value)?;
    println!("{payload}");
    Ok(())
}
