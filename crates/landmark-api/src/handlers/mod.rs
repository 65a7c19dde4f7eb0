pub mod clients;
pub mod contacts;
pub mod content;
pub mod health;
pub mod projects;
pub mod subscriptions;

use landmark_core::AppError;
use uuid::Uuid;

/// Parse a path identifier; anything that is not a UUID is a 400.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Ok(Uuid::parse_str(raw.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_invalid_input() {
        assert!(parse_id("67a1f0c2e4b0a1b2c3d4e5f6").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_id("not-an-id"),
            Err(AppError::InvalidInput(msg)) if msg == "Invalid identifier"
        ));
    }
}
