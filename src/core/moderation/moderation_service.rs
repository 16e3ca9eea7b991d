// Moderation policy - the bounded-range check behind the `clear` command.
// NO Discord dependencies here, just the rule and its error type.

use thiserror::Error;

/// Upper bound for one bulk deletion, matching Discord's own API limit.
pub const MAX_PURGE_AMOUNT: u16 = 100;

/// How many messages `clear` removes when no amount is given.
pub const DEFAULT_PURGE_AMOUNT: u16 = 5;

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("purge amount must be between 1 and {MAX_PURGE_AMOUNT}, got {0}")]
    AmountOutOfRange(i64),
}

/// Validate a requested purge amount, returning the count to delete.
///
/// The command layer passes the raw integer straight from Discord; anything
/// outside 1..=[`MAX_PURGE_AMOUNT`] is rejected so callers can render the
/// localized invalid-amount message.
pub fn validate_purge_amount(amount: i64) -> Result<u16, ModerationError> {
    if amount < 1 || amount > i64::from(MAX_PURGE_AMOUNT) {
        return Err(ModerationError::AmountOutOfRange(amount));
    }
    Ok(amount as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_amounts_within_bounds() {
        assert_eq!(validate_purge_amount(1).unwrap(), 1);
        assert_eq!(
            validate_purge_amount(i64::from(DEFAULT_PURGE_AMOUNT)).unwrap(),
            DEFAULT_PURGE_AMOUNT
        );
        assert_eq!(validate_purge_amount(100).unwrap(), MAX_PURGE_AMOUNT);
    }

    #[test]
    fn rejects_amounts_outside_bounds() {
        assert!(validate_purge_amount(0).is_err());
        assert!(validate_purge_amount(-5).is_err());
        assert!(validate_purge_amount(101).is_err());
    }

    #[test]
    fn out_of_range_error_names_the_rejected_value() {
        let err = validate_purge_amount(250).unwrap_err();
        assert!(err.to_string().contains("250"));
        assert!(err.to_string().contains("100"));
    }
}
