//! Unit tests for the ledger engine
//!
//! Validation and command-shape tests that run without a database.
//! The atomicity and rollback contracts are exercised against a real
//! database in `tests/integration_ledger.rs`.

#[cfg(test)]
mod tests {
    use crate::domain::{Amount, CurrencyCode};
    use crate::handlers::{
        ConvertCommand, FundCommand, RecipientKind, SendMoneyCommand, WithdrawCommand,
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    #[test]
    fn test_fund_command_shape() {
        let user_id = Uuid::new_v4();
        let cmd = FundCommand::new(user_id, "100.00".to_string(), "USD".to_string());

        assert_eq!(cmd.user_id, user_id);
        assert_eq!(cmd.amount, "100.00");
    }

    #[test]
    fn test_withdraw_command_shape() {
        let cmd = WithdrawCommand::new(Uuid::new_v4(), "40.00".to_string(), "USD".to_string());
        assert_eq!(cmd.amount, "40.00");
    }

    #[test]
    fn test_send_command_missing_fields_stay_none() {
        let cmd = SendMoneyCommand::new(Uuid::new_v4());

        assert!(cmd.amount.is_none());
        assert!(cmd.account_type.is_none());
        assert!(cmd.account_id.is_none());
        assert!(cmd.currency.is_none());
        assert!(cmd.receiving_currency.is_none());
        assert!(cmd.description.is_none());
    }

    #[test]
    fn test_send_command_full() {
        let recipient = Uuid::new_v4();
        let cmd = SendMoneyCommand::new(Uuid::new_v4())
            .with_amount("100")
            .with_recipient(RecipientKind::Wallet, recipient.to_string())
            .with_currencies("USD", "NGN")
            .with_description("Rent".to_string());

        assert_eq!(cmd.account_id, Some(recipient.to_string()));
        assert_eq!(cmd.description.as_deref(), Some("Rent"));
    }

    #[test]
    fn test_convert_command_shape() {
        let cmd = ConvertCommand::new(Uuid::new_v4(), "50", "USD", "EUR");
        assert_eq!(cmd.from_currency.as_deref(), Some("USD"));
        assert_eq!(cmd.to_currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_engine_amounts_are_validated() {
        // Every handler parses its amount through Amount
        let invalid_amounts = vec![
            "0",          // Zero is not allowed
            "-100",       // Negative not allowed
            "abc",        // Not a number
            "1.005",      // More than 2 decimal places
            "1000000001", // Exceeds max
        ];

        for amount_str in invalid_amounts {
            let result: Result<Amount, _> = amount_str.parse();
            assert!(result.is_err(), "Expected error for amount: {}", amount_str);
        }

        let amount: Amount = "100.00".parse().unwrap();
        assert_eq!(amount.value(), Decimal::from_str("100.00").unwrap());
    }

    #[test]
    fn test_effective_rate_rounding() {
        // Rate reported to callers is converted/amount at 6 decimal places
        let amount = Decimal::from_str("100").unwrap();
        let converted = Decimal::from_str("150000").unwrap();
        let mut rate = converted / amount;
        rate.rescale(6);

        assert_eq!(rate, Decimal::from_str("1500.000000").unwrap());
        assert_eq!(rate.to_string(), "1500.000000");
    }

    #[test]
    fn test_same_currency_comparison_is_normalized() {
        // "usd" and "USD" are the same currency after parsing
        let a: CurrencyCode = "usd".parse().unwrap();
        let b: CurrencyCode = "USD".parse().unwrap();
        assert_eq!(a, b);
    }
}
