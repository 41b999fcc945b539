use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Energy carrier moving between components
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Commodity {
    Heat,
    Electricity,
    Gas,
    Solar,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_identifier_form_is_lowercase() {
        assert_eq!(Commodity::Heat.to_string(), "heat");
        assert_eq!(Commodity::Electricity.as_ref(), "electricity");
    }

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(Commodity::from_str("GAS").unwrap(), Commodity::Gas);
        assert!(Commodity::from_str("steam").is_err());
    }
}
