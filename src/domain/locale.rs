//! Site locales and their Cockpit language codes.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ja];

    /// Site path segment, e.g. `/ja/artists`.
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }

    /// Language code configured in Cockpit, sent as the `locale` query parameter.
    pub fn cms_code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja_JP",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Locale::ALL
            .into_iter()
            .find(|locale| {
                trimmed.eq_ignore_ascii_case(locale.as_str())
                    || trimmed.eq_ignore_ascii_case(locale.cms_code())
            })
            .ok_or_else(|| DomainError::validation(format!("unsupported locale `{value}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_site_and_cms_codes() {
        assert_eq!("en".parse::<Locale>().expect("en"), Locale::En);
        assert_eq!("JA".parse::<Locale>().expect("ja"), Locale::Ja);
        assert_eq!("ja_JP".parse::<Locale>().expect("ja_JP"), Locale::Ja);
    }

    #[test]
    fn rejects_unknown_locale() {
        let err = "fr".parse::<Locale>().expect_err("fr is not served");
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn japanese_uses_cockpit_region_code() {
        assert_eq!(Locale::Ja.cms_code(), "ja_JP");
        assert_eq!(Locale::Ja.to_string(), "ja");
    }
}
