//! Static industry registry.
//!
//! The set of supported verticals is a closed enum mapped to static
//! configuration, so the host application can enumerate and verify it at
//! compile time. There is no runtime module loading.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Industry {
    RealEstate,
    Healthcare,
    Legal,
}

/// Static per-industry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryConfig {
    /// Stable key, also the serialized form.
    pub key: &'static str,
    pub display_name: &'static str,
    /// Platform modules enabled for this vertical.
    pub modules: &'static [&'static str],
}

const REAL_ESTATE: IndustryConfig = IndustryConfig {
    key: "real-estate",
    display_name: "Real Estate",
    modules: &["crm", "listings", "transactions", "cms-marketing"],
};

const HEALTHCARE: IndustryConfig = IndustryConfig {
    key: "healthcare",
    display_name: "Healthcare",
    modules: &["crm", "scheduling"],
};

const LEGAL: IndustryConfig = IndustryConfig {
    key: "legal",
    display_name: "Legal",
    modules: &["crm", "documents"],
};

impl Industry {
    /// All supported industries, in registry order.
    pub const ALL: &'static [Industry] = &[Self::RealEstate, Self::Healthcare, Self::Legal];

    pub fn config(self) -> &'static IndustryConfig {
        match self {
            Self::RealEstate => &REAL_ESTATE,
            Self::Healthcare => &HEALTHCARE,
            Self::Legal => &LEGAL,
        }
    }

    /// Parse an industry key. Unknown keys yield `None` — there is no
    /// fallback vertical.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|i| i.config().key == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_industry_has_config() {
        for industry in Industry::ALL {
            let config = industry.config();
            assert!(!config.key.is_empty());
            assert!(!config.modules.is_empty());
        }
    }

    #[test]
    fn parse_roundtrips_keys() {
        for industry in Industry::ALL {
            assert_eq!(Industry::parse(industry.config().key), Some(*industry));
        }
    }

    #[test]
    fn parse_fails_closed() {
        assert_eq!(Industry::parse("fintech"), None);
        assert_eq!(Industry::parse(""), None);
    }
}
