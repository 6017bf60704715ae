//! The closed catalog of B3 tables and the protocol each one is fetched with.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::B3Error;

/// A dataset published by B3.
///
/// Names match the identifiers the remote service uses in URLs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Table {
    TradeInformationConsolidated,
    #[serde(rename = "OTCTradeInformationConsolidated")]
    OtcTradeInformationConsolidated,
    TradeInformationConsolidatedAfterHours,
    DerivativesOpenPosition,
    EconomicIndicatorPrice,
    InstrumentsConsolidated,
    #[serde(rename = "OTCInstrumentsConsolidated")]
    OtcInstrumentsConsolidated,
    MarginScenarioLiquidAssets,
    LendingOpenPosition,
    LoanBalance,
    PositionLimits,
}

/// Which B3 service publishes a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Service {
    WebConsolidated,
    PositionLimits,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WebConsolidated => write!(f, "WebConsolidated"),
            Self::PositionLimits => write!(f, "PositionLimits"),
        }
    }
}

/// Payload flavour of the download protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RedirectVariant {
    /// Plain CSV prefixed by a one-line file status preamble.
    WebConsolidated,
    /// Base64-encoded CSV, no preamble.
    PositionLimits,
}

impl RedirectVariant {
    pub fn has_preamble(self) -> bool {
        matches!(self, Self::WebConsolidated)
    }

    pub fn is_base64(self) -> bool {
        matches!(self, Self::PositionLimits)
    }
}

/// How a table is fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Protocol {
    /// JSON pages discovered from page 1.
    Paginated,
    /// A descriptor request followed by a single CSV payload.
    Redirect(RedirectVariant),
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paginated => write!(f, "pages"),
            Self::Redirect(_) => write!(f, "download"),
        }
    }
}

/// Caller preference for how a table should be fetched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// The table's default protocol.
    #[default]
    Auto,
    /// Force the paginated JSON API.
    Pages,
    /// Force the single-file download.
    Download,
}

impl FromStr for Backend {
    type Err = B3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "pages" | "paginated" => Ok(Self::Pages),
            "download" | "redirect" => Ok(Self::Download),
            _ => Err(B3Error::InvalidInput(format!(
                "unknown backend '{}', expected auto, pages or download",
                s
            ))),
        }
    }
}

impl Table {
    /// Every table in catalog order.
    pub const ALL: [Table; 11] = [
        Table::TradeInformationConsolidated,
        Table::OtcTradeInformationConsolidated,
        Table::TradeInformationConsolidatedAfterHours,
        Table::DerivativesOpenPosition,
        Table::EconomicIndicatorPrice,
        Table::InstrumentsConsolidated,
        Table::OtcInstrumentsConsolidated,
        Table::MarginScenarioLiquidAssets,
        Table::LendingOpenPosition,
        Table::LoanBalance,
        Table::PositionLimits,
    ];

    /// Remote identifier of the table.
    pub fn name(self) -> &'static str {
        match self {
            Self::TradeInformationConsolidated => "TradeInformationConsolidated",
            Self::OtcTradeInformationConsolidated => "OTCTradeInformationConsolidated",
            Self::TradeInformationConsolidatedAfterHours => {
                "TradeInformationConsolidatedAfterHours"
            }
            Self::DerivativesOpenPosition => "DerivativesOpenPosition",
            Self::EconomicIndicatorPrice => "EconomicIndicatorPrice",
            Self::InstrumentsConsolidated => "InstrumentsConsolidated",
            Self::OtcInstrumentsConsolidated => "OTCInstrumentsConsolidated",
            Self::MarginScenarioLiquidAssets => "MarginScenarioLiquidAssets",
            Self::LendingOpenPosition => "LendingOpenPosition",
            Self::LoanBalance => "LoanBalance",
            Self::PositionLimits => "PositionLimits",
        }
    }

    pub fn service(self) -> Service {
        match self {
            Self::PositionLimits => Service::PositionLimits,
            _ => Service::WebConsolidated,
        }
    }

    /// Protocol used when the caller has no preference.
    pub fn default_protocol(self) -> Protocol {
        match self.service() {
            Service::WebConsolidated => Protocol::Paginated,
            Service::PositionLimits => Protocol::Redirect(RedirectVariant::PositionLimits),
        }
    }

    /// Resolves a backend preference into a concrete protocol.
    pub fn protocol(self, backend: Backend) -> Result<Protocol, B3Error> {
        match (self.service(), backend) {
            (_, Backend::Auto) => Ok(self.default_protocol()),
            (Service::WebConsolidated, Backend::Pages) => Ok(Protocol::Paginated),
            (Service::WebConsolidated, Backend::Download) => {
                Ok(Protocol::Redirect(RedirectVariant::WebConsolidated))
            }
            (Service::PositionLimits, Backend::Download) => {
                Ok(Protocol::Redirect(RedirectVariant::PositionLimits))
            }
            (Service::PositionLimits, Backend::Pages) => Err(B3Error::UnsupportedBackend {
                table: self.name().to_string(),
                backend: "pages".to_string(),
            }),
        }
    }

    /// Comma separated list of every catalog name, for error messages.
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = B3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| B3Error::UnknownTable {
                table: s.to_string(),
                available: Self::available(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for table in Table::ALL {
            assert_eq!(table.name().parse::<Table>().unwrap(), table);
            assert_eq!(table.to_string(), table.name());
        }
    }

    #[test]
    fn service_display_names() {
        assert_eq!(Service::WebConsolidated.to_string(), "WebConsolidated");
        assert_eq!(Table::PositionLimits.service().to_string(), "PositionLimits");
    }

    #[test]
    fn unknown_table_lists_catalog() {
        let err = "Trades".parse::<Table>().unwrap_err();
        match err {
            B3Error::UnknownTable { table, available } => {
                assert_eq!(table, "Trades");
                assert!(available.contains("EconomicIndicatorPrice"));
                assert!(available.contains("PositionLimits"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn table_names_are_case_sensitive() {
        assert!("loanbalance".parse::<Table>().is_err());
    }

    #[test]
    fn only_position_limits_is_its_own_service() {
        let position: Vec<Table> = Table::ALL
            .iter()
            .copied()
            .filter(|t| t.service() == Service::PositionLimits)
            .collect();
        assert_eq!(position, vec![Table::PositionLimits]);
    }

    #[test]
    fn default_protocols() {
        assert_eq!(
            Table::EconomicIndicatorPrice.default_protocol(),
            Protocol::Paginated
        );
        assert_eq!(
            Table::PositionLimits.default_protocol(),
            Protocol::Redirect(RedirectVariant::PositionLimits)
        );
    }

    #[test]
    fn download_backend_on_web_consolidated() {
        assert_eq!(
            Table::LoanBalance.protocol(Backend::Download).unwrap(),
            Protocol::Redirect(RedirectVariant::WebConsolidated)
        );
    }

    #[test]
    fn pages_backend_rejected_for_position_limits() {
        let err = Table::PositionLimits.protocol(Backend::Pages).unwrap_err();
        assert!(matches!(err, B3Error::UnsupportedBackend { .. }));
    }

    #[test]
    fn backend_parsing() {
        assert_eq!("auto".parse::<Backend>().unwrap(), Backend::Auto);
        assert_eq!("Pages".parse::<Backend>().unwrap(), Backend::Pages);
        assert_eq!("download".parse::<Backend>().unwrap(), Backend::Download);
        assert!("ftp".parse::<Backend>().is_err());
    }

    #[test]
    fn variant_flags() {
        assert!(RedirectVariant::WebConsolidated.has_preamble());
        assert!(!RedirectVariant::WebConsolidated.is_base64());
        assert!(!RedirectVariant::PositionLimits.has_preamble());
        assert!(RedirectVariant::PositionLimits.is_base64());
    }
}
