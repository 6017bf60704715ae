//! Per-table column types and date columns.
//!
//! The registry is built once on first use and never changes afterwards.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::catalog::Table;

/// Semantic type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Float,
    Integer,
    Bool,
    Date,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Bool => "bool",
            Self::Date => "date",
        }
    }
}

/// Declared columns of one table.
#[derive(Debug, Default)]
pub struct Schema {
    columns: &'static [(&'static str, ColumnType)],
    date_columns: &'static [&'static str],
}

impl Schema {
    /// Declared columns in order, with date columns reported as `Date`.
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, ColumnType)> + '_ {
        self.columns
            .iter()
            .map(|(name, _)| (*name, self.column_type(name)))
    }

    pub fn date_columns(&self) -> &'static [&'static str] {
        self.date_columns
    }

    pub fn is_date(&self, column: &str) -> bool {
        self.date_columns.iter().any(|d| *d == column)
    }

    /// Type of `column`. Undeclared columns are read as text.
    pub fn column_type(&self, column: &str) -> ColumnType {
        if self.is_date(column) {
            return ColumnType::Date;
        }
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, ty)| *ty)
            .unwrap_or(ColumnType::Text)
    }

    /// Types for a header row, in header order.
    pub fn types_for(&self, headers: &[String]) -> Vec<ColumnType> {
        headers.iter().map(|h| self.column_type(h)).collect()
    }
}

/// Immutable table → schema map.
pub struct SchemaRegistry {
    schemas: HashMap<Table, Schema>,
    fallback: Schema,
}

static REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::build);

/// The process-wide schema registry.
pub fn registry() -> &'static SchemaRegistry {
    &REGISTRY
}

impl SchemaRegistry {
    fn build() -> Self {
        let schemas = Table::ALL
            .iter()
            .map(|&table| {
                let (columns, date_columns) = definition(table);
                (
                    table,
                    Schema {
                        columns,
                        date_columns,
                    },
                )
            })
            .collect();
        Self {
            schemas,
            fallback: Schema::default(),
        }
    }

    pub fn schema(&self, table: Table) -> &Schema {
        self.schemas.get(&table).unwrap_or(&self.fallback)
    }
}

type Definition = (&'static [(&'static str, ColumnType)], &'static [&'static str]);

fn definition(table: Table) -> Definition {
    match table {
        Table::TradeInformationConsolidated => (
            TRADE_INFORMATION_CONSOLIDATED,
            TRADE_INFORMATION_CONSOLIDATED_DATES,
        ),
        Table::OtcTradeInformationConsolidated => (
            OTC_TRADE_INFORMATION_CONSOLIDATED,
            OTC_TRADE_INFORMATION_CONSOLIDATED_DATES,
        ),
        Table::TradeInformationConsolidatedAfterHours => (
            TRADE_INFORMATION_CONSOLIDATED_AFTER_HOURS,
            TRADE_INFORMATION_CONSOLIDATED_AFTER_HOURS_DATES,
        ),
        Table::DerivativesOpenPosition => {
            (DERIVATIVES_OPEN_POSITION, DERIVATIVES_OPEN_POSITION_DATES)
        }
        Table::EconomicIndicatorPrice => (ECONOMIC_INDICATOR_PRICE, ECONOMIC_INDICATOR_PRICE_DATES),
        Table::InstrumentsConsolidated => (INSTRUMENTS_CONSOLIDATED, INSTRUMENTS_CONSOLIDATED_DATES),
        Table::OtcInstrumentsConsolidated => (
            OTC_INSTRUMENTS_CONSOLIDATED,
            OTC_INSTRUMENTS_CONSOLIDATED_DATES,
        ),
        Table::MarginScenarioLiquidAssets => (
            MARGIN_SCENARIO_LIQUID_ASSETS,
            MARGIN_SCENARIO_LIQUID_ASSETS_DATES,
        ),
        Table::LendingOpenPosition => (LENDING_OPEN_POSITION, LENDING_OPEN_POSITION_DATES),
        Table::LoanBalance => (LOAN_BALANCE, LOAN_BALANCE_DATES),
        Table::PositionLimits => (POSITION_LIMITS, POSITION_LIMITS_DATES),
    }
}

use self::ColumnType::{Bool, Float, Integer, Text};

const TRADE_INFORMATION_CONSOLIDATED: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("TckrSymb", Text),
    ("ISIN", Text),
    ("SgmtNm", Text),
    ("MinPric", Float),
    ("MaxPric", Float),
    ("TradAvrgPric", Float),
    ("LastPric", Float),
    ("OscnPctg", Float),
    ("AdjstdQt", Float),
    ("AdjstdQtTax", Float),
    ("RefPric", Float),
    ("TradQty", Float),
    ("FinInstrmQty", Float),
    ("NtlFinVol", Float),
];
const TRADE_INFORMATION_CONSOLIDATED_DATES: &[&str] = &["RptDt"];

const OTC_TRADE_INFORMATION_CONSOLIDATED: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("TckrSymb", Text),
    ("ISIN", Text),
    ("MinPric", Float),
    ("MaxPric", Float),
    ("TradAvrgPric", Float),
    ("LastPric", Float),
    ("AdjstdQt", Float),
    ("RefPric", Float),
    ("TradQty", Integer),
    ("FinInstrmQty", Float),
    ("NtlFinVol", Float),
    ("OprnClssfctnTpCd", Text),
    ("OprnClssfctnTpNm", Text),
];
const OTC_TRADE_INFORMATION_CONSOLIDATED_DATES: &[&str] = &["RptDt"];

const TRADE_INFORMATION_CONSOLIDATED_AFTER_HOURS: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("TckrSymb", Text),
    ("ISIN", Text),
    ("SgmtNm", Text),
    ("MinPric", Float),
    ("MaxPric", Float),
    ("TradAvrgPric", Float),
    ("LastPric", Float),
    ("OscnPctg", Float),
    ("AdjstdQt", Float),
    ("AdjstdQtTax", Float),
    ("RefPric", Float),
    ("TradQty", Float),
    ("FinInstrmQty", Float),
    ("NtlFinVol", Float),
];
const TRADE_INFORMATION_CONSOLIDATED_AFTER_HOURS_DATES: &[&str] = &["RptDt"];

const DERIVATIVES_OPEN_POSITION: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("TckrSymb", Text),
    ("ISIN", Text),
    ("Asst", Text),
    ("XprtnCd", Text),
    ("SgmtNm", Text),
    ("OpnIntrst", Float),
    ("VartnOpnIntrst", Float),
    ("DstrbtnId", Float),
    ("CvrdQty", Float),
    ("TtlBlckdPos", Float),
    ("UcvrdQty", Float),
    ("TtlPos", Float),
    ("BrrwrQty", Float),
    ("LndrQty", Float),
    ("CurQty", Float),
    ("FwdPric", Float),
];
const DERIVATIVES_OPEN_POSITION_DATES: &[&str] = &["RptDt"];

const ECONOMIC_INDICATOR_PRICE: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("Asst", Text),
    ("TckrSymb", Text),
    ("EcncIndDesc", Text),
    ("PricVal", Float),
];
const ECONOMIC_INDICATOR_PRICE_DATES: &[&str] = &["RptDt"];

const INSTRUMENTS_CONSOLIDATED: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("TckrSymb", Text),
    ("Asst", Text),
    ("AsstDesc", Text),
    ("SgmtNm", Text),
    ("MktNm", Text),
    ("SctyCtgyNm", Text),
    ("XprtnDt", Text),
    ("XprtnCd", Text),
    ("TradgStartDt", Text),
    ("TradgEndDt", Text),
    ("BaseCd", Float),
    ("ConvsCritNm", Text),
    ("MtrtyDtTrgtPt", Float),
    ("ReqrdConvsInd", Text),
    ("ISIN", Text),
    ("CFICd", Text),
    ("DlvryNtceStartDt", Text),
    ("DlvryNtceEndDt", Text),
    ("OptnTp", Text),
    ("CtrctMltplr", Float),
    ("AsstQtnQty", Float),
    ("AllcnRndLot", Float),
    ("TradgCcy", Text),
    ("DlvryTpNm", Text),
    ("WdrwlDays", Float),
    ("WrkgDays", Float),
    ("ClnrDays", Float),
    ("RlvrBasePricNm", Text),
    ("OpngFutrPosDay", Float),
    ("SdTpCd1", Text),
    ("UndrlygTckrSymb1", Text),
    ("SdTpCd2", Text),
    ("UndrlygTckrSymb2", Text),
    ("PureGoldWght", Float),
    ("ExrcPric", Float),
    ("OptnStyle", Text),
    ("ValTpNm", Text),
    ("PrmUpfrntInd", Text),
    ("OpngPosLmtDt", Text),
    ("DstrbtnId", Float),
    ("PricFctr", Float),
    ("DaysToSttlm", Float),
    ("SrsTpNm", Text),
    ("PrtcnFlg", Text),
    ("AutomtcExrcInd", Text),
    ("SpcfctnCd", Text),
    ("CrpnNm", Text),
    ("CorpActnStartDt", Text),
    ("CtdyTrtmntTpNm", Text),
    ("MktCptlstn", Float),
    ("CorpGovnLvlNm", Text),
];
const INSTRUMENTS_CONSOLIDATED_DATES: &[&str] = &[
    "RptDt",
    "XprtnDt",
    "TradgStartDt",
    "TradgEndDt",
    "DlvryNtceStartDt",
    "DlvryNtceEndDt",
    "OpngPosLmtDt",
    "CorpActnStartDt",
];

const OTC_INSTRUMENTS_CONSOLIDATED: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("CrpnCd", Text),
    ("TckrSymb", Text),
    ("ISIN", Text),
    ("CrpnNm", Text),
    ("OTCSgmtNm", Text),
    ("MktNm", Text),
    ("Law12431SpprtInd", Bool),
    ("SrsIdCd", Text),
    ("IsseNb", Integer),
    ("InstrmRmnrtnTp", Text),
    ("IntrstParamsPctg", Float),
    ("IntrstPctgRate", Float),
    ("BaseIntrstRate", Float),
    ("XprtnDt", Text),
    ("IssdQty", Float),
    ("IsseUnitPric", Float),
    ("EmssnRstrctdWorkInd", Bool),
];
const OTC_INSTRUMENTS_CONSOLIDATED_DATES: &[&str] = &["RptDt", "XprtnDt"];

const MARGIN_SCENARIO_LIQUID_ASSETS: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("PRFNm", Text),
    ("VrtxCd", Integer),
    ("ScnroId", Integer),
    ("PRFVal", Float),
    ("TpShck", Text),
];
const MARGIN_SCENARIO_LIQUID_ASSETS_DATES: &[&str] = &["RptDt"];

const LENDING_OPEN_POSITION: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("TckrSymb", Text),
    ("ISIN", Text),
    ("Asst", Text),
    ("BalQty", Integer),
    ("TradAvrgPric", Float),
    ("PricFctr", Integer),
    ("BalVal", Float),
];
const LENDING_OPEN_POSITION_DATES: &[&str] = &["RptDt"];

const LOAN_BALANCE: &[(&str, ColumnType)] = &[
    ("RptDt", Text),
    ("TckrSymb", Text),
    ("ISIN", Text),
    ("Asst", Text),
    ("QtyCtrctsDay", Integer),
    ("QtyShrDay", Integer),
    ("ValCtrctsDay", Float),
    ("DnrMinRate", Text),
    ("DnrAvrgRate", Text),
    ("DnrMaxRate", Text),
    ("TakrMinRate", Text),
    ("TakrAvrgRate", Text),
    ("TakrMaxRate", Text),
    ("MktNm", Text),
];
const LOAN_BALANCE_DATES: &[&str] = &["RptDt"];

const POSITION_LIMITS: &[(&str, ColumnType)] = &[
    ("PosLmtTpCd", Text),
    ("TickerSymbol", Text),
    ("XprtnDt", Text),
    ("PosLmtDesc", Text),
    ("AggrLvlCd", Text),
    ("L1LmtQty", Integer),
    ("L2LmtQty", Integer),
    ("FreeFloatQty", Text),
];
const POSITION_LIMITS_DATES: &[&str] = &["XprtnDt"];
