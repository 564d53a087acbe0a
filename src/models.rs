//! Data models for the transfer analytics engine.
//!
//! This module contains the core record type produced by the parser and
//! the result-row types returned by the aggregation queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Column names the queries rely on. Any other column in the source file
/// is carried through the record untouched.
pub mod columns {
    pub const YEAR: &str = "Year";
    pub const TRANSFER_TYPE: &str = "Transfer_type";
    pub const PRICE_NUMERIC: &str = "Price_numeric";
    pub const PREV_CLUB_LEAGUE: &str = "Previous_club_league";
    pub const NEW_CLUB_LEAGUE: &str = "New_club_league";
    pub const PREV_CLUB: &str = "Prev_club";
    pub const NEW_CLUB: &str = "New_club";
    pub const NATIONALITY: &str = "Nationality";
    pub const PLAYER_POSITION: &str = "Player_position";
}

/// `Transfer_type` value marking a paid transfer.
pub const PAID_TRANSFER_TYPE: &str = "fee";

/// Literal text the upstream export writes for absent values.
pub const NAN_SENTINEL: &str = "nan";

/// Previous-club values that denote "no club".
pub const FREE_AGENT: &str = "Free agent";
pub const UNATTACHED: &str = "Unattached";

/// One parsed transfer row: a mapping from column name to raw string value.
///
/// Fields are not type-coerced at parse time; the `fee()` and `year()`
/// helpers below are the single place numeric coercion happens, so every
/// query applies the same exclusion policy for unparsable values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransferRecord {
    fields: HashMap<String, String>,
}

impl TransferRecord {
    /// Build a record by zipping header columns with row values.
    /// Caller guarantees both slices have equal length.
    pub fn from_header(header: &[String], values: Vec<String>) -> Self {
        let fields = header.iter().cloned().zip(values).collect();
        Self { fields }
    }

    /// Raw value for a column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Raw value for a column, empty string when absent.
    pub fn field(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// Number of columns this record carries.
    pub fn column_count(&self) -> usize {
        self.fields.len()
    }

    pub fn transfer_type(&self) -> &str {
        self.field(columns::TRANSFER_TYPE)
    }

    pub fn prev_club(&self) -> &str {
        self.field(columns::PREV_CLUB)
    }

    pub fn new_club(&self) -> &str {
        self.field(columns::NEW_CLUB)
    }

    pub fn prev_club_league(&self) -> &str {
        self.field(columns::PREV_CLUB_LEAGUE)
    }

    pub fn new_club_league(&self) -> &str {
        self.field(columns::NEW_CLUB_LEAGUE)
    }

    pub fn nationality(&self) -> &str {
        self.field(columns::NATIONALITY)
    }

    pub fn position(&self) -> &str {
        self.field(columns::PLAYER_POSITION)
    }

    /// The transfer fee, present only for priced transfers.
    ///
    /// A record is priced when `Transfer_type` is `"fee"` and
    /// `Price_numeric` is non-empty and parses to a finite float.
    /// Anything else yields `None`; unpriced records are excluded from
    /// priced aggregates rather than counted as zero.
    pub fn fee(&self) -> Option<f64> {
        if self.transfer_type() != PAID_TRANSFER_TYPE {
            return None;
        }
        let raw = self.field(columns::PRICE_NUMERIC);
        if raw.is_empty() {
            return None;
        }
        raw.parse::<f64>().ok().filter(|fee| fee.is_finite())
    }

    /// The transfer year, `None` when blank or unparsable.
    pub fn year(&self) -> Option<i32> {
        self.field(columns::YEAR).parse::<i32>().ok()
    }

    /// Whether the record satisfies the priced-transfer policy.
    pub fn is_paid(&self) -> bool {
        self.fee().is_some()
    }

    /// Whether the club appears on either side of the transfer.
    pub fn involves(&self, club: &str) -> bool {
        self.prev_club() == club || self.new_club() == club
    }
}

/// Direction of a club transfer relative to the club being queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The club is the destination.
    In,
    /// The club is the origin.
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// Transfer count for one league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueCount {
    pub league: String,
    pub count: usize,
}

/// Transfer count for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Directed transfer flow between two top-tier leagues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFlow {
    pub source: String,
    pub target: String,
    pub count: usize,
}

/// Transfer count for one nationality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalityCount {
    pub nationality: String,
    pub count: usize,
}

/// Transfer count for one playing position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionCount {
    pub position: String,
    pub count: usize,
}

/// Average fee paid by clubs of one league, with the priced-transfer count
/// the average is taken over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueFeeStats {
    pub league: String,
    pub average: f64,
    pub count: usize,
}

/// Total spend for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySpend {
    pub year: i32,
    pub total: f64,
}

/// A priced transfer paired with its parsed fee.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedTransfer<'a> {
    pub record: &'a TransferRecord,
    pub fee: f64,
}

/// A priced club transfer tagged with its direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClubTransfer<'a> {
    pub record: &'a TransferRecord,
    pub fee: f64,
    pub direction: Direction,
}

/// Aggregate transfer statistics for a single club.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubTransferStats {
    /// Incoming plus outgoing transfers.
    pub total_transfers: usize,
    /// Transfers where the club is the destination.
    pub incoming: usize,
    /// Transfers where the club is the origin.
    pub outgoing: usize,
    /// Sum of priced incoming fees.
    pub total_spent: f64,
    /// Sum of priced outgoing fees.
    pub total_received: f64,
    /// `total_spent - total_received`.
    pub net_spend: f64,
    /// Priced incoming transfers.
    pub incoming_paid: usize,
    /// Priced outgoing transfers.
    pub outgoing_paid: usize,
}

/// Per-year incoming/outgoing activity for a single club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubYearActivity {
    pub year: i32,
    pub incoming: usize,
    pub outgoing: usize,
}

/// A record-transfer row as it appears in a report, with the source row's
/// columns flattened alongside the parsed fee.
#[derive(Debug, Clone, Serialize)]
pub struct TransferHighlight {
    #[serde(flatten)]
    pub record: TransferRecord,
    pub fee: f64,
}

/// A club's record transfer, tagged with its direction.
#[derive(Debug, Clone, Serialize)]
pub struct ClubTransferHighlight {
    #[serde(flatten)]
    pub record: TransferRecord,
    pub fee: f64,
    pub direction: Direction,
}

/// Per-club section of a report.
#[derive(Debug, Clone, Serialize)]
pub struct ClubReport {
    pub club: String,
    pub stats: ClubTransferStats,
    pub by_year: Vec<ClubYearActivity>,
    pub top_transfers: Vec<ClubTransferHighlight>,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path or URL the raw data was loaded from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records parsed from the source.
    pub records_total: usize,
    /// Number of records satisfying the priced-transfer policy.
    pub records_paid: usize,
    /// Number of distinct clubs across both sides.
    pub clubs_total: usize,
}

/// The complete transfer market report. The flow, nationality, and
/// position sections can be switched off in the report configuration;
/// a disabled section is `None`, never an empty table.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub leagues: Vec<LeagueCount>,
    pub years: Vec<YearCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flows: Option<Vec<TransferFlow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationalities: Option<Vec<NationalityCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<PositionCount>>,
    pub league_fees: Vec<LeagueFeeStats>,
    pub spending: Vec<YearlySpend>,
    pub top_transfers: Vec<TransferHighlight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club: Option<ClubReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> TransferRecord {
        let header: Vec<String> = pairs.iter().map(|(k, _)| k.to_string()).collect();
        let values: Vec<String> = pairs.iter().map(|(_, v)| v.to_string()).collect();
        TransferRecord::from_header(&header, values)
    }

    #[test]
    fn test_field_access() {
        let r = record(&[("Year", "2020"), ("New_club", "Arsenal")]);
        assert_eq!(r.get("Year"), Some("2020"));
        assert_eq!(r.get("Missing"), None);
        assert_eq!(r.field("Missing"), "");
        assert_eq!(r.new_club(), "Arsenal");
    }

    #[test]
    fn test_fee_requires_fee_transfer_type() {
        let paid = record(&[("Transfer_type", "fee"), ("Price_numeric", "50.5")]);
        assert_eq!(paid.fee(), Some(50.5));

        let loan = record(&[("Transfer_type", "loan"), ("Price_numeric", "50.5")]);
        assert_eq!(loan.fee(), None);
    }

    #[test]
    fn test_fee_rejects_unparsable_prices() {
        let blank = record(&[("Transfer_type", "fee"), ("Price_numeric", "")]);
        assert_eq!(blank.fee(), None);

        let garbage = record(&[("Transfer_type", "fee"), ("Price_numeric", "undisclosed")]);
        assert_eq!(garbage.fee(), None);

        let infinite = record(&[("Transfer_type", "fee"), ("Price_numeric", "inf")]);
        assert_eq!(infinite.fee(), None);
    }

    #[test]
    fn test_year_parsing() {
        assert_eq!(record(&[("Year", "2021")]).year(), Some(2021));
        assert_eq!(record(&[("Year", "")]).year(), None);
        assert_eq!(record(&[("Year", "unknown")]).year(), None);
    }

    #[test]
    fn test_involves_either_side() {
        let r = record(&[("Prev_club", "Ajax"), ("New_club", "Chelsea")]);
        assert!(r.involves("Ajax"));
        assert!(r.involves("Chelsea"));
        assert!(!r.involves("Porto"));
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::In.to_string(), "in");
        assert_eq!(Direction::Out.to_string(), "out");
    }
}
