//! Markdown report generation.
//!
//! This module runs the aggregation queries over a record snapshot and
//! renders the results as a Markdown or JSON report.

use crate::analysis::{
    all_clubs, avg_fee_by_league, club_top_transfers, club_transfer_stats, club_transfers_by_year,
    filter_paid, nationality_stats, position_breakdown, top_transfers, transfer_flows,
    transfers_by_league, transfers_by_year, yearly_spending, DEFAULT_CLUB_TOP_TRANSFERS,
    DEFAULT_TOP_TRANSFERS,
};
use crate::models::{
    columns, ClubReport, ClubTransferHighlight, ClubYearActivity, LeagueCount, LeagueFeeStats,
    NationalityCount, PositionCount, Report, ReportMetadata, TransferFlow, TransferHighlight,
    TransferRecord, YearCount, YearlySpend,
};
use anyhow::Result;
use chrono::Utc;

/// Knobs for report assembly.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Club to build the per-club section for, if any.
    pub club: Option<String>,
    /// Restrict the yearly spending table to one destination league.
    pub league: Option<String>,
    /// How many record transfers to list.
    pub top_limit: usize,
    /// How many club record transfers to list.
    pub club_top_limit: usize,
    /// Include the league-to-league flow section.
    pub include_flows: bool,
    /// Include the nationality section.
    pub include_nationalities: bool,
    /// Include the playing-position section.
    pub include_positions: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            club: None,
            league: None,
            top_limit: DEFAULT_TOP_TRANSFERS,
            club_top_limit: DEFAULT_CLUB_TOP_TRANSFERS,
            include_flows: true,
            include_nationalities: true,
            include_positions: true,
        }
    }
}

/// Run every query and assemble the full report.
pub fn build_report(source: &str, records: &[TransferRecord], options: &ReportOptions) -> Report {
    let metadata = ReportMetadata {
        source: source.to_string(),
        generated_at: Utc::now(),
        records_total: records.len(),
        records_paid: filter_paid(records).len(),
        clubs_total: all_clubs(records).len(),
    };

    let top = top_transfers(records, options.top_limit)
        .into_iter()
        .map(|t| TransferHighlight {
            record: t.record.clone(),
            fee: t.fee,
        })
        .collect();

    let club = options
        .club
        .as_deref()
        .map(|club| build_club_report(records, club, options.club_top_limit));

    Report {
        metadata,
        leagues: transfers_by_league(records),
        years: transfers_by_year(records),
        flows: options.include_flows.then(|| transfer_flows(records)),
        nationalities: options
            .include_nationalities
            .then(|| nationality_stats(records)),
        positions: options.include_positions.then(|| position_breakdown(records)),
        league_fees: avg_fee_by_league(records),
        spending: yearly_spending(records, options.league.as_deref()),
        top_transfers: top,
        club,
    }
}

/// Assemble the per-club section.
fn build_club_report(records: &[TransferRecord], club: &str, limit: usize) -> ClubReport {
    let top_transfers = club_top_transfers(records, club, limit)
        .into_iter()
        .map(|t| ClubTransferHighlight {
            record: t.record.clone(),
            fee: t.fee,
            direction: t.direction,
        })
        .collect();

    ClubReport {
        club: club.to_string(),
        stats: club_transfer_stats(records, club),
        by_year: club_transfers_by_year(records, club),
        top_transfers,
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Transfer Market Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_league_section(&report.leagues));
    output.push_str(&generate_year_section(&report.years));
    if let Some(ref flows) = report.flows {
        output.push_str(&generate_flow_section(flows));
    }
    if let Some(ref nationalities) = report.nationalities {
        output.push_str(&generate_nationality_section(nationalities));
    }
    if let Some(ref positions) = report.positions {
        output.push_str(&generate_position_section(positions));
    }
    output.push_str(&generate_fee_section(&report.league_fees));
    output.push_str(&generate_spending_section(&report.spending));
    output.push_str(&generate_top_transfers_section(&report.top_transfers));

    if let Some(ref club) = report.club {
        output.push_str(&generate_club_section(club));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.records_total));
    section.push_str(&format!(
        "- **Priced Transfers:** {}\n",
        metadata.records_paid
    ));
    section.push_str(&format!("- **Clubs:** {}\n", metadata.clubs_total));
    section.push('\n');

    section
}

/// Generate the transfers-by-league table.
fn generate_league_section(leagues: &[LeagueCount]) -> String {
    let mut section = String::new();

    section.push_str("## Transfers by League\n\n");

    if leagues.is_empty() {
        section.push_str("No league data available.\n\n");
        return section;
    }

    section.push_str("| League | Transfers |\n");
    section.push_str("|:---|:---:|\n");
    for league in leagues {
        section.push_str(&format!("| {} | {} |\n", league.league, league.count));
    }
    section.push('\n');

    section
}

/// Generate the transfers-by-year table.
fn generate_year_section(years: &[YearCount]) -> String {
    let mut section = String::new();

    section.push_str("## Transfers by Year\n\n");

    if years.is_empty() {
        section.push_str("No year data available.\n\n");
        return section;
    }

    section.push_str("| Year | Transfers |\n");
    section.push_str("|:---|:---:|\n");
    for year in years {
        section.push_str(&format!("| {} | {} |\n", year.year, year.count));
    }
    section.push('\n');

    section
}

/// Generate the league-to-league flow table.
fn generate_flow_section(flows: &[TransferFlow]) -> String {
    let mut section = String::new();

    section.push_str("## Transfer Flows Between Top Leagues\n\n");

    if flows.is_empty() {
        section.push_str("No transfers between the top five leagues.\n\n");
        return section;
    }

    section.push_str("| From | To | Transfers |\n");
    section.push_str("|:---|:---|:---:|\n");
    for flow in flows {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            flow.source, flow.target, flow.count
        ));
    }
    section.push('\n');

    section
}

/// Generate the nationality table.
fn generate_nationality_section(nationalities: &[NationalityCount]) -> String {
    let mut section = String::new();

    section.push_str("## Top Nationalities\n\n");

    if nationalities.is_empty() {
        section.push_str("No nationality data available.\n\n");
        return section;
    }

    section.push_str("| Nationality | Players |\n");
    section.push_str("|:---|:---:|\n");
    for nationality in nationalities {
        section.push_str(&format!(
            "| {} | {} |\n",
            nationality.nationality, nationality.count
        ));
    }
    section.push('\n');

    section
}

/// Generate the position table.
fn generate_position_section(positions: &[PositionCount]) -> String {
    let mut section = String::new();

    section.push_str("## Transfers by Position\n\n");

    if positions.is_empty() {
        section.push_str("No position data available.\n\n");
        return section;
    }

    section.push_str("| Position | Transfers |\n");
    section.push_str("|:---|:---:|\n");
    for position in positions {
        section.push_str(&format!("| {} | {} |\n", position.position, position.count));
    }
    section.push('\n');

    section
}

/// Generate the average-fee-by-league table.
fn generate_fee_section(league_fees: &[LeagueFeeStats]) -> String {
    let mut section = String::new();

    section.push_str("## Average Fee by League\n\n");

    if league_fees.is_empty() {
        section.push_str("No priced transfers available.\n\n");
        return section;
    }

    section.push_str("| League | Average Fee | Priced Transfers |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for stats in league_fees {
        section.push_str(&format!(
            "| {} | {:.2} | {} |\n",
            stats.league, stats.average, stats.count
        ));
    }
    section.push('\n');

    section
}

/// Generate the yearly spending table.
fn generate_spending_section(spending: &[YearlySpend]) -> String {
    let mut section = String::new();

    section.push_str("## Yearly Spending\n\n");

    if spending.is_empty() {
        section.push_str("No priced transfers available.\n\n");
        return section;
    }

    section.push_str("| Year | Total Spend |\n");
    section.push_str("|:---|:---:|\n");
    for spend in spending {
        section.push_str(&format!("| {} | {:.2} |\n", spend.year, spend.total));
    }
    section.push('\n');

    section
}

/// Generate the record-transfers table.
fn generate_top_transfers_section(top: &[TransferHighlight]) -> String {
    let mut section = String::new();

    section.push_str("## Record Transfers\n\n");

    if top.is_empty() {
        section.push_str("No priced transfers available.\n\n");
        return section;
    }

    section.push_str("| Year | From | To | Fee |\n");
    section.push_str("|:---|:---|:---|:---:|\n");
    for transfer in top {
        section.push_str(&format!(
            "| {} | {} | {} | {:.2} |\n",
            transfer.record.field(columns::YEAR),
            transfer.record.prev_club(),
            transfer.record.new_club(),
            transfer.fee
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-club section.
fn generate_club_section(club: &ClubReport) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Club Focus: {}\n\n", club.club));

    let stats = &club.stats;
    section.push_str(&format!(
        "- **Total Transfers:** {} ({} in, {} out)\n",
        stats.total_transfers, stats.incoming, stats.outgoing
    ));
    section.push_str(&format!(
        "- **Spent:** {:.2} across {} priced signings\n",
        stats.total_spent, stats.incoming_paid
    ));
    section.push_str(&format!(
        "- **Received:** {:.2} across {} priced sales\n",
        stats.total_received, stats.outgoing_paid
    ));
    section.push_str(&format!("- **Net Spend:** {:.2}\n\n", stats.net_spend));

    section.push_str(&generate_club_year_table(&club.by_year));
    section.push_str(&generate_club_top_table(&club.top_transfers));

    section
}

fn generate_club_year_table(by_year: &[ClubYearActivity]) -> String {
    if by_year.is_empty() {
        return String::new();
    }

    let mut table = String::new();
    table.push_str("### Activity by Year\n\n");
    table.push_str("| Year | In | Out |\n");
    table.push_str("|:---|:---:|:---:|\n");
    for activity in by_year {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            activity.year, activity.incoming, activity.outgoing
        ));
    }
    table.push('\n');

    table
}

fn generate_club_top_table(top: &[ClubTransferHighlight]) -> String {
    if top.is_empty() {
        return String::new();
    }

    let mut table = String::new();
    table.push_str("### Record Club Transfers\n\n");
    table.push_str("| Direction | Year | From | To | Fee |\n");
    table.push_str("|:---|:---|:---|:---|:---:|\n");
    for transfer in top {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {:.2} |\n",
            transfer.direction,
            transfer.record.field(columns::YEAR),
            transfer.record.prev_club(),
            transfer.record.new_club(),
            transfer.fee
        ));
    }
    table.push('\n');

    table
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by TransferLens*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
