//! Query functions over an immutable record snapshot.
//!
//! Every function here is a pure pass over the record slice: none
//! mutates input, so queries compose and can be re-run in any order
//! without re-parsing. On an empty slice each query returns its
//! empty/zero result.

use crate::models::{
    ClubTransfer, ClubTransferStats, ClubYearActivity, Direction, LeagueCount, LeagueFeeStats,
    NationalityCount, PositionCount, PricedTransfer, TransferFlow, TransferRecord, YearCount,
    YearlySpend, FREE_AGENT, NAN_SENTINEL, UNATTACHED,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The fixed set of recognized top-tier leagues. Flow analysis is
/// restricted to transfers between these.
pub const TOP_LEAGUES: [&str; 5] = [
    "Premier League",
    "La Liga",
    "Bundesliga",
    "Serie A",
    "Ligue 1",
];

/// Bucket for records with no destination league.
pub const UNKNOWN_LEAGUE: &str = "Unknown";

/// Default cutoff for [`top_transfers`].
pub const DEFAULT_TOP_TRANSFERS: usize = 20;

/// Default cutoff for [`club_top_transfers`].
pub const DEFAULT_CLUB_TOP_TRANSFERS: usize = 10;

/// Nationality rankings are capped at this many entries.
const NATIONALITY_LIMIT: usize = 15;

/// The top-tier league reference list.
pub fn top_leagues() -> &'static [&'static str] {
    &TOP_LEAGUES
}

/// Whether a categorical value is real data. The upstream export writes
/// the literal text "nan" for absent nationalities and positions.
fn present(value: &str) -> bool {
    !value.is_empty() && value != NAN_SENTINEL
}

/// Count records per key. Records for which the key function returns
/// `None` are excluded; each query encodes its own missing-value policy
/// in its key function, keeping the reduction itself uniform.
fn count_by<K, F>(records: &[TransferRecord], key: F) -> HashMap<K, usize>
where
    K: Eq + std::hash::Hash,
    F: Fn(&TransferRecord) -> Option<K>,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts
}

/// The priced subset: records with `Transfer_type == "fee"` and a
/// parseable price. Order-preserving.
pub fn filter_paid(records: &[TransferRecord]) -> Vec<&TransferRecord> {
    records.iter().filter(|record| record.is_paid()).collect()
}

/// Transfer counts per destination league, most active first.
/// Records without a destination league land in the "Unknown" bucket.
pub fn transfers_by_league(records: &[TransferRecord]) -> Vec<LeagueCount> {
    let counts = count_by(records, |record| {
        let league = record.new_club_league();
        if league.is_empty() {
            Some(UNKNOWN_LEAGUE.to_string())
        } else {
            Some(league.to_string())
        }
    });

    let mut leagues: Vec<LeagueCount> = counts
        .into_iter()
        .map(|(league, count)| LeagueCount { league, count })
        .collect();
    leagues.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.league.cmp(&b.league)));
    leagues
}

/// Transfer counts per year, earliest first. Records with a blank or
/// unparsable year are excluded.
pub fn transfers_by_year(records: &[TransferRecord]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for record in records {
        if let Some(year) = record.year() {
            *counts.entry(year).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// The `limit` most expensive priced transfers, fee descending.
/// Ties keep their encounter order.
pub fn top_transfers(records: &[TransferRecord], limit: usize) -> Vec<PricedTransfer<'_>> {
    let mut priced: Vec<PricedTransfer<'_>> = records
        .iter()
        .filter_map(|record| record.fee().map(|fee| PricedTransfer { record, fee }))
        .collect();

    priced.sort_by(|a, b| b.fee.partial_cmp(&a.fee).unwrap_or(Ordering::Equal));
    priced.truncate(limit);
    priced
}

/// Directed transfer counts between top-tier leagues, busiest first.
/// Only pairs where both source and target are in [`TOP_LEAGUES`]
/// contribute; the flow key is the ordered pair, not symmetric.
pub fn transfer_flows(records: &[TransferRecord]) -> Vec<TransferFlow> {
    let counts = count_by(records, |record| {
        let source = record.prev_club_league();
        let target = record.new_club_league();
        if TOP_LEAGUES.contains(&source) && TOP_LEAGUES.contains(&target) {
            Some((source.to_string(), target.to_string()))
        } else {
            None
        }
    });

    let mut flows: Vec<TransferFlow> = counts
        .into_iter()
        .map(|((source, target), count)| TransferFlow {
            source,
            target,
            count,
        })
        .collect();
    flows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.target.cmp(&b.target))
    });
    flows
}

/// The 15 most common nationalities, count descending.
/// Empty and "nan" values are excluded.
pub fn nationality_stats(records: &[TransferRecord]) -> Vec<NationalityCount> {
    let counts = count_by(records, |record| {
        let nationality = record.nationality();
        present(nationality).then(|| nationality.to_string())
    });

    let mut nationalities: Vec<NationalityCount> = counts
        .into_iter()
        .map(|(nationality, count)| NationalityCount { nationality, count })
        .collect();
    nationalities.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.nationality.cmp(&b.nationality))
    });
    nationalities.truncate(NATIONALITY_LIMIT);
    nationalities
}

/// Transfer counts per playing position, count descending.
/// Empty and "nan" values are excluded.
pub fn position_breakdown(records: &[TransferRecord]) -> Vec<PositionCount> {
    let counts = count_by(records, |record| {
        let position = record.position();
        present(position).then(|| position.to_string())
    });

    let mut positions: Vec<PositionCount> = counts
        .into_iter()
        .map(|(position, count)| PositionCount { position, count })
        .collect();
    positions.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.position.cmp(&b.position))
    });
    positions
}

/// Average fee per destination league over the priced subset,
/// highest average first.
pub fn avg_fee_by_league(records: &[TransferRecord]) -> Vec<LeagueFeeStats> {
    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();
    for record in filter_paid(records) {
        if let Some(fee) = record.fee() {
            let entry = sums
                .entry(record.new_club_league().to_string())
                .or_insert((0.0, 0));
            entry.0 += fee;
            entry.1 += 1;
        }
    }

    let mut stats: Vec<LeagueFeeStats> = sums
        .into_iter()
        .map(|(league, (sum, count))| LeagueFeeStats {
            league,
            average: sum / count as f64,
            count,
        })
        .collect();
    stats.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.league.cmp(&b.league))
    });
    stats
}

/// Total priced spend per year, earliest first. When a league is given,
/// only transfers into that league are summed.
pub fn yearly_spending(records: &[TransferRecord], league: Option<&str>) -> Vec<YearlySpend> {
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for record in filter_paid(records) {
        if let Some(league) = league {
            if record.new_club_league() != league {
                continue;
            }
        }
        if let (Some(year), Some(fee)) = (record.year(), record.fee()) {
            *totals.entry(year).or_insert(0.0) += fee;
        }
    }

    totals
        .into_iter()
        .map(|(year, total)| YearlySpend { year, total })
        .collect()
}

/// Sorted distinct club names across both sides of every transfer.
/// "Free agent" and "Unattached" are not clubs on the previous side;
/// "Unattached" is not a club on the new side.
pub fn all_clubs(records: &[TransferRecord]) -> Vec<String> {
    let mut clubs: BTreeSet<String> = BTreeSet::new();
    for record in records {
        let prev = record.prev_club();
        if !prev.is_empty() && prev != FREE_AGENT && prev != UNATTACHED {
            clubs.insert(prev.to_string());
        }
        let new = record.new_club();
        if !new.is_empty() && new != UNATTACHED {
            clubs.insert(new.to_string());
        }
    }
    clubs.into_iter().collect()
}

/// All transfers where the club is on either side, in record order.
pub fn club_transfers<'a>(records: &'a [TransferRecord], club: &str) -> Vec<&'a TransferRecord> {
    records.iter().filter(|record| record.involves(club)).collect()
}

/// Transfers into the club.
pub fn club_incoming<'a>(records: &'a [TransferRecord], club: &str) -> Vec<&'a TransferRecord> {
    records.iter().filter(|record| record.new_club() == club).collect()
}

/// Transfers out of the club.
pub fn club_outgoing<'a>(records: &'a [TransferRecord], club: &str) -> Vec<&'a TransferRecord> {
    records.iter().filter(|record| record.prev_club() == club).collect()
}

/// Aggregate transfer statistics for one club. Unpriced transfers count
/// toward the totals but contribute nothing to the money sums and are
/// excluded from the priced counts.
pub fn club_transfer_stats(records: &[TransferRecord], club: &str) -> ClubTransferStats {
    let mut stats = ClubTransferStats::default();

    for record in records {
        let fee = record.fee();

        if record.new_club() == club {
            stats.incoming += 1;
            if let Some(fee) = fee {
                stats.total_spent += fee;
                stats.incoming_paid += 1;
            }
        }
        if record.prev_club() == club {
            stats.outgoing += 1;
            if let Some(fee) = fee {
                stats.total_received += fee;
                stats.outgoing_paid += 1;
            }
        }
    }

    stats.total_transfers = stats.incoming + stats.outgoing;
    stats.net_spend = stats.total_spent - stats.total_received;
    stats
}

/// Per-year incoming/outgoing counts for one club, earliest year first.
/// A single record increments both sides only when the club appears as
/// both previous and new club.
pub fn club_transfers_by_year(records: &[TransferRecord], club: &str) -> Vec<ClubYearActivity> {
    let mut by_year: BTreeMap<i32, (usize, usize)> = BTreeMap::new();

    for record in club_transfers(records, club) {
        if let Some(year) = record.year() {
            let entry = by_year.entry(year).or_insert((0, 0));
            if record.new_club() == club {
                entry.0 += 1;
            }
            if record.prev_club() == club {
                entry.1 += 1;
            }
        }
    }

    by_year
        .into_iter()
        .map(|(year, (incoming, outgoing))| ClubYearActivity {
            year,
            incoming,
            outgoing,
        })
        .collect()
}

/// The club's `limit` most expensive priced transfers, fee descending,
/// each tagged "in" when the club is the destination and "out" otherwise.
pub fn club_top_transfers<'a>(
    records: &'a [TransferRecord],
    club: &str,
    limit: usize,
) -> Vec<ClubTransfer<'a>> {
    let mut priced: Vec<ClubTransfer<'a>> = club_transfers(records, club)
        .into_iter()
        .filter_map(|record| {
            record.fee().map(|fee| ClubTransfer {
                record,
                fee,
                direction: if record.new_club() == club {
                    Direction::In
                } else {
                    Direction::Out
                },
            })
        })
        .collect();

    priced.sort_by(|a, b| b.fee.partial_cmp(&a.fee).unwrap_or(Ordering::Equal));
    priced.truncate(limit);
    priced
}
