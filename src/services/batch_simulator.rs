//! Batch simulation of many tickets against the draw corpus
//!
//! Every (ticket, draw) pair is evaluated. Tier counts accumulate over all
//! pairs, while each ticket also remembers its single best tier.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::services::prize_rules::{evaluate_tier, tier_name, LotteryKind, NO_PRIZE};
use crate::services::ticket::{DrawNumbers, Ticket};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResult {
    pub ticket_index: usize,
    /// Best tier over all draws, 0 when the ticket never won
    pub highest_level: u8,
    pub level_counts: BTreeMap<u8, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStat {
    pub count: u64,
    pub name: String,
    /// Payout per hit in yuan
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total_tickets: usize,
    pub total_issues_checked: usize,
    pub winning_tickets: usize,
    pub level_stats: BTreeMap<u8, TierStat>,
    pub total_prize: i64,
    pub total_cost: i64,
    /// Total prize over total cost, in percent
    pub return_rate: f64,
    /// Winning tickets over all tickets, in percent
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub results: Vec<TicketResult>,
    pub summary: BatchSummary,
}

pub fn simulate_batch(kind: LotteryKind, tickets: &[Ticket], draws: &[DrawNumbers]) -> BatchReport {
    let mut level_stats: BTreeMap<u8, TierStat> = kind
        .rules()
        .iter()
        .map(|rule| {
            (
                rule.tier,
                TierStat {
                    count: 0,
                    name: tier_name(rule.tier).to_string(),
                    amount: rule.amount,
                },
            )
        })
        .collect();

    let mut results = Vec::with_capacity(tickets.len());
    let mut winning_tickets = 0;

    for (ticket_index, ticket) in tickets.iter().enumerate() {
        let mut level_counts: BTreeMap<u8, u64> = BTreeMap::new();
        let mut highest_level = NO_PRIZE;

        for draw in draws {
            let tier = evaluate_tier(kind, ticket, draw);
            if tier == NO_PRIZE {
                continue;
            }

            *level_counts.entry(tier).or_insert(0) += 1;
            if let Some(stat) = level_stats.get_mut(&tier) {
                stat.count += 1;
            }

            if highest_level == NO_PRIZE || tier < highest_level {
                highest_level = tier;
            }
        }

        if highest_level != NO_PRIZE {
            winning_tickets += 1;
        }

        results.push(TicketResult {
            ticket_index,
            highest_level,
            level_counts,
        });
    }

    let total_prize: i64 = level_stats
        .values()
        .map(|stat| stat.count as i64 * stat.amount)
        .sum();
    let total_cost = tickets.len() as i64 * kind.unit_price();

    let return_rate = if total_cost > 0 {
        total_prize as f64 / total_cost as f64 * 100.0
    } else {
        0.0
    };
    let win_rate = if tickets.is_empty() {
        0.0
    } else {
        winning_tickets as f64 / tickets.len() as f64 * 100.0
    };

    tracing::debug!(
        "Simulated {} tickets against {} draws: {} winning, prize {} / cost {}",
        tickets.len(),
        draws.len(),
        winning_tickets,
        total_prize,
        total_cost
    );

    BatchReport {
        results,
        summary: BatchSummary {
            total_tickets: tickets.len(),
            total_issues_checked: draws.len(),
            winning_tickets,
            level_stats,
            total_prize,
            total_cost,
            return_rate,
            win_rate,
        },
    }
}
