//! Prize tier rules
//!
//! Each game has a flat decision table: an ordered list of tiers, each
//! listing the (front matches, back matches) pairs that award it. The
//! first matching row wins, so tables are written best tier first.
//! Tier 0 means no prize.

use serde::{Deserialize, Serialize};

use crate::services::ticket::{DrawNumbers, Ticket};

pub const NO_PRIZE: u8 = 0;

/// Games with evaluable prize rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotteryKind {
    /// 大乐透: 5 of 1-35 + 2 of 1-12
    Daletu,
    /// 双色球: 6 of 1-33 + 1 of 1-16
    Shuangseqiu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub main_count: usize,
    pub main_min: u8,
    pub main_max: u8,
    pub extra_count: usize,
    pub extra_min: u8,
    pub extra_max: u8,
}

/// One row of a decision table
#[derive(Debug, Clone, Copy)]
pub struct TierRule {
    pub tier: u8,
    pub matches: &'static [(usize, usize)],
    /// Payout per winning ticket in yuan
    pub amount: i64,
}

// Tiers 1 and 2 are pari-mutuel; the amounts are average estimates.
const DALETU_RULES: &[TierRule] = &[
    TierRule { tier: 1, matches: &[(5, 2)], amount: 5_000_000 },
    TierRule { tier: 2, matches: &[(5, 1)], amount: 100_000 },
    TierRule { tier: 3, matches: &[(5, 0)], amount: 10_000 },
    TierRule { tier: 4, matches: &[(4, 2)], amount: 3_000 },
    TierRule { tier: 5, matches: &[(4, 1)], amount: 300 },
    TierRule { tier: 6, matches: &[(3, 2), (4, 0)], amount: 200 },
    TierRule { tier: 7, matches: &[(3, 1), (2, 2)], amount: 100 },
    TierRule { tier: 8, matches: &[(3, 0), (1, 2), (2, 1)], amount: 15 },
    TierRule { tier: 9, matches: &[(0, 2), (1, 1), (2, 0)], amount: 5 },
];

const SHUANGSEQIU_RULES: &[TierRule] = &[
    TierRule { tier: 1, matches: &[(6, 1)], amount: 5_000_000 },
    TierRule { tier: 2, matches: &[(6, 0)], amount: 100_000 },
    TierRule { tier: 3, matches: &[(5, 1)], amount: 3_000 },
    TierRule { tier: 4, matches: &[(5, 0), (4, 1)], amount: 200 },
    TierRule { tier: 5, matches: &[(4, 0), (3, 1)], amount: 10 },
    TierRule { tier: 6, matches: &[(2, 1), (1, 1), (0, 1)], amount: 5 },
];

const TIER_NAMES: [&str; 10] = [
    "未中奖", "一等奖", "二等奖", "三等奖", "四等奖", "五等奖", "六等奖", "七等奖", "八等奖",
    "九等奖",
];

impl LotteryKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "dlt" | "daletu" => Some(LotteryKind::Daletu),
            "ssq" | "shuangseqiu" => Some(LotteryKind::Shuangseqiu),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LotteryKind::Daletu => "dlt",
            LotteryKind::Shuangseqiu => "ssq",
        }
    }

    pub fn format(&self) -> NumberFormat {
        match self {
            LotteryKind::Daletu => NumberFormat {
                main_count: 5,
                main_min: 1,
                main_max: 35,
                extra_count: 2,
                extra_min: 1,
                extra_max: 12,
            },
            LotteryKind::Shuangseqiu => NumberFormat {
                main_count: 6,
                main_min: 1,
                main_max: 33,
                extra_count: 1,
                extra_min: 1,
                extra_max: 16,
            },
        }
    }

    pub fn rules(&self) -> &'static [TierRule] {
        match self {
            LotteryKind::Daletu => DALETU_RULES,
            LotteryKind::Shuangseqiu => SHUANGSEQIU_RULES,
        }
    }

    /// Number of prize tiers (the worst tier number)
    pub fn tier_count(&self) -> u8 {
        self.rules().len() as u8
    }

    /// Price of a single ticket in yuan
    pub fn unit_price(&self) -> i64 {
        2
    }

    /// Payout for a tier in yuan; 0 for no prize or unknown tiers
    pub fn prize_amount(&self, tier: u8) -> i64 {
        self.rules()
            .iter()
            .find(|rule| rule.tier == tier)
            .map(|rule| rule.amount)
            .unwrap_or(0)
    }
}

pub fn tier_name(tier: u8) -> &'static str {
    TIER_NAMES.get(tier as usize).copied().unwrap_or("未知奖级")
}

/// Map match counts to a tier by walking the table top-down
pub fn tier_for_counts(kind: LotteryKind, front_matches: usize, back_matches: usize) -> u8 {
    kind.rules()
        .iter()
        .find(|rule| rule.matches.contains(&(front_matches, back_matches)))
        .map(|rule| rule.tier)
        .unwrap_or(NO_PRIZE)
}

/// Which of the ticket's numbers appear in the draw, and the tier awarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub tier: u8,
    pub front_matched: Vec<u8>,
    pub back_matched: Vec<u8>,
}

pub fn match_ticket(kind: LotteryKind, ticket: &Ticket, draw: &DrawNumbers) -> MatchResult {
    let front_matched: Vec<u8> = ticket
        .front
        .iter()
        .copied()
        .filter(|n| draw.front.contains(n))
        .collect();
    let back_matched: Vec<u8> = ticket
        .back
        .iter()
        .copied()
        .filter(|n| draw.back.contains(n))
        .collect();

    MatchResult {
        tier: tier_for_counts(kind, front_matched.len(), back_matched.len()),
        front_matched,
        back_matched,
    }
}

/// Tier a ticket would have won in one draw
pub fn evaluate_tier(kind: LotteryKind, ticket: &Ticket, draw: &DrawNumbers) -> u8 {
    let front = ticket.front.iter().filter(|n| draw.front.contains(n)).count();
    let back = ticket.back.iter().filter(|n| draw.back.contains(n)).count();
    tier_for_counts(kind, front, back)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draw(front: &[u8], back: &[u8]) -> DrawNumbers {
        DrawNumbers::new(
            "25001",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            front.to_vec(),
            back.to_vec(),
        )
    }

    #[test]
    fn test_daletu_table() {
        let expected = [
            ((5, 2), 1),
            ((5, 1), 2),
            ((5, 0), 3),
            ((4, 2), 4),
            ((4, 1), 5),
            ((3, 2), 6),
            ((4, 0), 6),
            ((3, 1), 7),
            ((2, 2), 7),
            ((3, 0), 8),
            ((1, 2), 8),
            ((2, 1), 8),
            ((0, 2), 9),
            ((1, 1), 9),
            ((2, 0), 9),
            ((1, 0), 0),
            ((0, 1), 0),
            ((0, 0), 0),
        ];

        for ((front, back), tier) in expected {
            assert_eq!(
                tier_for_counts(LotteryKind::Daletu, front, back),
                tier,
                "({}, {})",
                front,
                back
            );
        }
    }

    #[test]
    fn test_every_count_pair_has_exactly_one_tier() {
        for kind in [LotteryKind::Daletu, LotteryKind::Shuangseqiu] {
            let format = kind.format();
            for front in 0..=format.main_count {
                for back in 0..=format.extra_count {
                    let hits = kind
                        .rules()
                        .iter()
                        .filter(|rule| rule.matches.contains(&(front, back)))
                        .count();
                    assert!(hits <= 1, "{:?} ({}, {}) matched {} rows", kind, front, back, hits);

                    let tier = tier_for_counts(kind, front, back);
                    assert!(tier <= kind.tier_count());
                }
            }
        }
    }

    #[test]
    fn test_jackpot_and_front_only_match() {
        let winning = draw(&[1, 2, 3, 4, 5], &[1, 2]);

        let jackpot = Ticket::new(vec![1, 2, 3, 4, 5], vec![1, 2]);
        assert_eq!(evaluate_tier(LotteryKind::Daletu, &jackpot, &winning), 1);

        let front_only = Ticket::new(vec![1, 2, 3, 4, 5], vec![3, 4]);
        assert_eq!(evaluate_tier(LotteryKind::Daletu, &front_only, &winning), 3);
    }

    #[test]
    fn test_match_ticket_reports_matched_numbers() {
        let winning = draw(&[3, 9, 14, 22, 31], &[4, 11]);
        let ticket = Ticket::new(vec![1, 3, 14, 20, 31], vec![11, 12]);

        let result = match_ticket(LotteryKind::Daletu, &ticket, &winning);
        assert_eq!(result.front_matched, vec![3, 14, 31]);
        assert_eq!(result.back_matched, vec![11]);
        assert_eq!(result.tier, 7);
        assert_eq!(result.tier, evaluate_tier(LotteryKind::Daletu, &ticket, &winning));
    }

    #[test]
    fn test_shuangseqiu_table() {
        assert_eq!(tier_for_counts(LotteryKind::Shuangseqiu, 6, 1), 1);
        assert_eq!(tier_for_counts(LotteryKind::Shuangseqiu, 6, 0), 2);
        assert_eq!(tier_for_counts(LotteryKind::Shuangseqiu, 4, 1), 4);
        assert_eq!(tier_for_counts(LotteryKind::Shuangseqiu, 0, 1), 6);
        assert_eq!(tier_for_counts(LotteryKind::Shuangseqiu, 3, 0), 0);
    }

    #[test]
    fn test_prize_amounts() {
        assert_eq!(LotteryKind::Daletu.prize_amount(1), 5_000_000);
        assert_eq!(LotteryKind::Daletu.prize_amount(9), 5);
        assert_eq!(LotteryKind::Daletu.prize_amount(NO_PRIZE), 0);
        assert_eq!(LotteryKind::Shuangseqiu.prize_amount(7), 0);
        assert_eq!(tier_name(NO_PRIZE), "未中奖");
        assert_eq!(tier_name(1), "一等奖");
        assert_eq!(tier_name(9), "九等奖");
        assert_eq!(tier_name(42), "未知奖级");
    }

    #[test]
    fn test_kind_from_code() {
        assert_eq!(LotteryKind::from_code("DLT"), Some(LotteryKind::Daletu));
        assert_eq!(LotteryKind::from_code("ssq"), Some(LotteryKind::Shuangseqiu));
        assert_eq!(LotteryKind::from_code("pl3"), None);
    }
}
