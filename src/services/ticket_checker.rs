//! Single-ticket check against the draw corpus

use serde::Serialize;
use std::collections::BTreeMap;

use crate::services::draw_parser::default_draw_time;
use crate::services::prize_rules::{match_ticket, tier_name, LotteryKind, NO_PRIZE};
use crate::services::ticket::{DrawNumbers, Ticket};

/// How many draws at the best tier are reported in detail
pub const MAX_REPORTED_WINNINGS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinningRecord {
    pub issue: String,
    /// "YYYY-MM-DD HH:MM:SS", falling back to the game's usual draw time
    pub draw_date: String,
    pub winning_front: Vec<u8>,
    pub winning_back: Vec<u8>,
    pub front_matched: Vec<u8>,
    pub back_matched: Vec<u8>,
    pub level: u8,
    pub prize_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCount {
    pub level: u8,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub has_winning: bool,
    /// Best tier reached, 0 when nothing was won
    pub highest_level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_prize_name: Option<String>,
    pub total_winnings_at_highest: usize,
    /// At most `MAX_REPORTED_WINNINGS` draws at the best tier, corpus order
    pub winnings: Vec<WinningRecord>,
    /// Wins per tier, best tier first
    pub stats: Vec<TierCount>,
    pub total_checked: usize,
}

pub fn check_ticket(kind: LotteryKind, ticket: &Ticket, draws: &[DrawNumbers]) -> CheckReport {
    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    let mut highest_level = NO_PRIZE;
    let mut best: Vec<WinningRecord> = Vec::new();

    for draw in draws {
        let result = match_ticket(kind, ticket, draw);
        if result.tier == NO_PRIZE {
            continue;
        }

        *counts.entry(result.tier).or_insert(0) += 1;

        if highest_level == NO_PRIZE || result.tier < highest_level {
            highest_level = result.tier;
            best.clear();
        }

        if result.tier == highest_level && best.len() < MAX_REPORTED_WINNINGS {
            best.push(WinningRecord {
                issue: draw.issue.clone(),
                draw_date: format_draw_time(kind, draw),
                winning_front: draw.front.clone(),
                winning_back: draw.back.clone(),
                front_matched: result.front_matched,
                back_matched: result.back_matched,
                level: result.tier,
                prize_name: tier_name(result.tier).to_string(),
            });
        }
    }

    let stats = counts
        .iter()
        .map(|(&level, &count)| TierCount {
            level,
            name: tier_name(level).to_string(),
            count,
        })
        .collect();

    if highest_level == NO_PRIZE {
        return CheckReport {
            has_winning: false,
            highest_level: NO_PRIZE,
            highest_prize_name: None,
            total_winnings_at_highest: 0,
            winnings: Vec::new(),
            stats,
            total_checked: draws.len(),
        };
    }

    CheckReport {
        has_winning: true,
        highest_level,
        highest_prize_name: Some(tier_name(highest_level).to_string()),
        total_winnings_at_highest: counts.get(&highest_level).copied().unwrap_or(0),
        winnings: best,
        stats,
        total_checked: draws.len(),
    }
}

fn format_draw_time(kind: LotteryKind, draw: &DrawNumbers) -> String {
    match draw.draw_time {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => draw
            .draw_date
            .and_time(default_draw_time(kind.code()))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draw(issue: &str, day: u32, front: &[u8], back: &[u8]) -> DrawNumbers {
        DrawNumbers::new(
            issue,
            NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            front.to_vec(),
            back.to_vec(),
        )
    }

    #[test]
    fn test_no_win_still_reports_checked_count() {
        let draws = vec![
            draw("25050", 3, &[20, 21, 22, 23, 24], &[11, 12]),
            draw("25049", 1, &[25, 26, 27, 28, 29], &[9, 10]),
        ];
        let ticket = Ticket::new(vec![1, 2, 3, 4, 5], vec![1, 2]);

        let report = check_ticket(LotteryKind::Daletu, &ticket, &draws);
        assert!(!report.has_winning);
        assert_eq!(report.highest_level, 0);
        assert_eq!(report.total_checked, 2);
        assert!(report.winnings.is_empty());
        assert!(report.stats.is_empty());
    }

    #[test]
    fn test_single_lowest_tier_win() {
        let draws = vec![
            // 0 front + 2 back -> tier 9
            draw("25050", 3, &[20, 21, 22, 23, 24], &[1, 2]),
            draw("25049", 1, &[25, 26, 27, 28, 29], &[9, 10]),
        ];
        let ticket = Ticket::new(vec![1, 2, 3, 4, 5], vec![1, 2]);

        let report = check_ticket(LotteryKind::Daletu, &ticket, &draws);
        assert!(report.has_winning);
        assert_eq!(report.highest_level, 9);
        assert_eq!(report.total_winnings_at_highest, 1);
        assert_eq!(report.winnings.len(), 1);
        assert_eq!(report.winnings[0].issue, "25050");
        assert_eq!(report.winnings[0].back_matched, vec![1, 2]);
        assert_eq!(report.winnings[0].draw_date, "2025-05-03 21:30:00");
    }

    #[test]
    fn test_best_tier_wins_regardless_of_order() {
        let draws = vec![
            draw("25003", 5, &[1, 2, 30, 31, 32], &[7, 8]), // 2+0 -> 9
            draw("25002", 4, &[1, 2, 3, 4, 5], &[1, 9]),    // 5+1 -> 2
            draw("25001", 3, &[1, 2, 3, 31, 32], &[1, 2]),  // 3+2 -> 6
        ];
        let ticket = Ticket::new(vec![1, 2, 3, 4, 5], vec![1, 2]);

        let report = check_ticket(LotteryKind::Daletu, &ticket, &draws);
        assert_eq!(report.highest_level, 2);
        assert_eq!(report.winnings.len(), 1);
        assert_eq!(report.winnings[0].issue, "25002");
        assert_eq!(
            report.stats.iter().map(|s| (s.level, s.count)).collect::<Vec<_>>(),
            vec![(2, 1), (6, 1), (9, 1)]
        );
    }

    #[test]
    fn test_caps_reported_winnings_but_keeps_true_total() {
        let draws: Vec<DrawNumbers> = (1..=15)
            .map(|day| draw(&format!("250{:02}", day), day, &[1, 2, 30, 31, 32], &[7, 8]))
            .collect();
        let ticket = Ticket::new(vec![1, 2, 3, 4, 5], vec![1, 2]);

        let report = check_ticket(LotteryKind::Daletu, &ticket, &draws);
        assert_eq!(report.highest_level, 9);
        assert_eq!(report.total_winnings_at_highest, 15);
        assert_eq!(report.winnings.len(), MAX_REPORTED_WINNINGS);
        assert_eq!(report.winnings[0].issue, "25001");
    }
}
