//! Tickets, parsed draws and input validation
//!
//! Everything the prize evaluator consumes lives here. Tickets are
//! ephemeral and never persisted; `DrawNumbers` is the parsed view of a
//! stored `lottery_draws` row.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entities::lottery_draws;
use crate::services::prize_rules::LotteryKind;

/// Maximum number of tickets accepted by one batch check
pub const MAX_BATCH_TICKETS: usize = 200;

/// A user- or generator-supplied selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub front: Vec<u8>,
    pub back: Vec<u8>,
}

impl Ticket {
    pub fn new(front: Vec<u8>, back: Vec<u8>) -> Self {
        Self { front, back }
    }

    /// Check counts, ranges and duplicates against the game format
    pub fn validate(&self, kind: LotteryKind) -> Result<(), TicketValidationError> {
        let format = kind.format();
        validate_pool(
            NumberPool::Main,
            &self.front,
            format.main_count,
            format.main_min,
            format.main_max,
        )?;
        validate_pool(
            NumberPool::Extra,
            &self.back,
            format.extra_count,
            format.extra_min,
            format.extra_max,
        )
    }
}

fn validate_pool(
    pool: NumberPool,
    numbers: &[u8],
    expected: usize,
    min: u8,
    max: u8,
) -> Result<(), TicketValidationError> {
    if numbers.len() != expected {
        return Err(TicketValidationError::WrongCount {
            pool,
            expected,
            actual: numbers.len(),
        });
    }

    let mut seen = HashSet::with_capacity(numbers.len());
    for &number in numbers {
        if number < min || number > max {
            return Err(TicketValidationError::OutOfRange {
                pool,
                number,
                min,
                max,
            });
        }
        if !seen.insert(number) {
            return Err(TicketValidationError::Duplicate { pool, number });
        }
    }

    Ok(())
}

/// Validate a batch before any evaluation happens
pub fn validate_batch(kind: LotteryKind, tickets: &[Ticket]) -> Result<(), BatchValidationError> {
    if tickets.is_empty() {
        return Err(BatchValidationError::Empty);
    }
    if tickets.len() > MAX_BATCH_TICKETS {
        return Err(BatchValidationError::TooMany {
            max: MAX_BATCH_TICKETS,
            actual: tickets.len(),
        });
    }

    for (index, ticket) in tickets.iter().enumerate() {
        ticket
            .validate(kind)
            .map_err(|source| BatchValidationError::InvalidTicket { index, source })?;
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberPool {
    Main,
    Extra,
}

impl std::fmt::Display for NumberPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberPool::Main => write!(f, "front"),
            NumberPool::Extra => write!(f, "back"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketValidationError {
    WrongCount {
        pool: NumberPool,
        expected: usize,
        actual: usize,
    },
    OutOfRange {
        pool: NumberPool,
        number: u8,
        min: u8,
        max: u8,
    },
    Duplicate {
        pool: NumberPool,
        number: u8,
    },
}

impl std::fmt::Display for TicketValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TicketValidationError::WrongCount {
                pool,
                expected,
                actual,
            } => write!(
                f,
                "{} numbers must contain exactly {} numbers (got {})",
                pool, expected, actual
            ),
            TicketValidationError::OutOfRange {
                pool,
                number,
                min,
                max,
            } => write!(
                f,
                "{} number {} is outside the range {}-{}",
                pool, number, min, max
            ),
            TicketValidationError::Duplicate { pool, number } => {
                write!(f, "{} number {} appears more than once", pool, number)
            }
        }
    }
}

impl std::error::Error for TicketValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchValidationError {
    Empty,
    TooMany { max: usize, actual: usize },
    InvalidTicket {
        index: usize,
        source: TicketValidationError,
    },
}

impl std::fmt::Display for BatchValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchValidationError::Empty => write!(f, "Please provide at least one ticket"),
            BatchValidationError::TooMany { max, actual } => write!(
                f,
                "At most {} tickets can be checked at once (got {})",
                max, actual
            ),
            // Ticket numbers are 1-based for humans
            BatchValidationError::InvalidTicket { index, source } => {
                write!(f, "Ticket #{}: {}", index + 1, source)
            }
        }
    }
}

impl std::error::Error for BatchValidationError {}

/// Winning numbers of one historical draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawNumbers {
    pub issue: String,
    pub draw_date: NaiveDate,
    pub draw_time: Option<NaiveDateTime>,
    pub front: Vec<u8>,
    pub back: Vec<u8>,
}

impl DrawNumbers {
    pub fn new(issue: impl Into<String>, draw_date: NaiveDate, front: Vec<u8>, back: Vec<u8>) -> Self {
        Self {
            issue: issue.into(),
            draw_date,
            draw_time: None,
            front,
            back,
        }
    }
}

impl From<&lottery_draws::Model> for DrawNumbers {
    fn from(row: &lottery_draws::Model) -> Self {
        Self {
            issue: row.issue.clone(),
            draw_date: row.draw_date,
            draw_time: row.draw_time,
            front: row.main_number_list(),
            back: row.extra_number_list(),
        }
    }
}
