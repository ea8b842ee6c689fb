//! Lottery picks, coin flips and dice rolls built on a `RandomSource`

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::prize_rules::LotteryKind;
use crate::services::random_org::{RandomApiError, RandomSource, MAX_RANDOM_VALUE};

pub const MAX_COINS: usize = 10;
pub const MAX_DICE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    InvalidCount { what: &'static str, min: usize, max: usize, actual: usize },
    InvalidRange(String),
    /// More unique numbers requested than the pool holds
    PoolTooSmall { count: usize, min: i64, max: i64 },
    NotEnoughUnique { needed: usize, got: usize },
    Source(RandomApiError),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::InvalidCount { what, min, max, actual } => write!(
                f,
                "{} count must be between {} and {}, got {}",
                what, min, max, actual
            ),
            GenerationError::InvalidRange(msg) => write!(f, "Invalid range: {}", msg),
            GenerationError::PoolTooSmall { count, min, max } => write!(
                f,
                "Cannot draw {} unique numbers from [{}, {}]",
                count, min, max
            ),
            GenerationError::NotEnoughUnique { needed, got } => write!(
                f,
                "Only {} of {} unique numbers could be generated, please retry",
                got, needed
            ),
            GenerationError::Source(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<RandomApiError> for GenerationError {
    fn from(e: RandomApiError) -> Self {
        GenerationError::Source(e)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNumbers {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: LotteryKind,
    pub numbers: Vec<u8>,
    pub special_numbers: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinSide {
    Heads,
    Tails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinFlips {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<CoinSide>,
    pub heads: usize,
    pub tails: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRoll {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub values: Vec<u8>,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomInteger {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub value: i64,
    /// Inclusive upper bound; the lower bound is 0
    pub range: i64,
}

fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Draw `count` distinct integers from `[min, max]`, sorted ascending
///
/// Over-requests to absorb duplicates and tops up once; if the pool is
/// still short the caller gets an error rather than a truncated set.
pub async fn generate_unique(
    source: &dyn RandomSource,
    count: usize,
    min: i64,
    max: i64,
) -> Result<Vec<i64>, GenerationError> {
    if min > max {
        return Err(GenerationError::InvalidRange(format!("{} > {}", min, max)));
    }
    let pool = (max - min + 1) as usize;
    if count == 0 || count > pool {
        return Err(GenerationError::PoolTooSmall { count, min, max });
    }

    let request = (count * 3).min(pool);
    let mut unique: Vec<i64> = Vec::with_capacity(request);
    for n in source.fetch_integers(request, min, max).await? {
        if !unique.contains(&n) {
            unique.push(n);
        }
    }

    if unique.len() < count {
        let missing = count - unique.len();
        tracing::debug!("Topping up {} unique numbers in [{}, {}]", missing, min, max);
        for n in source.fetch_integers(missing * 2, min, max).await? {
            if !unique.contains(&n) {
                unique.push(n);
            }
        }
    }

    if unique.len() < count {
        return Err(GenerationError::NotEnoughUnique {
            needed: count,
            got: unique.len(),
        });
    }

    unique.truncate(count);
    unique.sort_unstable();
    Ok(unique)
}

fn to_u8(numbers: Vec<i64>) -> Vec<u8> {
    numbers.into_iter().filter_map(|n| u8::try_from(n).ok()).collect()
}

pub async fn generate_lottery(source: &dyn RandomSource, kind: LotteryKind) -> Result<GeneratedNumbers, GenerationError> {
    let format = kind.format();
    let main = generate_unique(
        source,
        format.main_count,
        format.main_min as i64,
        format.main_max as i64,
    )
    .await?;
    let extra = generate_unique(
        source,
        format.extra_count,
        format.extra_min as i64,
        format.extra_max as i64,
    )
    .await?;

    let prefix = match kind {
        LotteryKind::Daletu => "daletu",
        LotteryKind::Shuangseqiu => "shuangseqiu",
    };

    Ok(GeneratedNumbers {
        id: new_id(prefix),
        timestamp: Utc::now(),
        kind,
        numbers: to_u8(main),
        special_numbers: to_u8(extra),
    })
}

/// 5 of 1..=35 plus 2 of 1..=12
pub async fn generate_daletu(source: &dyn RandomSource) -> Result<GeneratedNumbers, GenerationError> {
    generate_lottery(source, LotteryKind::Daletu).await
}

/// 6 of 1..=33 plus 1 of 1..=16
pub async fn generate_shuangseqiu(source: &dyn RandomSource) -> Result<GeneratedNumbers, GenerationError> {
    generate_lottery(source, LotteryKind::Shuangseqiu).await
}

fn check_count(what: &'static str, count: usize, max: usize) -> Result<(), GenerationError> {
    if count == 0 || count > max {
        return Err(GenerationError::InvalidCount {
            what,
            min: 1,
            max,
            actual: count,
        });
    }
    Ok(())
}

/// 0 is heads, 1 is tails
pub async fn flip_coins(source: &dyn RandomSource, count: usize) -> Result<CoinFlips, GenerationError> {
    check_count("Coin", count, MAX_COINS)?;

    let results: Vec<CoinSide> = source
        .fetch_integers(count, 0, 1)
        .await?
        .into_iter()
        .map(|n| if n == 0 { CoinSide::Heads } else { CoinSide::Tails })
        .collect();
    let heads = results.iter().filter(|side| **side == CoinSide::Heads).count();

    Ok(CoinFlips {
        id: new_id("coin"),
        timestamp: Utc::now(),
        tails: results.len() - heads,
        heads,
        results,
    })
}

pub async fn roll_dice(source: &dyn RandomSource, count: usize) -> Result<DiceRoll, GenerationError> {
    check_count("Dice", count, MAX_DICE)?;

    let values = to_u8(source.fetch_integers(count, 1, 6).await?);
    let total = values.iter().map(|&v| v as u32).sum();

    Ok(DiceRoll {
        id: new_id("dice"),
        timestamp: Utc::now(),
        values,
        total,
    })
}

/// One integer in `[0, max]`
pub async fn random_integer(source: &dyn RandomSource, max: i64) -> Result<RandomInteger, GenerationError> {
    if !(1..=MAX_RANDOM_VALUE).contains(&max) {
        return Err(GenerationError::InvalidRange(format!(
            "max must be between 1 and {}",
            MAX_RANDOM_VALUE
        )));
    }

    let value = source
        .fetch_integers(1, 0, max)
        .await?
        .first()
        .copied()
        .ok_or(GenerationError::Source(RandomApiError::WrongCount { expected: 1, actual: 0 }))?;

    Ok(RandomInteger {
        id: new_id("random"),
        timestamp: Utc::now(),
        value,
        range: max,
    })
}
