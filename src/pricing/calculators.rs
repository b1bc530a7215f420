//! Core pricing calculation functions.
//!
//! Pure functions for per-day rule resolution - no database access.
//! Callers pass the full rule set of a property as a snapshot; everything
//! below only reads it.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::models::PricingRule;

/// Number of days in the inclusive range `[date_start, date_end]`.
///
/// Zero or negative when the range is inverted.
pub fn stay_length(date_start: NaiveDate, date_end: NaiveDate) -> i64 {
    (date_end - date_start).num_days() + 1
}

/// Lazy, restartable sequence of the calendar days of a stay.
///
/// Cloning yields an independent iterator starting from the current
/// position, so the same range can be walked more than once.
#[derive(Debug, Clone)]
pub struct StayDays {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl StayDays {
    pub fn new(date_start: NaiveDate, date_end: NaiveDate) -> Self {
        Self {
            next: (date_start <= date_end).then_some(date_start),
            end: date_end,
        }
    }
}

impl Iterator for StayDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = if current < self.end {
            current.checked_add_days(Days::new(1))
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|day| usize::try_from(stay_length(day, self.end)).unwrap_or(0))
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StayDays {}

/// Ranking key for rule selection; the highest key wins a day.
///
/// Order of precedence:
/// 1. date-specific rules beat duration rules
/// 2. longer `min_stay_length`
/// 3. higher `price_modifier` (smaller discount / larger surcharge)
/// 4. higher `fixed_price`
///
/// Missing numbers count as zero.
pub type RuleRank = (bool, i32, Decimal, Decimal);

pub fn rule_rank(rule: &PricingRule) -> RuleRank {
    (
        rule.specific_day.is_some(),
        rule.min_stay_length.unwrap_or(0),
        rule.price_modifier.unwrap_or(Decimal::ZERO),
        rule.fixed_price.unwrap_or(Decimal::ZERO),
    )
}

/// Pick the most relevant rule among `candidates`.
///
/// Equal ranks keep the earliest candidate, so the result follows the
/// order the rules were supplied in.
pub fn select_rule<'a, I>(candidates: I) -> Option<&'a PricingRule>
where
    I: IntoIterator<Item = &'a PricingRule>,
{
    candidates.into_iter().reduce(|best, rule| {
        if rule_rank(rule) > rule_rank(best) {
            rule
        } else {
            best
        }
    })
}

/// Price of one day under `rule`.
///
/// `fixed_price` wins over `price_modifier` within the same rule; a rule
/// with neither effect leaves the base price untouched. `None` when the
/// modified price does not fit in a `Decimal`.
pub fn apply_rule(base_price: Decimal, rule: &PricingRule) -> Option<Decimal> {
    match (rule.fixed_price, rule.price_modifier) {
        (Some(fixed), _) => Some(fixed),
        (None, Some(modifier)) => {
            let factor = modifier
                .checked_div(Decimal::ONE_HUNDRED)
                .and_then(|ratio| Decimal::ONE.checked_add(ratio))?;
            base_price.checked_mul(factor)
        }
        (None, None) => Some(base_price),
    }
}

/// Rules that can govern at least one day of the stay.
///
/// Duration rules qualify by whole-stay length; date-specific rules qualify
/// when their day falls inside the range.
pub fn relevant_rules(
    rules: &[PricingRule],
    date_start: NaiveDate,
    date_end: NaiveDate,
) -> Vec<&PricingRule> {
    let total_days = stay_length(date_start, date_end);
    rules
        .iter()
        .filter(|rule| {
            rule.matches_stay_length(total_days)
                || rule
                    .specific_day
                    .is_some_and(|day| (date_start..=date_end).contains(&day))
        })
        .collect()
}

/// Resolved price of a single day
#[derive(Debug, Clone, PartialEq)]
pub struct DayPrice {
    pub date: NaiveDate,
    pub price: Decimal,
    /// Winning rule, `None` when the base price applied
    pub rule_id: Option<Uuid>,
}

/// Day-by-day resolution of a stay
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub stay_length: i64,
    pub days: Vec<DayPrice>,
    pub final_price: Decimal,
}

/// Resolve a single day of a stay of `total_days` days.
///
/// `relevant` is the output of [`relevant_rules`] for the same stay.
pub fn day_price(
    base_price: Decimal,
    date: NaiveDate,
    total_days: i64,
    relevant: &[&PricingRule],
) -> Option<DayPrice> {
    let winner = select_rule(
        relevant
            .iter()
            .copied()
            .filter(|rule| rule.applies_on(date, total_days)),
    );

    match winner {
        Some(rule) => Some(DayPrice {
            date,
            price: apply_rule(base_price, rule)?,
            rule_id: Some(rule.id),
        }),
        None => Some(DayPrice {
            date,
            price: base_price,
            rule_id: None,
        }),
    }
}

/// Resolve every day of `[date_start, date_end]` against `rules`.
///
/// An inverted range produces no days and a zero total. `None` when a day
/// price or the total overflows.
pub fn resolve_breakdown(
    base_price: Decimal,
    date_start: NaiveDate,
    date_end: NaiveDate,
    rules: &[PricingRule],
) -> Option<PriceBreakdown> {
    let total_days = stay_length(date_start, date_end);
    let relevant = relevant_rules(rules, date_start, date_end);

    let days = StayDays::new(date_start, date_end)
        .map(|date| day_price(base_price, date, total_days, &relevant))
        .collect::<Option<Vec<DayPrice>>>()?;

    let final_price = days
        .iter()
        .try_fold(Decimal::ZERO, |total, day| total.checked_add(day.price))?;

    Some(PriceBreakdown {
        base_price,
        stay_length: total_days.max(0),
        days,
        final_price,
    })
}

/// Final price of a stay: the sum of every resolved day price.
///
/// Walks the days lazily without keeping them. `None` on overflow.
pub fn resolve(
    base_price: Decimal,
    date_start: NaiveDate,
    date_end: NaiveDate,
    rules: &[PricingRule],
) -> Option<Decimal> {
    let total_days = stay_length(date_start, date_end);
    let relevant = relevant_rules(rules, date_start, date_end);

    StayDays::new(date_start, date_end).try_fold(Decimal::ZERO, |total, date| {
        let day = day_price(base_price, date, total_days, &relevant)?;
        total.checked_add(day.price)
    })
}
