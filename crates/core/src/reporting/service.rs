//! Report formulas.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::ReportError;
use super::types::{
    AcceptanceData, AssignmentData, CompletionStatusCounts, DailyResponseCount, DayWindow,
    DiscipleshipData, RatioData, RatioHealth, TraineeStatusCounts, TrainingCompletion,
};

/// Days covered by the response time series.
pub const SERIES_DAYS: u32 = 7;

/// Service for turning counts into report figures.
pub struct ReportingService;

impl ReportingService {
    /// `part / total × 100`, rounded to one decimal; zero when `total` is zero.
    #[must_use]
    pub fn percentage(part: u64, total: u64) -> Decimal {
        if total == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(part) / Decimal::from(total) * Decimal::ONE_HUNDRED).round_dp(1)
    }

    /// `total / count`, rounded to one decimal; zero when `count` is zero.
    #[must_use]
    pub fn average(total: u64, count: u64) -> Decimal {
        if count == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(total) / Decimal::from(count)).round_dp(1)
    }

    /// Acceptance figures from prospects with responses.
    #[must_use]
    pub fn acceptance(accepted: u64, total_prospects: u64) -> AcceptanceData {
        AcceptanceData {
            accepted,
            pending: total_prospects.saturating_sub(accepted),
            rate: Self::percentage(accepted, total_prospects),
        }
    }

    /// Assignment figures from prospects with a discipler.
    #[must_use]
    pub fn assignment(assigned: u64, total_prospects: u64) -> AssignmentData {
        AssignmentData {
            assigned,
            unassigned: total_prospects.saturating_sub(assigned),
            rate: Self::percentage(assigned, total_prospects),
        }
    }

    /// Discipleship completion figures.
    #[must_use]
    pub fn discipleship(counts: CompletionStatusCounts) -> DiscipleshipData {
        let total = counts.total();
        DiscipleshipData {
            counts,
            total,
            rate: Self::percentage(counts.completed, total),
        }
    }

    /// Prospects per discipler compared with the recommendation.
    ///
    /// Health uses the unrounded ratio; `current` is reported to one decimal.
    #[must_use]
    pub fn ratio(total_prospects: u64, total_disciplers: u64, recommended: Decimal) -> RatioData {
        let exact = if total_disciplers == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(total_prospects) / Decimal::from(total_disciplers)
        };

        RatioData {
            current: exact.round_dp(1),
            recommended,
            total_disciplers,
            total_prospects,
            health: Self::classify_ratio(exact, recommended),
        }
    }

    /// `healthy` when `current <= recommended`, else `overloaded`.
    #[must_use]
    pub fn classify_ratio(current: Decimal, recommended: Decimal) -> RatioHealth {
        if current <= recommended {
            RatioHealth::Healthy
        } else {
            RatioHealth::Overloaded
        }
    }

    /// Completion figures for one training.
    #[must_use]
    pub fn training_completion(
        training_id: Uuid,
        name: String,
        statuses: TraineeStatusCounts,
    ) -> TrainingCompletion {
        let total_trainees = statuses.total();
        TrainingCompletion {
            training_id,
            name,
            total_trainees,
            statuses,
            completion_rate: Self::percentage(statuses.completed, total_trainees),
        }
    }

    /// Resolves the "since last visit" watermark.
    ///
    /// Without a stored watermark the window starts `lookback_days` ago.
    #[must_use]
    pub fn resolve_since(
        last_visit: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        lookback_days: i64,
    ) -> DateTime<Utc> {
        last_visit.unwrap_or_else(|| now - Duration::days(lookback_days))
    }

    /// Parses an IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidTimezone` for unknown names.
    pub fn parse_timezone(name: &str) -> Result<Tz, ReportError> {
        name.trim()
            .parse::<Tz>()
            .map_err(|_| ReportError::InvalidTimezone(name.to_string()))
    }

    /// The last seven local calendar days, oldest first, ending today.
    #[must_use]
    pub fn daily_windows(now: DateTime<Utc>, tz: Tz) -> Vec<DayWindow> {
        let today = now.with_timezone(&tz).date_naive();

        (0..SERIES_DAYS)
            .rev()
            .filter_map(|days_back| today.checked_sub_days(chrono::Days::new(u64::from(days_back))))
            .map(|date| {
                let next = date.succ_opt().unwrap_or(date);
                DayWindow {
                    label: date.format("%a").to_string(),
                    date,
                    start: local_midnight(tz, date),
                    end: local_midnight(tz, next),
                }
            })
            .collect()
    }

    /// Pairs windows with their counts.
    #[must_use]
    pub fn daily_series(windows: &[DayWindow], counts: &[u64]) -> Vec<DailyResponseCount> {
        windows
            .iter()
            .zip(counts.iter().copied().chain(std::iter::repeat(0)))
            .map(|(window, count)| DailyResponseCount {
                day: window.label.clone(),
                date: window.date,
                count,
            })
            .collect()
    }
}

/// Start of a local calendar day in UTC.
///
/// Where midnight falls into a DST gap the day starts at the first instant
/// after the gap.
fn local_midnight(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map_or_else(|| Utc.from_utc_datetime(&midnight), |local| local.with_timezone(&Utc))
}
