//! Schedule exceptions.
//!
//! An exception overrides the recurring timetable for one departure slot:
//! it adds an extra sailing, delays one, or cancels/omits one. Each exception
//! is scoped either to a single date or to a weekday within a season.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::{DomainError, ExceptionId, NoticeId, RouteId, Season, StopId, weekday_of};

/// What an exception does to its departure slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionKind {
    Extra,
    Delayed,
    Cancelled,
    Omitted,
}

/// How an exception changes the set of departures being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Remove the frequency-generated slot.
    Suppress,
    /// Move the slot later by the configured delay.
    Shift,
    /// Add a departure no frequency produces.
    Add,
}

impl ExceptionKind {
    pub fn effect(self) -> Effect {
        match self {
            ExceptionKind::Cancelled | ExceptionKind::Omitted => Effect::Suppress,
            ExceptionKind::Delayed => Effect::Shift,
            ExceptionKind::Extra => Effect::Add,
        }
    }
}

/// A passenger-facing message attached to an exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub text: String,
}

/// When an exception applies.
#[derive(Debug, Clone, PartialEq)]
pub enum ExceptionScope {
    /// One calendar date.
    Date(NaiveDate),
    /// Every matching weekday inside a season.
    Weekly { weekday: Weekday, season: Season },
}

/// Unvalidated exception fields, as they arrive from storage or a request.
///
/// Convert with `ExceptionEntry::try_from`, which enforces that exactly one
/// of `valid_date` / `weekday` is set and that a departure time is present.
#[derive(Debug, Clone)]
pub struct ExceptionDraft {
    pub id: ExceptionId,
    pub route: RouteId,
    pub stop: Option<StopId>,
    pub valid_date: Option<NaiveDate>,
    pub weekday: Option<Weekday>,
    pub season: Option<Season>,
    pub departure_time: Option<NaiveTime>,
    pub kind: ExceptionKind,
    pub active: bool,
    pub notice: Option<Notice>,
}

/// A validated schedule exception.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionEntry {
    id: ExceptionId,
    route: RouteId,
    stop: Option<StopId>,
    scope: ExceptionScope,
    departure_time: NaiveTime,
    kind: ExceptionKind,
    active: bool,
    notice: Option<Notice>,
}

impl TryFrom<ExceptionDraft> for ExceptionEntry {
    type Error = DomainError;

    fn try_from(draft: ExceptionDraft) -> Result<Self, Self::Error> {
        let invalid = |reason| DomainError::InvalidException {
            exception: draft.id,
            reason,
        };

        let scope = match (draft.valid_date, draft.weekday) {
            (Some(_), Some(_)) => {
                return Err(invalid("valid date and weekday are mutually exclusive"));
            }
            (None, None) => return Err(invalid("either a valid date or a weekday is required")),
            (Some(date), None) => ExceptionScope::Date(date),
            (None, Some(weekday)) => {
                let season = draft
                    .season
                    .clone()
                    .ok_or_else(|| invalid("a weekday exception needs a season"))?;
                ExceptionScope::Weekly { weekday, season }
            }
        };

        let departure_time = draft
            .departure_time
            .ok_or_else(|| invalid("departure time is required"))?;

        Ok(Self {
            id: draft.id,
            route: draft.route,
            stop: draft.stop,
            scope,
            departure_time,
            kind: draft.kind,
            active: draft.active,
            notice: draft.notice,
        })
    }
}

impl ExceptionEntry {
    pub fn id(&self) -> ExceptionId {
        self.id
    }

    pub fn route(&self) -> RouteId {
        self.route
    }

    /// The stop this exception is pinned to; `None` means the whole route.
    pub fn stop(&self) -> Option<StopId> {
        self.stop
    }

    pub fn scope(&self) -> &ExceptionScope {
        &self.scope
    }

    /// Route-relative clock-time of the affected departure slot.
    pub fn departure_time(&self) -> NaiveTime {
        self.departure_time
    }

    pub fn kind(&self) -> ExceptionKind {
        self.kind
    }

    pub fn effect(&self) -> Effect {
        self.kind.effect()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The date this exception is pinned to, if date-scoped.
    pub fn valid_date(&self) -> Option<NaiveDate> {
        match &self.scope {
            ExceptionScope::Date(date) => Some(*date),
            ExceptionScope::Weekly { .. } => None,
        }
    }

    /// The weekday this exception recurs on, if weekday-scoped.
    pub fn weekday(&self) -> Option<Weekday> {
        match &self.scope {
            ExceptionScope::Date(_) => None,
            ExceptionScope::Weekly { weekday, .. } => Some(*weekday),
        }
    }

    /// True if the exception is active and in force on `date`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferry_server::domain::*;
    /// use chrono::NaiveDate;
    ///
    /// let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
    /// let entry = ExceptionEntry::try_from(ExceptionDraft {
    ///     id: ExceptionId(1),
    ///     route: RouteId(1),
    ///     stop: None,
    ///     valid_date: Some(monday),
    ///     weekday: None,
    ///     season: None,
    ///     departure_time: parse_clock("08:30").ok(),
    ///     kind: ExceptionKind::Cancelled,
    ///     active: true,
    ///     notice: None,
    /// })
    /// .unwrap();
    ///
    /// assert!(entry.applies_to(monday));
    /// assert!(!entry.applies_to(monday.succ_opt().unwrap()));
    /// ```
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        if !self.active {
            return false;
        }
        match &self.scope {
            ExceptionScope::Date(valid) => *valid == date,
            ExceptionScope::Weekly { weekday, season } => {
                *weekday == weekday_of(date) && season.covers(date)
            }
        }
    }

    /// True if the exception concerns `stop`. Route-wide exceptions concern
    /// every stop.
    pub fn affects_stop(&self, stop: StopId) -> bool {
        self.stop.is_none_or(|s| s == stop)
    }

    /// True if the exception targets the slot at `clock` for `stop`.
    pub fn targets(&self, clock: NaiveTime, stop: StopId) -> bool {
        self.departure_time == clock && self.affects_stop(stop)
    }

    /// Swap in an updated copy of the season this exception refers to.
    pub(crate) fn refresh_season(&mut self, updated: &Season) {
        if let ExceptionScope::Weekly { season, .. } = &mut self.scope {
            if season.id() == updated.id() {
                *season = updated.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SeasonId, parse_clock};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summer() -> Season {
        Season::new(SeasonId(1), "summer", 2024, date(2024, 6, 1), date(2024, 8, 31)).unwrap()
    }

    fn draft() -> ExceptionDraft {
        ExceptionDraft {
            id: ExceptionId(1),
            route: RouteId(1),
            stop: Some(StopId(1)),
            valid_date: None,
            weekday: None,
            season: None,
            departure_time: parse_clock("08:30").ok(),
            kind: ExceptionKind::Cancelled,
            active: true,
            notice: None,
        }
    }

    fn weekly(weekday: Weekday) -> ExceptionEntry {
        ExceptionEntry::try_from(ExceptionDraft {
            weekday: Some(weekday),
            season: Some(summer()),
            ..draft()
        })
        .unwrap()
    }

    #[test]
    fn kind_effects() {
        assert_eq!(ExceptionKind::Cancelled.effect(), Effect::Suppress);
        assert_eq!(ExceptionKind::Omitted.effect(), Effect::Suppress);
        assert_eq!(ExceptionKind::Delayed.effect(), Effect::Shift);
        assert_eq!(ExceptionKind::Extra.effect(), Effect::Add);
    }

    #[test]
    fn kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&ExceptionKind::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
        let kind: ExceptionKind = serde_json::from_str("\"EXTRA\"").unwrap();
        assert_eq!(kind, ExceptionKind::Extra);
    }

    #[test]
    fn rejects_both_date_and_weekday() {
        let err = ExceptionEntry::try_from(ExceptionDraft {
            valid_date: Some(date(2024, 6, 3)),
            weekday: Some(Weekday::Mon),
            season: Some(summer()),
            ..draft()
        })
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidException {
                exception: ExceptionId(1),
                reason: "valid date and weekday are mutually exclusive",
            }
        );
    }

    #[test]
    fn rejects_neither_date_nor_weekday() {
        assert!(ExceptionEntry::try_from(draft()).is_err());
    }

    #[test]
    fn rejects_missing_departure_time() {
        let err = ExceptionEntry::try_from(ExceptionDraft {
            valid_date: Some(date(2024, 6, 3)),
            departure_time: None,
            ..draft()
        })
        .unwrap_err();
        assert!(err.to_string().contains("departure time is required"));
    }

    #[test]
    fn rejects_weekday_without_season() {
        assert!(
            ExceptionEntry::try_from(ExceptionDraft {
                weekday: Some(Weekday::Mon),
                ..draft()
            })
            .is_err()
        );
    }

    #[test]
    fn date_scoped_applies_only_on_that_date() {
        let e = ExceptionEntry::try_from(ExceptionDraft {
            valid_date: Some(date(2024, 6, 3)),
            ..draft()
        })
        .unwrap();
        assert!(e.applies_to(date(2024, 6, 3)));
        assert!(!e.applies_to(date(2024, 6, 10)));
        assert_eq!(e.valid_date(), Some(date(2024, 6, 3)));
        assert_eq!(e.weekday(), None);
    }

    #[test]
    fn weekly_applies_on_weekday_inside_season() {
        let e = weekly(Weekday::Mon);
        assert!(e.applies_to(date(2024, 6, 3)));
        assert!(e.applies_to(date(2024, 8, 26)));
        // Tuesday
        assert!(!e.applies_to(date(2024, 6, 4)));
        // Monday after the season
        assert!(!e.applies_to(date(2024, 9, 2)));
    }

    #[test]
    fn inactive_never_applies() {
        let e = ExceptionEntry::try_from(ExceptionDraft {
            valid_date: Some(date(2024, 6, 3)),
            active: false,
            ..draft()
        })
        .unwrap();
        assert!(!e.applies_to(date(2024, 6, 3)));
    }

    #[test]
    fn stop_matching() {
        let pinned = weekly(Weekday::Mon);
        assert!(pinned.affects_stop(StopId(1)));
        assert!(!pinned.affects_stop(StopId(2)));

        let route_wide = ExceptionEntry::try_from(ExceptionDraft {
            stop: None,
            valid_date: Some(date(2024, 6, 3)),
            ..draft()
        })
        .unwrap();
        assert!(route_wide.affects_stop(StopId(1)));
        assert!(route_wide.affects_stop(StopId(2)));
    }

    #[test]
    fn targets_needs_clock_and_stop() {
        let e = weekly(Weekday::Mon);
        assert!(e.targets(parse_clock("08:30").unwrap(), StopId(1)));
        assert!(!e.targets(parse_clock("08:31").unwrap(), StopId(1)));
        assert!(!e.targets(parse_clock("08:30").unwrap(), StopId(2)));
    }

    #[test]
    fn refresh_season_updates_weekly_scope() {
        let mut e = weekly(Weekday::Mon);
        let extended =
            Season::new(SeasonId(1), "summer", 2024, date(2024, 6, 1), date(2024, 9, 30)).unwrap();
        e.refresh_season(&extended);
        assert!(e.applies_to(date(2024, 9, 2)));
    }
}
