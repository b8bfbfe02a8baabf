use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use tracing::debug;

const WEEK: [Weekday; 7] = [
  Weekday::Mon,
  Weekday::Tue,
  Weekday::Wed,
  Weekday::Thu,
  Weekday::Fri,
  Weekday::Sat,
  Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSlot {
  Primary,
  Secondary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleRequest {
  pub primary_per_week: usize,
  pub secondary_per_week: usize,
  pub preferred_days: Vec<Weekday>,
  /// When present, used as-is instead of distributing sessions
  pub day_assignments: Vec<(Weekday, SessionSlot)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
  pub primary: Vec<NaiveDate>,
  pub secondary: Vec<NaiveDate>,
}

/// Which weekdays carry primary and secondary sessions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekPlan {
  pub primary: Vec<Weekday>,
  pub secondary: Vec<Weekday>,
}

impl WeekPlan {
  pub fn for_request(request: &ScheduleRequest) -> Self {
    if !request.day_assignments.is_empty() {
      let days = |slot: SessionSlot| {
        sorted_days(
          request
            .day_assignments
            .iter()
            .filter(|(_, s)| *s == slot)
            .map(|(day, _)| *day),
        )
      };
      return Self {
        primary: days(SessionSlot::Primary),
        secondary: days(SessionSlot::Secondary),
      };
    }

    let days = sorted_days(request.preferred_days.iter().copied());
    let total = days.len();
    let mut used = vec![false; total];
    let mut secondary = Vec::new();

    // Spread secondary sessions evenly through the preferred days
    for i in 0..request.secondary_per_week.min(total) {
      let mut index = ((i + 1) * total / (request.secondary_per_week + 1)).min(total - 1);
      while used[index] {
        index = (index + 1) % total;
      }
      used[index] = true;
      secondary.push(days[index]);
    }

    let primary: Vec<Weekday> = days
      .iter()
      .zip(&used)
      .filter(|(_, taken)| !**taken)
      .map(|(day, _)| *day)
      .take(request.primary_per_week)
      .collect();

    // Not enough preferred days: borrow the earliest free days of the week
    for day in WEEK {
      if secondary.len() >= request.secondary_per_week {
        break;
      }
      if !secondary.contains(&day) && !primary.contains(&day) {
        secondary.push(day);
      }
    }

    Self {
      primary,
      secondary: sorted_days(secondary),
    }
  }
}

fn sorted_days(days: impl IntoIterator<Item = Weekday>) -> Vec<Weekday> {
  let mut days: Vec<Weekday> = days.into_iter().collect();
  days.sort_by_key(|d| d.num_days_from_monday());
  days.dedup();
  days
}

/// Dates in `[start, end]` following the weekly plan, week by week
pub fn schedule(start: NaiveDate, end: NaiveDate, request: &ScheduleRequest) -> Schedule {
  let plan = WeekPlan::for_request(request);
  let mut result = Schedule::default();
  if start > end {
    return result;
  }

  let Some(mut monday) = start.checked_sub_days(Days::new(start.weekday().num_days_from_monday() as u64))
  else {
    return result;
  };

  while monday <= end {
    for (days, out) in [(&plan.primary, &mut result.primary), (&plan.secondary, &mut result.secondary)] {
      for day in days {
        let Some(date) = monday.checked_add_days(Days::new(day.num_days_from_monday() as u64)) else {
          continue;
        };
        if date >= start && date <= end {
          out.push(date);
        }
      }
    }
    match monday.checked_add_days(Days::new(7)) {
      Some(next) => monday = next,
      None => break,
    }
  }

  debug!(
    primary = result.primary.len(),
    secondary = result.secondary.len(),
    "Scheduled sessions"
  );
  result
}
