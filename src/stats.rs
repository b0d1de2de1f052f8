use crate::models::{
    ActivityPoint, AggregateStats, CalendarMark, DailyTotal, Habit, HabitSummary, MarkStatus,
};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

const WEEK_DAYS: i64 = 7;

pub fn weekly_activity(habit: &Habit, today: NaiveDate) -> Vec<ActivityPoint> {
    last_week(today)
        .map(|date| ActivityPoint {
            date,
            label: day_label(date),
            value: u8::from(habit.is_completed_on(date)),
        })
        .collect()
}

pub fn monthly_marks(habit: &Habit, today: NaiveDate) -> Vec<CalendarMark> {
    let first = today.with_day(1).unwrap_or(today);
    first
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| {
            let status = if habit.is_completed_on(date) {
                MarkStatus::Completed
            } else if date == today {
                MarkStatus::Pending
            } else {
                MarkStatus::Missed
            };
            CalendarMark { date, status }
        })
        .collect()
}

pub fn aggregate_stats(habits: &[Habit]) -> AggregateStats {
    let total_completions = habits.iter().map(|h| u64::from(h.total_completed)).sum();
    let streak_sum: u64 = habits.iter().map(|h| u64::from(h.streak)).sum();
    let avg_streak = if habits.is_empty() {
        0.0
    } else {
        streak_sum as f64 / habits.len() as f64
    };

    AggregateStats {
        habit_count: habits.len(),
        total_completions,
        avg_streak,
    }
}

pub fn daily_totals(habits: &[Habit], today: NaiveDate) -> Vec<DailyTotal> {
    last_week(today)
        .map(|date| DailyTotal {
            date,
            label: day_label(date),
            completed: habits.iter().filter(|h| h.is_completed_on(date)).count() as u32,
        })
        .collect()
}

pub fn overview_marks(habits: &[Habit]) -> BTreeMap<NaiveDate, u32> {
    let mut marks = BTreeMap::new();
    for date in habits.iter().flat_map(Habit::completed_days) {
        *marks.entry(date).or_insert(0) += 1;
    }
    marks
}

pub fn habit_summary(habit: &Habit, today: NaiveDate) -> HabitSummary {
    HabitSummary {
        id: habit.id.clone(),
        title: habit.title.clone(),
        total_completed: habit.total_completed,
        streak: habit.streak,
        longest_streak: habit.longest_streak,
        completed_today: habit.is_completed_on(today),
    }
}

fn last_week(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..WEEK_DAYS).rev().map(move |offset| today - Duration::days(offset))
}

fn day_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DEFAULT_COLOR, DEFAULT_ICON};

    fn habit_with(dates: &[NaiveDate], streak: u32) -> Habit {
        Habit {
            id: "1".into(),
            title: "Read".into(),
            description: None,
            icon: DEFAULT_ICON.into(),
            color: DEFAULT_COLOR.into(),
            start_date: None,
            reminder: false,
            reminder_time: None,
            completed_dates: dates.iter().map(|d| (*d, true)).collect(),
            streak,
            longest_streak: streak,
            total_completed: dates.len() as u32,
        }
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn weekly_activity_without_completions_is_all_zero() {
        let points = weekly_activity(&habit_with(&[], 0), date(1, 5));
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p.value == 0));
        assert_eq!(points[0].date, date(12, 30).with_year(2025).unwrap());
        assert_eq!(points[6].date, date(1, 5));
        assert_eq!(points[6].label, "Mon");
    }

    #[test]
    fn weekly_activity_marks_completed_days() {
        let today = date(1, 5);
        let habit = habit_with(&[date(1, 3), date(1, 5), date(1, 10)], 2);
        let values: Vec<u8> = weekly_activity(&habit, today).iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0, 0, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn monthly_marks_stop_at_today() {
        let today = date(2, 4);
        let habit = habit_with(&[date(1, 31), date(2, 2), date(2, 10)], 1);
        let marks = monthly_marks(&habit, today);

        let statuses: Vec<MarkStatus> = marks.iter().map(|m| m.status).collect();
        assert_eq!(
            statuses,
            vec![MarkStatus::Missed, MarkStatus::Completed, MarkStatus::Missed, MarkStatus::Pending]
        );
        assert_eq!(marks[0].date, date(2, 1));
    }

    #[test]
    fn monthly_marks_on_first_day_completed() {
        let today = date(3, 1);
        let marks = monthly_marks(&habit_with(&[today], 1), today);
        assert_eq!(marks, vec![CalendarMark { date: today, status: MarkStatus::Completed }]);
    }

    #[test]
    fn aggregate_of_nothing_is_zero() {
        let stats = aggregate_stats(&[]);
        assert_eq!(stats.habit_count, 0);
        assert_eq!(stats.total_completions, 0);
        assert_eq!(stats.avg_streak, 0.0);
    }

    #[test]
    fn aggregate_sums_and_averages() {
        let habits = vec![
            habit_with(&[date(1, 1), date(1, 2)], 2),
            habit_with(&[date(1, 2)], 1),
        ];
        let stats = aggregate_stats(&habits);
        assert_eq!(stats.total_completions, 3);
        assert_eq!(stats.avg_streak, 1.5);
    }

    #[test]
    fn daily_totals_and_overview_count_habits_per_day() {
        let habits = vec![
            habit_with(&[date(1, 1), date(1, 2)], 2),
            habit_with(&[date(1, 2)], 1),
        ];
        let totals = daily_totals(&habits, date(1, 2));
        let counts: Vec<u32> = totals.iter().map(|t| t.completed).collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 0, 1, 2]);

        let overview = overview_marks(&habits);
        assert_eq!(overview.len(), 2);
        assert_eq!(overview[&date(1, 2)], 2);
    }
}
