use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let last = existing
            .into_iter()
            .filter_map(timestamp_millis)
            .max()
            .unwrap_or(0);
        Self { last }
    }

    pub fn next_id(&mut self) -> String {
        self.next_at(Utc::now())
    }

    fn next_at(&mut self, now: DateTime<Utc>) -> String {
        let candidate = now.timestamp_millis();
        self.last = if candidate > self.last { candidate } else { self.last + 1 };
        self.last.to_string()
    }
}

pub fn created_on(id: &str) -> Option<NaiveDate> {
    let millis = timestamp_millis(id)?;
    DateTime::from_timestamp_millis(millis).map(|at| at.date_naive())
}

// Millisecond timestamps between 2001-09-09 and 2286-11-20 have 13 digits.
fn timestamp_millis(id: &str) -> Option<i64> {
    if id.len() != 13 || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut ids = IdGenerator::default();
        let now = Utc::now();
        let first = ids.next_at(now);
        let second = ids.next_at(now);
        assert_ne!(first, second);
        assert_eq!(second.parse::<i64>().unwrap(), first.parse::<i64>().unwrap() + 1);
    }

    #[test]
    fn seeded_generator_skips_existing_ids() {
        let far_future = "9999999999990";
        let mut ids = IdGenerator::after(["12", far_future, "not-a-number"]);
        assert_eq!(ids.next_id(), "9999999999991");
    }

    #[test]
    fn huge_numeric_ids_do_not_seed_the_generator() {
        let mut ids = IdGenerator::after(["9223372036854775807", "99999999999999"]);
        let id = ids.next_id();
        assert_eq!(id.len(), 13);
        assert_ne!(ids.next_id(), id);
    }

    #[test]
    fn created_on_reads_timestamp_ids() {
        assert_eq!(created_on("1767225600000"), NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(created_on("abc"), None);
        assert_eq!(created_on("1"), None);
        assert_eq!(created_on("9223372036854775807"), None);
    }
}
