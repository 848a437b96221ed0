use chrono::{Datelike, NaiveDate, Weekday};

// NYSE full-day closures in 2024.
const NYSE_HOLIDAYS_2024: [(u32, u32); 10] = [
    (1, 1),
    (1, 15),
    (2, 19),
    (3, 29),
    (5, 27),
    (6, 19),
    (7, 4),
    (9, 2),
    (11, 28),
    (12, 25),
];

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Regular New York session on `date`. Holidays are only known for 2024.
pub fn is_nyse_session(date: NaiveDate) -> bool {
    if is_weekend(date) {
        return false;
    }
    !(date.year() == 2024 && NYSE_HOLIDAYS_2024.contains(&(date.month(), date.day())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_twenty_four_has_252_sessions() {
        let sessions = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .iter_days()
            .take_while(|d| d.year() == 2024)
            .filter(|d| is_nyse_session(*d))
            .count();
        assert_eq!(sessions, 252);
    }
}
