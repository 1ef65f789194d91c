use crate::objects::Calendar;
use crate::Feed;
use chrono::Weekday;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The usual buckets of a timetable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServicePattern {
    /// Monday to Friday, resolved through Monday
    Weekday,
    Saturday,
    Sunday,
}

/// The service running on each day of the week
///
/// Built from calendar.txt: a day gets the first service of the file active that day.
/// The validity dates of the calendars and calendar_dates.txt exceptions are ignored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Schedule {
    services: [Option<String>; 7],
}

impl Schedule {
    pub fn from_calendars<'a>(calendars: impl IntoIterator<Item = &'a Calendar>) -> Self {
        let mut schedule = Schedule::default();
        for calendar in calendars {
            for (day, service) in WEEK.iter().zip(schedule.services.iter_mut()) {
                if service.is_none() && calendar.runs_on(*day) {
                    *service = Some(calendar.id.clone());
                }
            }
        }
        schedule
    }

    /// The service of a day of the week
    pub fn service(&self, day: Weekday) -> Option<&str> {
        self.services[day.num_days_from_monday() as usize].as_deref()
    }

    /// The service of a day given as its index, 0 is Monday and 6 is Sunday
    pub fn service_by_index(&self, day: usize) -> Option<&str> {
        self.services.get(day).and_then(|s| s.as_deref())
    }

    pub fn pattern(&self, pattern: ServicePattern) -> Option<&str> {
        match pattern {
            ServicePattern::Weekday => self.service(Weekday::Mon),
            ServicePattern::Saturday => self.service(Weekday::Sat),
            ServicePattern::Sunday => self.service(Weekday::Sun),
        }
    }

    /// The days having a service, from Monday to Sunday
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &str)> {
        WEEK.iter()
            .zip(self.services.iter())
            .filter_map(|(day, service)| service.as_deref().map(|s| (*day, s)))
    }
}

impl Feed {
    /// The service running on each day of the week, see [Schedule]
    pub fn schedule(&self) -> Schedule {
        Schedule::from_calendars(self.calendar.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn calendar(id: &str, days: [bool; 7]) -> Calendar {
        Calendar {
            id: id.to_owned(),
            monday: days[0],
            tuesday: days[1],
            wednesday: days[2],
            thursday: days[3],
            friday: days[4],
            saturday: days[5],
            sunday: days[6],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        }
    }

    #[test]
    fn first_active_service_of_each_day() {
        let calendars = vec![
            calendar("week", [true, true, true, true, true, false, false]),
            calendar("weekend", [false, false, false, false, false, true, true]),
            calendar("sunday", [false, false, false, false, false, false, true]),
            calendar("daily", [true; 7]),
        ];
        let schedule = Schedule::from_calendars(&calendars);
        assert_eq!(Some("week"), schedule.service(Weekday::Fri));
        assert_eq!(Some("weekend"), schedule.service(Weekday::Sat));
        assert_eq!(Some("weekend"), schedule.service(Weekday::Sun));
        assert_eq!(Some("week"), schedule.pattern(ServicePattern::Weekday));
        assert_eq!(Some("weekend"), schedule.service_by_index(6));
        assert_eq!(None, schedule.service_by_index(7));
    }

    #[test]
    fn days_without_service() {
        let calendars = vec![calendar(
            "saturday",
            [false, false, false, false, false, true, false],
        )];
        let schedule = Schedule::from_calendars(&calendars);
        assert_eq!(None, schedule.pattern(ServicePattern::Weekday));
        assert_eq!(Some("saturday"), schedule.pattern(ServicePattern::Saturday));
        assert_eq!(
            vec![(Weekday::Sat, "saturday")],
            schedule.iter().collect::<Vec<_>>()
        );
        assert_eq!(Schedule::default(), Schedule::from_calendars(&Vec::<Calendar>::new()));
    }
}
