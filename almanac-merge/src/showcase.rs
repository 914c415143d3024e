use almanac_core::{ShowcaseDay, ShowcaseRecord};

/// What happened when a showcase was inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowcaseInsert {
    /// Appended to an existing day.
    AddedToDay { date: String },
    /// A new day was created for it.
    NewDay { date: String },
    /// A showcase with the same title is already listed on that day.
    Duplicate { date: String },
}

impl ShowcaseInsert {
    pub fn is_inserted(&self) -> bool {
        !matches!(self, Self::Duplicate { .. })
    }
}

/// Insert one showcase into a date-ordered list of days.
///
/// The day is found by calendar date, ignoring the time of day. Within a day
/// a showcase is a duplicate when the title matches; two events with the same
/// title on one day are not told apart by their times.
pub fn insert_showcase(days: &mut Vec<ShowcaseDay>, record: ShowcaseRecord) -> ShowcaseInsert {
    let date = record.calendar_date().to_string();

    if let Some(day) = days.iter_mut().find(|d| d.calendar_date() == date) {
        if day.showcases.iter().any(|s| s.title == record.title) {
            return ShowcaseInsert::Duplicate { date };
        }
        day.showcases.push(record);
        return ShowcaseInsert::AddedToDay { date };
    }

    let new_day = ShowcaseDay {
        date: date.clone(),
        showcases: vec![record],
    };
    match days.iter().position(|d| d.date > date) {
        Some(pos) => days.insert(pos, new_day),
        None => days.push(new_day),
    }
    ShowcaseInsert::NewDay { date }
}
