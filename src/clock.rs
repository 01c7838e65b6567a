use std::fmt;

use chrono::{FixedOffset, NaiveDate, Utc};

/// Source of "today" and the timezone used when comparing kickoff dates.
pub trait Clock: fmt::Debug {
    fn offset(&self) -> FixedOffset;

    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub offset: FixedOffset,
}

impl Clock for FixedClock {
    fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
