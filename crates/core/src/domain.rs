use chrono::NaiveDate;
use serde::Serialize;

/// User selection meaning "every participant".
pub const OVERALL: &str = "Overall";

/// Exact message text the export writes in place of an attachment.
pub const MEDIA_PLACEHOLDER: &str = "<Media omitted>\n";

/// Pseudo-user the parser assigns to system notices (joins, subject changes).
pub const GROUP_NOTIFICATION: &str = "group_notification";

/// Calendar fields derived from a message timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeFields {
    pub year: i32,
    /// Full month name, e.g. "January".
    pub month: String,
    /// 1-based month number.
    pub month_num: u32,
    /// Full weekday name, e.g. "Monday".
    pub day_name: String,
    pub only_date: NaiveDate,
    /// Hour bucket label such as "13-14".
    pub period: String,
}

/// One chat message with its pre-derived time metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRecord {
    pub user: String,
    pub message: String,
    pub year: i32,
    pub month: String,
    pub month_num: u32,
    pub day_name: String,
    pub only_date: NaiveDate,
    pub period: String,
}

impl ChatRecord {
    pub fn new(user: impl Into<String>, message: impl Into<String>, time: TimeFields) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
            year: time.year,
            month: time.month,
            month_num: time.month_num,
            day_name: time.day_name,
            only_date: time.only_date,
            period: time.period,
        }
    }

    pub fn is_media(&self) -> bool {
        self.message == MEDIA_PLACEHOLDER
    }

    pub fn is_notification(&self) -> bool {
        self.user == GROUP_NOTIFICATION
    }
}
