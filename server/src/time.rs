use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Timestamptz;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use time::serde::rfc3339;
use time::{Duration, OffsetDateTime};
use utoipa::openapi::RefOr;
use utoipa::openapi::schema::{KnownFormat, ObjectBuilder, Schema, SchemaFormat, Type};
use utoipa::{PartialSchema, ToSchema};

/// Logs how long it took between construction and drop.
pub struct Timer<'a> {
    name: &'a str,
    start: std::time::Instant,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        let elapsed_time = self.start.elapsed();
        let time_in_s = elapsed_time.as_secs_f32();
        match elapsed_time.as_nanos().checked_ilog10().unwrap_or(0) {
            0..3 => tracing::debug!("{} took {:.1}ns", self.name, time_in_s * 1e9),
            3..6 => tracing::debug!("{} took {:.1}μs", self.name, time_in_s * 1e6),
            6..9 => tracing::debug!("{} took {:.1}ms", self.name, time_in_s * 1e3),
            9..12 => tracing::debug!("{} took {:.1}s", self.name, time_in_s),
            12.. => tracing::debug!("{} took {:.0}s", self.name, time_in_s),
        }
    }
}

// A wrapper for time::OffsetDateTime that serializes/deserializes according to RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Timestamptz)]
pub struct DateTime(#[serde(with = "rfc3339")] OffsetDateTime);

impl DateTime {
    /// Current UTC time, truncated to millisecond precision.
    pub fn now() -> Self {
        Self::from(OffsetDateTime::now_utc()).truncated()
    }

    /// Drops everything below millisecond precision.
    pub fn truncated(self) -> Self {
        let sub_millisecond = i64::from(self.0.nanosecond() % 1_000_000);
        Self(self.0 - Duration::nanoseconds(sub_millisecond))
    }
}

impl Deref for DateTime {
    type Target = OffsetDateTime;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<OffsetDateTime> for DateTime {
    fn from(value: OffsetDateTime) -> Self {
        DateTime(value)
    }
}

impl PartialSchema for DateTime {
    fn schema() -> RefOr<Schema> {
        let object = ObjectBuilder::new()
            .schema_type(Type::String)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::DateTime)))
            .build();
        RefOr::T(Schema::Object(object))
    }
}

impl ToSchema for DateTime {}

impl<DB: Backend> ToSql<Timestamptz, DB> for DateTime
where
    OffsetDateTime: ToSql<Timestamptz, DB>,
{
    fn to_sql<'a>(&'a self, out: &mut Output<'a, '_, DB>) -> serialize::Result {
        self.0.to_sql(out)
    }
}

impl<DB: Backend> FromSql<Timestamptz, DB> for DateTime
where
    OffsetDateTime: FromSql<Timestamptz, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> deserialize::Result<Self> {
        OffsetDateTime::from_sql(bytes).map(DateTime)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn truncation() {
        let precise = DateTime::from(datetime!(2024-03-01 12:30:45.123_456_789 UTC));
        let truncated = precise.truncated();
        assert_eq!(truncated.nanosecond(), 123_000_000);
        assert_eq!(truncated.second(), 45);
        assert!(truncated <= precise);

        let now = DateTime::now();
        assert_eq!(now.nanosecond() % 1_000_000, 0);
    }

    #[test]
    fn rfc3339_format() {
        let time = DateTime::from(datetime!(2024-03-01 12:30:45.5 UTC));
        let json = serde_json::to_string(&time).unwrap();
        assert!(json.starts_with("\"2024-03-01T12:30:45.5"));

        let parsed: DateTime = serde_json::from_str("\"2024-03-01T15:30:45.5+03:00\"").unwrap();
        assert_eq!(parsed, time);
    }
}
