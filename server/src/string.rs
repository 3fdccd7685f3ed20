use compact_str::CompactString;
use diesel::AsExpression;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::pg::sql_types::Citext;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt::Display;
use std::ops::Deref;
use std::str::FromStr;
use utoipa::openapi::schema::{ObjectBuilder, Schema, Type};
use utoipa::openapi::RefOr;
use utoipa::{PartialSchema, ToSchema};

/// Inline-optimized string used for nicknames, slugs, titles and other short text.
///
/// Stored as either `TEXT` or `CITEXT`.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text, sql_type = Citext)]
pub struct SmallString(CompactString);

impl SmallString {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(CompactString::new(text))
    }

    pub fn to_lowercase(&self) -> Self {
        Self(self.0.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for SmallString {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for SmallString {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for SmallString {
    type Err = core::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompactString::from_str(s).map(Self)
    }
}

impl From<&str> for SmallString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SmallString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Cow<'_, str>> for SmallString {
    fn from(value: Cow<str>) -> Self {
        Self::new(value)
    }
}

impl Display for SmallString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialSchema for SmallString {
    fn schema() -> RefOr<Schema> {
        RefOr::T(Schema::Object(ObjectBuilder::new().schema_type(Type::String).build()))
    }
}

impl ToSchema for SmallString {}

impl ToSql<Text, Pg> for SmallString {
    fn to_sql<'a>(&'a self, out: &mut Output<'a, '_, Pg>) -> serialize::Result {
        <str as ToSql<Text, Pg>>::to_sql(self.0.as_str(), out)
    }
}

impl ToSql<Citext, Pg> for SmallString {
    fn to_sql<'a>(&'a self, out: &mut Output<'a, '_, Pg>) -> serialize::Result {
        <str as ToSql<Citext, Pg>>::to_sql(self.0.as_str(), out)
    }
}

impl<T> FromSql<T, Pg> for SmallString
where
    String: deserialize::FromSql<T, Pg>,
{
    fn from_sql(value: PgValue<'_>) -> deserialize::Result<Self> {
        CompactString::from_utf8(value.as_bytes()).map(Self).map_err(Box::from)
    }
}
