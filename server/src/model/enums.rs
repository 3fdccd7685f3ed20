use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::SmallInt;
use diesel::{AsExpression, FromSqlRow};
use strum::{Display, EnumString, FromRepr};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Failed to deserialize voice")]
struct DeserializeVoiceError;

/// A single user's opinion of a thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromRepr, AsExpression, FromSqlRow)]
#[diesel(sql_type = SmallInt)]
#[repr(i16)]
pub enum Voice {
    Down = -1,
    Up = 1,
}

impl Voice {
    /// Converts a client-supplied voice into a [`Voice`]. Anything other than -1 or 1 is rejected.
    pub fn new(value: i64) -> Option<Self> {
        i16::try_from(value).ok().and_then(Self::from_repr)
    }

    pub fn value(self) -> i64 {
        i64::from(self as i16)
    }
}

impl ToSql<SmallInt, Pg> for Voice
where
    i16: ToSql<SmallInt, Pg>,
{
    fn to_sql(&self, out: &mut Output<Pg>) -> serialize::Result {
        let value = *self as i16;
        <i16 as ToSql<SmallInt, Pg>>::to_sql(&value, &mut out.reborrow())
    }
}

impl FromSql<SmallInt, Pg> for Voice
where
    i16: FromSql<SmallInt, Pg>,
{
    fn from_sql(bytes: <Pg as diesel::backend::Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let database_value = i16::from_sql(bytes)?;
        Voice::from_repr(database_value).ok_or(DeserializeVoiceError.into())
    }
}

/// Ordering used when listing the posts of a thread.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PostSort {
    /// Chronological, ties broken by id.
    #[default]
    Flat,
    /// Depth-first pre-order over the whole comment tree.
    Tree,
    /// Depth-first pre-order, paginated by top-level posts.
    ParentTree,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceType {
    Forum,
    #[strum(serialize = "parent post")]
    ParentPost,
    Post,
    Thread,
    User,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum ResourceProperty {
    #[strum(serialize = "Forum slug")]
    ForumSlug,
    #[strum(serialize = "Thread slug")]
    ThreadSlug,
    #[strum(serialize = "User email")]
    UserEmail,
    #[strum(serialize = "Vote")]
    Vote,
}
