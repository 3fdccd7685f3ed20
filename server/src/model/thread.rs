use crate::schema::thread;
use crate::string::SmallString;
use crate::time::DateTime;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde_with::DeserializeFromStr;
use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Insertable)]
#[diesel(table_name = thread)]
#[diesel(check_for_backend(Pg))]
pub struct NewThread<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub forum_slug: &'a str,
    pub message: &'a str,
    pub slug: Option<&'a str>,
    pub created: DateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = thread)]
#[diesel(check_for_backend(Pg))]
pub struct Thread {
    pub id: i64,
    pub title: String,
    pub author: SmallString,
    pub forum_slug: SmallString,
    pub message: String,
    pub slug: Option<SmallString>,
    pub votes: i64,
    pub created: DateTime,
}

#[derive(Default, AsChangeset)]
#[diesel(table_name = thread)]
#[diesel(check_for_backend(Pg))]
pub struct ThreadChanges<'a> {
    pub title: Option<&'a str>,
    pub message: Option<&'a str>,
}

impl ThreadChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.message.is_none()
    }
}

/// Identifies a thread in a url. Purely numeric identifiers are ids, anything else is a slug.
#[derive(Debug, Clone, PartialEq, Eq, DeserializeFromStr)]
pub enum ThreadRef {
    Id(i64),
    Slug(SmallString),
}

impl ThreadRef {
    /// Retrieves the referenced thread, if it exists.
    pub fn get(&self, conn: &mut PgConnection) -> QueryResult<Option<Thread>> {
        let query = thread::table.select(Thread::as_select()).into_boxed();
        let query = match self {
            Self::Id(id) => query.filter(thread::id.eq(*id)),
            Self::Slug(slug) => query.filter(thread::slug.eq(slug)),
        };
        query.first(conn).optional()
    }
}

impl FromStr for ThreadRef {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Slug(SmallString::new(s)),
        })
    }
}

impl Display for ThreadRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => id.fmt(f),
            Self::Slug(slug) => slug.fmt(f),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_thread_ref() {
        assert_eq!("42".parse(), Ok(ThreadRef::Id(42)));
        assert_eq!("0".parse(), Ok(ThreadRef::Id(0)));
        assert_eq!("my-thread".parse(), Ok(ThreadRef::Slug(SmallString::new("my-thread"))));
        assert_eq!("42a".parse(), Ok(ThreadRef::Slug(SmallString::new("42a"))));
        assert_eq!(ThreadRef::Id(7).to_string(), "7");
    }
}
