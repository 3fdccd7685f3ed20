use crate::schema::post;
use crate::string::SmallString;
use crate::time::DateTime;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::{Array, BigInt};

/// Ancestry of a post: the ids of every ancestor from the root down, ending with the post's own id.
///
/// Ordering is lexicographic with a proper prefix sorting first, matching PostgreSQL's array
/// comparison. Sorting posts by path therefore yields a depth-first pre-order of the comment tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Array<BigInt>)]
pub struct PostPath(Vec<i64>);

impl PostPath {
    /// Path of a top-level post.
    pub fn root(id: i64) -> Self {
        Self(vec![id])
    }

    /// Path of a new post with id `id` replying to the post with this path.
    pub fn child(&self, id: i64) -> Self {
        let mut ids = Vec::with_capacity(self.0.len() + 1);
        ids.extend_from_slice(&self.0);
        ids.push(id);
        Self(ids)
    }

    /// Id of the top-level post this path descends from.
    pub fn root_id(&self) -> Option<i64> {
        self.0.first().copied()
    }
}

#[cfg(test)]
impl PostPath {
    /// Id of the post this path belongs to.
    pub fn id(&self) -> Option<i64> {
        self.0.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn ids(&self) -> &[i64] {
        &self.0
    }
}

impl From<Vec<i64>> for PostPath {
    fn from(value: Vec<i64>) -> Self {
        Self(value)
    }
}

impl ToSql<Array<BigInt>, Pg> for PostPath {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        <Vec<i64> as ToSql<Array<BigInt>, Pg>>::to_sql(&self.0, out)
    }
}

impl FromSql<Array<BigInt>, Pg> for PostPath {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        <Vec<i64> as FromSql<Array<BigInt>, Pg>>::from_sql(bytes).map(Self)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = post)]
#[diesel(check_for_backend(Pg))]
pub struct NewPost {
    pub id: i64,
    pub parent: i64,
    pub author: SmallString,
    pub message: String,
    pub forum_slug: SmallString,
    pub thread_id: i64,
    pub created: DateTime,
    pub path: PostPath,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = post)]
#[diesel(check_for_backend(Pg))]
pub struct Post {
    pub id: i64,
    pub parent: i64,
    pub author: SmallString,
    pub message: String,
    pub is_edited: bool,
    pub forum_slug: SmallString,
    pub thread_id: i64,
    pub created: DateTime,
    pub path: PostPath,
}
