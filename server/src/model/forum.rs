use crate::schema::forum;
use crate::string::SmallString;
use diesel::pg::Pg;
use diesel::prelude::*;

#[derive(Insertable)]
#[diesel(table_name = forum)]
#[diesel(check_for_backend(Pg))]
pub struct NewForum<'a> {
    pub title: &'a str,
    pub owner: &'a str,
    pub slug: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = forum)]
#[diesel(check_for_backend(Pg))]
pub struct Forum {
    pub id: i64,
    pub title: String,
    pub owner: SmallString,
    pub slug: SmallString,
    pub post_count: i64,
    pub thread_count: i64,
}

