use crate::model::enums::Voice;
use crate::schema::vote;
use crate::string::SmallString;
use diesel::pg::Pg;
use diesel::prelude::*;

#[derive(Insertable)]
#[diesel(table_name = vote)]
#[diesel(check_for_backend(Pg))]
pub struct NewVote<'a> {
    pub nickname: &'a str,
    pub thread_id: i64,
    pub voice: Voice,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = vote)]
#[diesel(check_for_backend(Pg))]
pub struct Vote {
    pub nickname: SmallString,
    pub thread_id: i64,
    pub voice: Voice,
}
