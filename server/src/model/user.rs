use crate::schema::user;
use crate::string::SmallString;
use diesel::pg::Pg;
use diesel::prelude::*;

#[derive(Insertable)]
#[diesel(table_name = user)]
#[diesel(check_for_backend(Pg))]
pub struct NewUser<'a> {
    pub nickname: &'a str,
    pub fullname: &'a str,
    pub about: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = user)]
#[diesel(check_for_backend(Pg))]
pub struct User {
    pub id: i64,
    pub nickname: SmallString,
    pub fullname: String,
    pub about: String,
    pub email: SmallString,
}

/// Profile fields that can be changed after creation. `None` fields are left untouched.
#[derive(Default, AsChangeset)]
#[diesel(table_name = user)]
#[diesel(check_for_backend(Pg))]
pub struct UserChanges<'a> {
    pub fullname: Option<&'a str>,
    pub about: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl UserChanges<'_> {
    pub fn is_empty(&self) -> bool {
        self.fullname.is_none() && self.about.is_none() && self.email.is_none()
    }
}
