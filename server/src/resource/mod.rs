use std::ops::IndexMut;
use std::str::FromStr;

pub mod forum;
pub mod post;
pub mod thread;
pub mod user;

pub trait BoolFill {
    fn filled(val: bool) -> Self;
}

/// Creates a boolean table from a comma separated list of names.
///
/// Empty or unrecognized names are ignored. Absent `names` selects nothing.
pub fn create_table<T, E>(names: Option<&str>) -> T
where
    T: BoolFill + IndexMut<E, Output = bool>,
    E: FromStr,
{
    let mut table = T::filled(false);
    let selected = names
        .into_iter()
        .flat_map(|names| names.split(','))
        .filter_map(|name| E::from_str(name.trim()).ok());
    for entry in selected {
        table[entry] = true;
    }
    table
}
