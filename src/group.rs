use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::table::Table;

/// Group identifier taken from the group key column. Integer ids compare
/// numerically and sort before free-form text ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Int(i64),
    Text(String),
}

impl GroupKey {
    pub fn parse(cell: &str) -> Self {
        let trimmed = cell.trim();
        match trimmed.parse::<i64>() {
            Ok(id) => GroupKey::Int(id),
            Err(_) => GroupKey::Text(trimmed.to_string()),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Int(id) => write!(f, "{}", id),
            GroupKey::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Row indices of each group, keyed and iterated in ascending key order.
pub type Groups = BTreeMap<GroupKey, Vec<usize>>;

pub fn partition(table: &Table, group_key: &str) -> Result<Groups> {
    let mut groups = Groups::new();
    for (i, cell) in table.column(group_key)?.enumerate() {
        groups.entry(GroupKey::parse(cell)).or_default().push(i);
    }
    Ok(groups)
}
