//! uid/gid to name resolution

use std::collections::HashMap;

use uzers::{get_group_by_gid, get_user_by_uid};

/// Caches account lookups for the lifetime of one listing. A miss is
/// cached too, so an unknown id costs one lookup.
#[derive(Debug, Default)]
pub struct OwnerCache {
    users: HashMap<u32, Option<String>>,
    groups: HashMap<u32, Option<String>>,
}

impl OwnerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// User name for `uid`, or the number when it has no name.
    pub fn user(&mut self, uid: u32) -> String {
        self.users
            .entry(uid)
            .or_insert_with(|| get_user_by_uid(uid).map(|u| u.name().to_string_lossy().into_owned()))
            .clone()
            .unwrap_or_else(|| uid.to_string())
    }

    /// Group name for `gid`, or the number when it has no name.
    pub fn group(&mut self, gid: u32) -> String {
        self.groups
            .entry(gid)
            .or_insert_with(|| get_group_by_gid(gid).map(|g| g.name().to_string_lossy().into_owned()))
            .clone()
            .unwrap_or_else(|| gid.to_string())
    }
}
