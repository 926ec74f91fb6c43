//! User and group resolution
//!
//! Alerts carry numeric ids. Name lookups go through `IdentityResolver` so
//! the record itself never touches the OS.

use nix::unistd::{getuid, Group, User};

/// Name → numeric id lookups
pub trait IdentityResolver {
    fn user_id(&self, name: &str) -> Option<u32>;
    fn group_id(&self, name: &str) -> Option<u32>;
}

/// Resolver backed by the system user and group databases
///
/// Goes through the C library's `getpwnam_r`/`getgrnam_r`, so any configured
/// name service (files, LDAP, sssd) is consulted. Purely numeric names
/// resolve to themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentities;

impl SystemIdentities {
    pub fn new() -> Self {
        Self
    }
}

impl IdentityResolver for SystemIdentities {
    fn user_id(&self, name: &str) -> Option<u32> {
        if let Ok(id) = name.parse::<u32>() {
            return Some(id);
        }
        match User::from_name(name) {
            Ok(user) => user.map(|u| u.uid.as_raw()),
            Err(e) => {
                tracing::debug!("User lookup for {} failed: {}", name, e);
                None
            }
        }
    }

    fn group_id(&self, name: &str) -> Option<u32> {
        if let Ok(id) = name.parse::<u32>() {
            return Some(id);
        }
        match Group::from_name(name) {
            Ok(group) => group.map(|g| g.gid.as_raw()),
            Err(e) => {
                tracing::debug!("Group lookup for {} failed: {}", name, e);
                None
            }
        }
    }
}

/// Real uid of the running process
pub fn current_uid() -> u32 {
    getuid().as_raw()
}
