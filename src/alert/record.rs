//! Alert record
//!
//! The domain entity exchanged with the daemon.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use super::identity::{current_uid, IdentityResolver};

/// Alert flag bits
///
/// Level bits are mutually exclusive by convention only. Unnamed bits are
/// reserved and carried through unchanged.
pub struct AlertFlags;

impl AlertFlags {
    pub const NULL: u32 = 0;

    // Severity levels
    pub const LVL_NORM: u32 = 0x0000_0001;
    pub const LVL_WARN: u32 = 0x0000_0002;
    pub const LVL_CRIT: u32 = 0x0000_0004;

    // State bits
    pub const FLG_PERSIST: u32 = 0x0000_0100;
    pub const FLG_READ: u32 = 0x0000_0200;
}

/// The unclassified alert type
pub const ALERT_TYPE_NULL: u32 = 0;

/// Severity level derived from the flag bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Normal,
    Warning,
    Critical,
}

impl Level {
    pub fn flag(self) -> u32 {
        match self {
            Level::Normal => AlertFlags::LVL_NORM,
            Level::Warning => AlertFlags::LVL_WARN,
            Level::Critical => AlertFlags::LVL_CRIT,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Normal => f.pad("NORMAL"),
            Level::Warning => f.pad("WARNING"),
            Level::Critical => f.pad("CRITICAL"),
        }
    }
}

/// One monitoring event
///
/// `id` 0 means unassigned; the daemon fills it in on insert. Empty strings
/// are stored as `None` since the wire cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub(crate) id: u64,
    pub(crate) stamp: u32,
    pub(crate) flags: u32,
    pub(crate) alert_type: u32,
    pub(crate) user: u32,
    pub(crate) groups: Vec<u32>,
    pub(crate) uuid: Option<String>,
    pub(crate) icon: Option<String>,
    pub(crate) description: Option<String>,
}

impl Default for Alert {
    fn default() -> Self {
        Self::new()
    }
}

impl Alert {
    /// Create an alert stamped now and owned by the current process user
    pub fn new() -> Self {
        Self {
            id: 0,
            stamp: now(),
            flags: AlertFlags::NULL,
            alert_type: ALERT_TYPE_NULL,
            user: current_uid(),
            groups: Vec::new(),
            uuid: None,
            icon: None,
            description: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Seconds since the Unix epoch
    pub fn stamp(&self) -> u32 {
        self.stamp
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn alert_type(&self) -> u32 {
        self.alert_type
    }

    pub fn user(&self) -> u32 {
        self.user
    }

    pub fn groups(&self) -> &[u32] {
        &self.groups
    }

    pub fn uuid(&self) -> Option<&str> {
        self.uuid.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag == flag
    }

    /// Most severe level bit set, if any
    pub fn level(&self) -> Option<Level> {
        [Level::Critical, Level::Warning, Level::Normal]
            .into_iter()
            .find(|level| self.has_flag(level.flag()))
    }

    pub fn is_persistent(&self) -> bool {
        self.has_flag(AlertFlags::FLG_PERSIST)
    }

    pub fn is_read(&self) -> bool {
        self.has_flag(AlertFlags::FLG_READ)
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    pub fn set_id(&mut self, id: u64) -> &mut Self {
        self.id = id;
        self
    }

    /// Set the timestamp, `None` meaning now
    pub fn set_stamp(&mut self, stamp: Option<u32>) -> &mut Self {
        self.stamp = stamp.unwrap_or_else(now);
        self
    }

    pub fn set_flags(&mut self, flags: u32) -> &mut Self {
        self.flags = flags;
        self
    }

    pub fn set_flag(&mut self, flag: u32) -> &mut Self {
        self.flags |= flag;
        self
    }

    pub fn clear_flag(&mut self, flag: u32) -> &mut Self {
        self.flags &= !flag;
        self
    }

    /// Replace any level bits with `level`
    pub fn set_level(&mut self, level: Level) -> &mut Self {
        self.flags &= !(AlertFlags::LVL_NORM | AlertFlags::LVL_WARN | AlertFlags::LVL_CRIT);
        self.flags |= level.flag();
        self
    }

    pub fn set_type(&mut self, alert_type: u32) -> &mut Self {
        self.alert_type = alert_type;
        self
    }

    pub fn set_user(&mut self, uid: u32) -> &mut Self {
        self.user = uid;
        self
    }

    /// Resolve a user name and make it the owner
    ///
    /// Returns false and leaves the owner unchanged if the name is unknown.
    pub fn set_user_by_name(&mut self, name: &str, resolver: &dyn IdentityResolver) -> bool {
        match resolver.user_id(name) {
            Some(uid) => {
                self.user = uid;
                true
            }
            None => false,
        }
    }

    pub fn add_group(&mut self, gid: u32) -> &mut Self {
        self.groups.push(gid);
        self
    }

    /// Resolve a group name and append it
    ///
    /// Returns false and leaves the group list unchanged if the name is
    /// unknown.
    pub fn add_group_by_name(&mut self, name: &str, resolver: &dyn IdentityResolver) -> bool {
        match resolver.group_id(name) {
            Some(gid) => {
                self.groups.push(gid);
                true
            }
            None => false,
        }
    }

    pub fn clear_groups(&mut self) -> &mut Self {
        self.groups.clear();
        self
    }

    pub fn set_uuid(&mut self, uuid: impl Into<String>) -> &mut Self {
        self.uuid = non_empty(uuid.into());
        self
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) -> &mut Self {
        self.icon = non_empty(icon.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = non_empty(description.into());
        self
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:<10} {:<12}", self.id, self.stamp)?;
        match self.level() {
            Some(level) => write!(f, " {:<8}", level)?,
            None => write!(f, " {:<8}", "-")?,
        }
        write!(
            f,
            " type={} [{}{}]",
            self.alert_type,
            if self.is_persistent() { 'p' } else { '-' },
            if self.is_read() { 'r' } else { '-' },
        )
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().min(u32::MAX as u64) as u32)
        .unwrap_or(0)
}
