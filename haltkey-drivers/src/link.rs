//! USB host link state
//!
//! Follows the device-level USB events and answers one question for the
//! keyboard sink: can a report reach the host right now? Suspend only
//! pauses the link; the configuration survives it, so a resume makes the
//! link usable again without a new SET_CONFIGURATION.

/// Host connection tracker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostLink {
    /// Host has selected a configuration
    configured: bool,
    /// Bus is suspended
    suspended: bool,
}

impl HostLink {
    /// Link before enumeration
    pub const fn new() -> Self {
        Self {
            configured: false,
            suspended: false,
        }
    }

    /// Bus enabled or disabled (cable attach/detach)
    pub fn enabled(&mut self, enabled: bool) {
        if !enabled {
            *self = Self::new();
        }
    }

    /// Bus reset by the host; enumeration starts over
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Configuration selected or cleared by the host
    pub fn configured(&mut self, configured: bool) {
        self.configured = configured;
    }

    /// Bus suspended or resumed
    pub fn suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    /// Check if the host has configured the device
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Check if a report can reach the host
    pub fn is_usable(&self) -> bool {
        self.configured && !self.suspended
    }
}
