//! Safety state definition
//!
//! The device is unsafe whenever the stop switch is engaged or the key
//! cylinder is locked. There is no latch and no hysteresis: the state is
//! recomputed from the live inputs on every iteration.

/// Input levels captured in one loop iteration
///
/// Values are logical, already corrected for wiring polarity by the sampler.
/// A disabled input is reported in its safe position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// Stop switch pressed (stop requested)
    pub stop_engaged: bool,
    /// Key cylinder turned to the locked position
    pub lock_locked: bool,
}

impl InputSnapshot {
    /// Snapshot with both inputs in their safe position
    pub const SAFE: Self = Self {
        stop_engaged: false,
        lock_locked: false,
    };

    /// Create a snapshot from logical input levels
    pub const fn new(stop_engaged: bool, lock_locked: bool) -> Self {
        Self {
            stop_engaged,
            lock_locked,
        }
    }
}

/// System-wide safety condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyState {
    /// Neither input requests a stop
    #[default]
    Safe,
    /// Stop switch engaged or key cylinder locked
    Unsafe,
}

impl SafetyState {
    /// Derive the safety state from a snapshot
    pub const fn derive(snapshot: InputSnapshot) -> Self {
        if snapshot.stop_engaged || snapshot.lock_locked {
            SafetyState::Unsafe
        } else {
            SafetyState::Safe
        }
    }

    /// Check if this is the safe state
    pub const fn is_safe(self) -> bool {
        matches!(self, SafetyState::Safe)
    }

    /// Check if this is the unsafe state
    pub const fn is_unsafe(self) -> bool {
        matches!(self, SafetyState::Unsafe)
    }
}

impl From<InputSnapshot> for SafetyState {
    fn from(snapshot: InputSnapshot) -> Self {
        Self::derive(snapshot)
    }
}

/// Input line that could not be read
///
/// A faulted input is reported as engaged/locked in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputFault {
    /// Stop switch read failed
    StopSwitch,
    /// Key cylinder read failed
    LockCylinder,
    /// Both reads failed
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truth_table() {
        assert_eq!(
            SafetyState::derive(InputSnapshot::new(false, false)),
            SafetyState::Safe
        );
        assert_eq!(
            SafetyState::derive(InputSnapshot::new(true, false)),
            SafetyState::Unsafe
        );
        assert_eq!(
            SafetyState::derive(InputSnapshot::new(false, true)),
            SafetyState::Unsafe
        );
        assert_eq!(
            SafetyState::derive(InputSnapshot::new(true, true)),
            SafetyState::Unsafe
        );
    }

    #[test]
    fn test_safe_constant() {
        assert_eq!(InputSnapshot::SAFE, InputSnapshot::default());
        assert!(SafetyState::from(InputSnapshot::SAFE).is_safe());
    }

    proptest! {
        #[test]
        fn unsafe_iff_either_input(stop in any::<bool>(), lock in any::<bool>()) {
            let state = SafetyState::derive(InputSnapshot::new(stop, lock));
            prop_assert_eq!(state.is_unsafe(), stop || lock);
            prop_assert_eq!(state.is_safe(), !stop && !lock);
        }

        #[test]
        fn derive_is_idempotent(stop in any::<bool>(), lock in any::<bool>(), repeats in 1usize..16) {
            let snapshot = InputSnapshot::new(stop, lock);
            let first = SafetyState::derive(snapshot);
            for _ in 0..repeats {
                prop_assert_eq!(SafetyState::derive(snapshot), first);
            }
        }
    }
}
