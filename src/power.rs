use std::sync::Arc;

use tokio::sync::Mutex;

/// Modeled chassis power state. The emulator boots powered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
        }
    }

    /// Transition applied by the `ComputerSystem.Reset` action. Only the two
    /// explicit power-down reset types turn the system off; every other
    /// requested value, including unrecognized strings, powers it on.
    pub fn after_reset(reset_type: &str) -> Self {
        match reset_type {
            "ForceOff" | "GracefulShutdown" => Self::Off,
            _ => Self::On,
        }
    }
}

/// The one piece of server-wide mutable state. Cloned into every request
/// handler; all clones share the same slot.
#[derive(Debug, Clone)]
pub struct PowerStateCell {
    state: Arc<Mutex<PowerState>>,
}

impl PowerStateCell {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PowerState::On)),
        }
    }

    pub async fn get(&self) -> PowerState {
        *self.state.lock().await
    }

    pub async fn set(&self, next: PowerState) {
        *self.state.lock().await = next;
    }
}

impl Default for PowerStateCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_down_reset_types_turn_off() {
        assert_eq!(PowerState::after_reset("ForceOff"), PowerState::Off);
        assert_eq!(PowerState::after_reset("GracefulShutdown"), PowerState::Off);
    }

    #[test]
    fn every_other_reset_type_turns_on() {
        assert_eq!(PowerState::after_reset("On"), PowerState::On);
        assert_eq!(PowerState::after_reset("GracefulRestart"), PowerState::On);
        assert_eq!(PowerState::after_reset("ForceRestart"), PowerState::On);
        assert_eq!(PowerState::after_reset("PowerCycle"), PowerState::On);
        assert_eq!(PowerState::after_reset(""), PowerState::On);
    }

    #[tokio::test]
    async fn cell_starts_on_and_clones_share_state() {
        let cell = PowerStateCell::new();
        assert_eq!(cell.get().await, PowerState::On);

        let clone = cell.clone();
        clone.set(PowerState::Off).await;
        assert_eq!(cell.get().await, PowerState::Off);
    }
}
