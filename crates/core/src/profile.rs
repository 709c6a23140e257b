use serde::{Deserialize, Serialize};

use crate::error::{Result, UiError};

/// Automation state of one profile slot.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
    pub active_game: Option<String>,
    pub active_task: Option<String>,
    pub device_id: Option<String>,
}

/// All profile slots plus the selected one.
///
/// `active_profile` is always a valid index into `states`, except while
/// `states` is empty during start-up.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileProps {
    pub active_profile: usize,
    pub states: Vec<ProfileState>,
}

impl ProfileProps {
    pub fn for_profiles(count: usize) -> Self {
        Self {
            active_profile: 0,
            states: vec![ProfileState::default(); count],
        }
    }

    /// Grow or shrink to `count` slots, keeping existing state.
    pub fn resize(&mut self, count: usize) {
        self.states.resize_with(count, ProfileState::default);
        if self.active_profile >= count {
            self.active_profile = count.saturating_sub(1);
        }
    }

    pub fn set_active(&mut self, index: usize) -> Result<()> {
        if index >= self.states.len() {
            return Err(UiError::ProfileIndex {
                index,
                len: self.states.len(),
            });
        }
        self.active_profile = index;
        Ok(())
    }

    pub fn active_state(&self) -> Option<&ProfileState> {
        self.states.get(self.active_profile)
    }

    pub fn active_state_mut(&mut self) -> Option<&mut ProfileState> {
        self.states.get_mut(self.active_profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_clamps_active_profile() {
        let mut props = ProfileProps::for_profiles(3);
        props.set_active(2).unwrap();
        props.active_state_mut().unwrap().device_id = Some("127.0.0.1:5555".into());

        props.resize(2);
        assert_eq!(props.active_profile, 1);
        assert_eq!(props.states.len(), 2);

        props.resize(0);
        assert_eq!(props.active_profile, 0);
        assert!(props.active_state().is_none());
    }

    #[test]
    fn resize_keeps_existing_state() {
        let mut props = ProfileProps::for_profiles(1);
        props.active_state_mut().unwrap().active_task = Some("Daily".into());
        props.resize(2);
        assert_eq!(props.states[0].active_task.as_deref(), Some("Daily"));
        assert_eq!(props.states[1], ProfileState::default());
    }

    #[test]
    fn rejects_out_of_range_selection() {
        let mut props = ProfileProps::for_profiles(2);
        let err = props.set_active(2).unwrap_err();
        assert!(matches!(err, UiError::ProfileIndex { index: 2, len: 2 }));
        assert_eq!(props.active_profile, 0);
    }

    #[test]
    fn serializes_camel_case() {
        let props = ProfileProps::for_profiles(1);
        let value = serde_json::to_value(&props).unwrap();
        assert_eq!(value["activeProfile"], 0);
        assert!(value["states"][0]["deviceId"].is_null());
    }
}
