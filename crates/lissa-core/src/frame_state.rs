use serde::{Deserialize, Serialize};

/// Independent render toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Toggle {
    Vector,
    VectorTrack,
    Static,
    TimeTrack,
    Fragmented,
    Autoscale,
}

impl Toggle {
    pub const ALL: [Toggle; 6] = [
        Toggle::Vector,
        Toggle::VectorTrack,
        Toggle::Static,
        Toggle::TimeTrack,
        Toggle::Fragmented,
        Toggle::Autoscale,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Toggle::Vector => "vector",
            Toggle::VectorTrack => "vectorTrack",
            Toggle::Static => "static",
            Toggle::TimeTrack => "timeTrack",
            Toggle::Fragmented => "fragmented",
            Toggle::Autoscale => "autoscale",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// What flipping this toggle requires from the owner.
    pub fn side_effect(&self) -> ToggleEffect {
        match self {
            Toggle::Vector | Toggle::VectorTrack => ToggleEffect::ClearVectors,
            Toggle::Static | Toggle::TimeTrack => ToggleEffect::Reset,
            Toggle::Fragmented => ToggleEffect::Regenerate,
            Toggle::Autoscale => ToggleEffect::None,
        }
    }
}

/// Follow-up work after a toggle flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleEffect {
    None,
    /// Drop the geometry of every vector slot.
    ClearVectors,
    /// Rewind and clear all geometry.
    Reset,
    /// Regenerate the sample buffer, switch marker style, then reset.
    Regenerate,
}

/// Which sub-renders run each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameState {
    pub vector: bool,
    pub vector_track: bool,
    #[serde(rename = "static")]
    pub static_trace: bool,
    pub time_track: bool,
    pub fragmented: bool,
    pub autoscale: bool,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            vector: true,
            vector_track: false,
            static_trace: true,
            time_track: false,
            fragmented: false,
            autoscale: true,
        }
    }
}

impl FrameState {
    /// Every toggle off.
    pub fn none() -> Self {
        Self {
            vector: false,
            vector_track: false,
            static_trace: false,
            time_track: false,
            fragmented: false,
            autoscale: false,
        }
    }

    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Vector => self.vector,
            Toggle::VectorTrack => self.vector_track,
            Toggle::Static => self.static_trace,
            Toggle::TimeTrack => self.time_track,
            Toggle::Fragmented => self.fragmented,
            Toggle::Autoscale => self.autoscale,
        }
    }

    /// Set a toggle. Returns the required side effect, or `None` when the
    /// value did not change.
    pub fn set(&mut self, toggle: Toggle, on: bool) -> ToggleEffect {
        let slot = match toggle {
            Toggle::Vector => &mut self.vector,
            Toggle::VectorTrack => &mut self.vector_track,
            Toggle::Static => &mut self.static_trace,
            Toggle::TimeTrack => &mut self.time_track,
            Toggle::Fragmented => &mut self.fragmented,
            Toggle::Autoscale => &mut self.autoscale,
        };
        if *slot == on {
            return ToggleEffect::None;
        }
        *slot = on;
        toggle.side_effect()
    }

    /// Vectors to draw this tick: `n_vector` in track mode, 1 in plain vector
    /// mode, none otherwise. Track mode wins when both are on.
    pub fn vector_count(&self, n_vector: usize) -> Option<usize> {
        if self.vector_track {
            Some(n_vector)
        } else if self.vector {
            Some(1)
        } else {
            None
        }
    }
}
