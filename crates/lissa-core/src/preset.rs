//! Named presets that fix, link or free each of the twelve parameters.

use std::f64::consts::FRAC_PI_2;

use crate::error::{WaveError, WaveResult};
use crate::parameter::{ParameterName, WaveParameters, PARAMETER_COUNT};

/// How a preset treats one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresetSlot {
    /// Constant, not editable.
    Fixed(f64),
    /// Read-only copy of another (free) parameter, tracked live.
    LinkedTo(ParameterName),
    /// User-editable; `default` is pushed once when the preset is selected.
    Free { default: Option<f64> },
}

/// A preset table entry in its compact written form: either a constant or a
/// parameter name. A name equal to the slot's own name marks a free slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableEntry {
    Value(f64),
    Ref(ParameterName),
}

/// Access mode of a parameter under the active preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Editable,
    Linked(ParameterName),
    Fixed,
}

impl Access {
    pub fn is_editable(&self) -> bool {
        matches!(self, Access::Editable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSlot {
    pub name: ParameterName,
    pub access: Access,
    pub value: f64,
}

/// Every parameter's access mode and effective value under a preset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAssignment {
    preset: String,
    slots: [ResolvedSlot; PARAMETER_COUNT],
}

impl ResolvedAssignment {
    pub fn preset(&self) -> &str {
        &self.preset
    }

    pub fn slot(&self, name: ParameterName) -> &ResolvedSlot {
        &self.slots[name.index()]
    }

    pub fn slots(&self) -> &[ResolvedSlot] {
        &self.slots
    }

    pub fn access(&self, name: ParameterName) -> Access {
        self.slot(name).access
    }

    pub fn value(&self, name: ParameterName) -> f64 {
        self.slot(name).value
    }

    /// The resolved values as a parameter set.
    pub fn parameters(&self) -> WaveParameters {
        WaveParameters::from_values(self.slots.map(|s| s.value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresetDefinition {
    name: String,
    slots: [PresetSlot; PARAMETER_COUNT],
}

impl PresetDefinition {
    /// Build a preset, checking that every link points at a free slot.
    pub fn new(name: impl Into<String>, slots: [PresetSlot; PARAMETER_COUNT]) -> WaveResult<Self> {
        let name = name.into();
        for (i, slot) in slots.iter().enumerate() {
            if let PresetSlot::LinkedTo(source) = slot {
                if !matches!(slots[source.index()], PresetSlot::Free { .. }) {
                    return Err(WaveError::InvalidConfig(format!(
                        "preset '{}': '{}' links to '{}', which is not a free parameter",
                        name,
                        ParameterName::ALL[i].name(),
                        source.name()
                    )));
                }
            }
        }
        Ok(Self { name, slots })
    }

    /// Build a preset from its table form.
    ///
    /// Walks the table in declaration order. A slot referencing its own name
    /// is free and takes the next entry of `defaults`; a slot referencing any
    /// other name is a linked copy and does not consume a default. Missing
    /// defaults leave the parameter unchanged, surplus ones are ignored.
    pub fn from_table(
        name: impl Into<String>,
        table: [TableEntry; PARAMETER_COUNT],
        defaults: &[Option<f64>],
    ) -> WaveResult<Self> {
        let mut default_index = 0;
        let mut slots = [PresetSlot::Free { default: None }; PARAMETER_COUNT];
        for (param, entry) in ParameterName::ALL.iter().zip(table) {
            slots[param.index()] = match entry {
                TableEntry::Value(v) => PresetSlot::Fixed(v),
                TableEntry::Ref(source) if source == *param => {
                    let default = defaults.get(default_index).copied().flatten();
                    default_index += 1;
                    PresetSlot::Free { default }
                }
                TableEntry::Ref(source) => PresetSlot::LinkedTo(source),
            };
        }
        Self::new(name, slots)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self, name: ParameterName) -> &PresetSlot {
        &self.slots[name.index()]
    }

    /// Push the preset's non-null defaults into the free parameters.
    pub fn apply_defaults(&self, params: &mut WaveParameters) {
        for name in ParameterName::ALL {
            if let PresetSlot::Free { default: Some(value) } = self.slots[name.index()] {
                params.set(name, value);
            }
        }
    }

    /// Resolve access modes and effective values against `params`.
    pub fn resolve(&self, params: &WaveParameters) -> ResolvedAssignment {
        let slots = ParameterName::ALL.map(|name| match self.slots[name.index()] {
            PresetSlot::Fixed(value) => ResolvedSlot { name, access: Access::Fixed, value },
            PresetSlot::LinkedTo(source) => ResolvedSlot {
                name,
                access: Access::Linked(source),
                value: params.get(source),
            },
            PresetSlot::Free { .. } => ResolvedSlot {
                name,
                access: Access::Editable,
                value: params.get(name),
            },
        });
        ResolvedAssignment { preset: self.name.clone(), slots }
    }
}

/// Preset catalogue plus the currently selected entry.
#[derive(Debug, Clone)]
pub struct PresetResolver {
    presets: Vec<PresetDefinition>,
    active: usize,
}

impl PresetResolver {
    /// Create a resolver over `presets`; the first one is active.
    pub fn new(presets: Vec<PresetDefinition>) -> WaveResult<Self> {
        if presets.is_empty() {
            return Err(WaveError::InvalidConfig(
                "preset catalogue must not be empty".to_string(),
            ));
        }
        Ok(Self { presets, active: 0 })
    }

    /// Resolver over the built-in catalogue.
    pub fn builtin() -> WaveResult<Self> {
        Self::new(builtin_presets()?)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name())
    }

    pub fn find(&self, name: &str) -> WaveResult<&PresetDefinition> {
        self.presets
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| WaveError::UnknownPreset(name.to_string()))
    }

    pub fn active(&self) -> &PresetDefinition {
        &self.presets[self.active]
    }

    /// Make `name` the active preset, push its defaults into `params` and
    /// resolve. `params` is updated to the resolved values.
    pub fn select(
        &mut self,
        name: &str,
        params: &mut WaveParameters,
    ) -> WaveResult<ResolvedAssignment> {
        let index = self
            .presets
            .iter()
            .position(|p| p.name() == name)
            .ok_or_else(|| WaveError::UnknownPreset(name.to_string()))?;
        self.active = index;
        let preset = &self.presets[index];
        preset.apply_defaults(params);
        let resolved = preset.resolve(params);
        *params = resolved.parameters();
        log::info!("selected preset '{}'", name);
        Ok(resolved)
    }

    /// Re-derive linked and fixed values after any parameter edit.
    pub fn refresh(&self, params: &mut WaveParameters) -> ResolvedAssignment {
        let resolved = self.active().resolve(params);
        *params = resolved.parameters();
        resolved
    }
}

/// The built-in preset catalogue, in display order.
pub fn builtin_presets() -> WaveResult<Vec<PresetDefinition>> {
    use ParameterName::*;
    use TableEntry::{Ref as R, Value as V};

    const Z: TableEntry = V(0.0);
    let free_mode = ParameterName::ALL.map(R);

    Ok(vec![
        PresetDefinition::from_table(
            "Flat Disk",
            [R(FrequencyX), R(FrequencyX), Z, R(AmplitudeX), R(AmplitudeX), Z, Z, V(FRAC_PI_2), Z, Z, Z, Z],
            &[None; PARAMETER_COUNT],
        )?,
        PresetDefinition::from_table(
            "Wide Cone",
            [R(FrequencyX), R(FrequencyX), Z, R(AmplitudeX), R(AmplitudeY), R(AmplitudeZ), Z, R(PhaseY), Z, Z, Z, Z],
            &[Some(1.0), Some(2.0), Some(2.0), Some(3.0), Some(FRAC_PI_2)],
        )?,
        PresetDefinition::from_table(
            "Small Cone",
            [R(FrequencyX), R(FrequencyX), Z, R(AmplitudeX), R(AmplitudeX), R(AmplitudeZ), Z, R(PhaseY), Z, Z, Z, Z],
            &[Some(1.0), Some(1.0), Some(10.0), Some(FRAC_PI_2)],
        )?,
        PresetDefinition::from_table(
            "Permanent Magnet",
            [Z, Z, Z, R(AmplitudeX), R(AmplitudeY), R(AmplitudeZ), R(PhaseX), R(PhaseY), R(PhaseZ), Z, Z, Z],
            &[Some(1.0), Some(2.0), Some(3.0), Some(0.0), Some(0.0), Some(0.0)],
        )?,
        PresetDefinition::from_table(
            "Pendulum",
            [R(FrequencyX), R(FrequencyX), Z, R(AmplitudeX), R(AmplitudeY), R(AmplitudeZ), Z, Z, Z, Z, Z, Z],
            &[Some(1.0), Some(1.0), Some(2.0), Some(1.0)],
        )?,
        PresetDefinition::from_table(
            "Swinging Rotation",
            [R(FrequencyX), R(FrequencyX), R(FrequencyZ), R(AmplitudeX), R(AmplitudeX), R(AmplitudeZ), Z, V(FRAC_PI_2), Z, Z, Z, Z],
            &[Some(1.0), Some(10.0), Some(5.0), Some(1.0)],
        )?,
        PresetDefinition::from_table(
            "Alternating",
            [Z, Z, R(FrequencyZ), Z, Z, R(AmplitudeZ), Z, Z, Z, Z, Z, Z],
            &[Some(3.0), Some(2.0)],
        )?,
        PresetDefinition::from_table(
            "Alternating + Constant",
            [Z, Z, R(FrequencyZ), Z, Z, R(AmplitudeZ), Z, Z, Z, Z, Z, R(OffsetZ)],
            &[Some(3.0), Some(4.0), Some(2.0)],
        )?,
        PresetDefinition::from_table("Free Mode", free_mode, &[None; PARAMETER_COUNT])?,
    ])
}
