//! Parameter input surface: twelve ranged controls whose editability follows
//! the active preset.

use crossbeam::channel::{self, Receiver, Sender};
use lissa_core::{
    Access, ParameterName, ResolvedAssignment, WaveError, WaveParameters, WaveResult,
    PARAMETER_COUNT,
};

/// One numeric input.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterControl {
    pub name: ParameterName,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub access: Access,
}

impl ParameterControl {
    pub fn new(name: ParameterName, value: f64, min: f64, max: f64) -> Self {
        let value = value.clamp(min, max);
        Self { name, value, min, max, access: Access::Editable }
    }

    /// Store `value` clamped into `[min, max]` and return what was stored.
    pub fn set_clamped(&mut self, value: f64) -> f64 {
        self.value = value.clamp(self.min, self.max);
        self.value
    }

    pub fn is_editable(&self) -> bool {
        self.access.is_editable()
    }
}

/// An accepted edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterChange {
    pub name: ParameterName,
    pub old: f64,
    pub new: f64,
}

/// The twelve controls, in declaration order.
#[derive(Debug, Clone)]
pub struct ParameterPanel {
    controls: Vec<ParameterControl>,
    listeners: Vec<Sender<ParameterChange>>,
}

impl ParameterPanel {
    /// Controls ranging over `[0, max]`, seeded from `params`.
    pub fn new(params: &WaveParameters, max: f64) -> Self {
        let controls = ParameterName::ALL
            .iter()
            .map(|&name| ParameterControl::new(name, params.get(name), 0.0, max))
            .collect();
        Self { controls, listeners: Vec::new() }
    }

    /// Receive every accepted edit. Dropped receivers are pruned on the next
    /// edit.
    pub fn subscribe(&mut self) -> Receiver<ParameterChange> {
        let (tx, rx) = channel::unbounded();
        self.listeners.push(tx);
        rx
    }

    pub fn control(&self, name: ParameterName) -> &ParameterControl {
        &self.controls[name.index()]
    }

    pub fn controls(&self) -> &[ParameterControl] {
        &self.controls
    }

    pub fn get(&self, name: ParameterName) -> f64 {
        self.control(name).value
    }

    /// Edit one control. Fails with `ReadOnlyParameter` when the active
    /// preset links or fixes it.
    pub fn set(&mut self, name: ParameterName, value: f64) -> WaveResult<ParameterChange> {
        let control = &mut self.controls[name.index()];
        if !control.is_editable() {
            log::warn!("rejected edit of '{}': not editable", name.name());
            return Err(WaveError::ReadOnlyParameter(name));
        }
        let old = control.value;
        let new = control.set_clamped(value);
        if new != value {
            log::warn!("'{}' clamped from {} to {}", name.name(), value, new);
        }
        let change = ParameterChange { name, old, new };
        self.listeners.retain(|tx| tx.send(change).is_ok());
        Ok(change)
    }

    /// Edit by display name, e.g. "amplitude z".
    pub fn set_by_name(&mut self, name: &str, value: f64) -> WaveResult<ParameterChange> {
        self.set(ParameterName::from_name(name)?, value)
    }

    /// Current values as a parameter set.
    pub fn values(&self) -> WaveParameters {
        let mut values = [0.0; PARAMETER_COUNT];
        for control in &self.controls {
            values[control.name.index()] = control.value;
        }
        WaveParameters::from_values(values)
    }

    /// Mirror a resolved assignment: access modes and displayed values.
    /// Resolved values are shown as they are, even outside the range.
    pub fn apply(&mut self, resolved: &ResolvedAssignment) {
        for slot in resolved.slots() {
            let control = &mut self.controls[slot.name.index()];
            control.access = slot.access;
            control.value = slot.value;
        }
    }

    /// Names of the controls that currently accept edits.
    pub fn editable(&self) -> impl Iterator<Item = ParameterName> + '_ {
        self.controls.iter().filter(|c| c.is_editable()).map(|c| c.name)
    }
}
