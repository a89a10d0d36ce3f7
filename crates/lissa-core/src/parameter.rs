use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{WaveError, WaveResult};

/// Spatial axis of the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Which term of `amplitude * cos(2π·frequency·t/n + phase) + offset` a
/// parameter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    Frequency,
    Amplitude,
    Phase,
    Offset,
}

impl Quantity {
    pub const ALL: [Quantity; 4] =
        [Quantity::Frequency, Quantity::Amplitude, Quantity::Phase, Quantity::Offset];

    pub fn name(&self) -> &'static str {
        match self {
            Quantity::Frequency => "frequency",
            Quantity::Amplitude => "amplitude",
            Quantity::Phase => "phase",
            Quantity::Offset => "offset",
        }
    }
}

/// The twelve tunable wave parameters, in declaration order.
///
/// Declaration order matters: preset tables are written against it and the
/// default-value bookkeeping walks it front to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum ParameterName {
    FrequencyX = 0,
    FrequencyY = 1,
    FrequencyZ = 2,
    AmplitudeX = 3,
    AmplitudeY = 4,
    AmplitudeZ = 5,
    PhaseX = 6,
    PhaseY = 7,
    PhaseZ = 8,
    OffsetX = 9,
    OffsetY = 10,
    OffsetZ = 11,
}

pub const PARAMETER_COUNT: usize = 12;

impl ParameterName {
    pub const ALL: [ParameterName; PARAMETER_COUNT] = [
        ParameterName::FrequencyX,
        ParameterName::FrequencyY,
        ParameterName::FrequencyZ,
        ParameterName::AmplitudeX,
        ParameterName::AmplitudeY,
        ParameterName::AmplitudeZ,
        ParameterName::PhaseX,
        ParameterName::PhaseY,
        ParameterName::PhaseZ,
        ParameterName::OffsetX,
        ParameterName::OffsetY,
        ParameterName::OffsetZ,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn new(quantity: Quantity, axis: Axis) -> Self {
        let base = match quantity {
            Quantity::Frequency => 0,
            Quantity::Amplitude => 3,
            Quantity::Phase => 6,
            Quantity::Offset => 9,
        };
        Self::ALL[base + axis.index()]
    }

    pub fn quantity(&self) -> Quantity {
        match self.index() / 3 {
            0 => Quantity::Frequency,
            1 => Quantity::Amplitude,
            2 => Quantity::Phase,
            _ => Quantity::Offset,
        }
    }

    pub fn axis(&self) -> Axis {
        Axis::ALL[self.index() % 3]
    }

    /// Display name, e.g. "frequency x".
    pub fn name(&self) -> &'static str {
        match self {
            ParameterName::FrequencyX => "frequency x",
            ParameterName::FrequencyY => "frequency y",
            ParameterName::FrequencyZ => "frequency z",
            ParameterName::AmplitudeX => "amplitude x",
            ParameterName::AmplitudeY => "amplitude y",
            ParameterName::AmplitudeZ => "amplitude z",
            ParameterName::PhaseX => "phase x",
            ParameterName::PhaseY => "phase y",
            ParameterName::PhaseZ => "phase z",
            ParameterName::OffsetX => "offset x",
            ParameterName::OffsetY => "offset y",
            ParameterName::OffsetZ => "offset z",
        }
    }

    /// Look a parameter up by its display name, `"<quantity> <axis>"`.
    pub fn from_name(name: &str) -> WaveResult<Self> {
        let unknown = || WaveError::UnknownParameter(name.to_string());
        let (quantity, axis) = name.split_once(' ').ok_or_else(unknown)?;
        let quantity = Quantity::ALL
            .iter()
            .copied()
            .find(|q| q.name() == quantity)
            .ok_or_else(unknown)?;
        let axis = Axis::ALL
            .iter()
            .copied()
            .find(|a| a.suffix() == axis)
            .ok_or_else(unknown)?;
        Ok(Self::new(quantity, axis))
    }
}

/// Cosine terms for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisWave {
    /// Full cycles per animation loop (not Hz).
    pub frequency: f64,
    pub amplitude: f64,
    /// Radians.
    pub phase: f64,
    pub offset: f64,
}

impl AxisWave {
    pub fn new(frequency: f64, amplitude: f64, phase: f64, offset: f64) -> Self {
        Self { frequency, amplitude, phase, offset }
    }

    /// Value at discrete time `t` of an `n_point` long loop.
    pub fn sample(&self, t: usize, n_point: usize) -> f64 {
        let angle =
            2.0 * std::f64::consts::PI * self.frequency * t as f64 / n_point as f64 + self.phase;
        self.amplitude * angle.cos() + self.offset
    }

    fn get(&self, quantity: Quantity) -> f64 {
        match quantity {
            Quantity::Frequency => self.frequency,
            Quantity::Amplitude => self.amplitude,
            Quantity::Phase => self.phase,
            Quantity::Offset => self.offset,
        }
    }

    fn slot_mut(&mut self, quantity: Quantity) -> &mut f64 {
        match quantity {
            Quantity::Frequency => &mut self.frequency,
            Quantity::Amplitude => &mut self.amplitude,
            Quantity::Phase => &mut self.phase,
            Quantity::Offset => &mut self.offset,
        }
    }
}

/// Frequency, amplitude, phase and offset for each of the three axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParameters {
    pub x: AxisWave,
    pub y: AxisWave,
    pub z: AxisWave,
}

impl Default for WaveParameters {
    fn default() -> Self {
        Self {
            x: AxisWave::new(2.0, 1.0, 0.0, 0.0),
            y: AxisWave::new(2.0, 1.0, std::f64::consts::FRAC_PI_2, 0.0),
            z: AxisWave::new(0.0, 1.0, 0.0, 0.0),
        }
    }
}

impl WaveParameters {
    pub fn axis(&self, axis: Axis) -> &AxisWave {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn axis_mut(&mut self, axis: Axis) -> &mut AxisWave {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    pub fn get(&self, name: ParameterName) -> f64 {
        self.axis(name.axis()).get(name.quantity())
    }

    pub fn set(&mut self, name: ParameterName, value: f64) {
        *self.axis_mut(name.axis()).slot_mut(name.quantity()) = value;
    }

    /// All twelve values in declaration order.
    pub fn values(&self) -> [f64; PARAMETER_COUNT] {
        ParameterName::ALL.map(|name| self.get(name))
    }

    pub fn from_values(values: [f64; PARAMETER_COUNT]) -> Self {
        let mut params = Self::default();
        for name in ParameterName::ALL {
            params.set(name, values[name.index()]);
        }
        params
    }

    /// Position on the trajectory at discrete time `t`.
    pub fn position(&self, t: usize, n_point: usize) -> DVec3 {
        DVec3::new(
            self.x.sample(t, n_point),
            self.y.sample(t, n_point),
            self.z.sample(t, n_point),
        )
    }

    /// Symmetric autoscale bound: the largest `amplitude + offset` over the
    /// three axes. Phase and frequency are ignored, so true extrema can exceed
    /// it.
    pub fn autoscale_limit(&self) -> f64 {
        Axis::ALL
            .iter()
            .map(|&axis| {
                let wave = self.axis(axis);
                wave.amplitude + wave.offset
            })
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for name in ParameterName::ALL {
            assert_eq!(ParameterName::from_name(name.name()).unwrap(), name);
            assert_eq!(ParameterName::from_index(name.index()), Some(name));
        }
    }

    #[test]
    fn test_unknown_name() {
        for bad in ["frequency w", "speed x", "frequencyx", "frequency x y", ""] {
            assert!(
                matches!(ParameterName::from_name(bad), Err(WaveError::UnknownParameter(_))),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_name_is_quantity_then_axis() {
        for name in ParameterName::ALL {
            let expected = format!("{} {}", name.quantity().name(), name.axis().suffix());
            assert_eq!(name.name(), expected);
        }
    }

    #[test]
    fn test_quantity_axis_split() {
        let p = ParameterName::PhaseY;
        assert_eq!(p.quantity(), Quantity::Phase);
        assert_eq!(p.axis(), Axis::Y);
        assert_eq!(ParameterName::new(Quantity::Offset, Axis::Z), ParameterName::OffsetZ);
    }

    #[test]
    fn test_get_set() {
        let mut params = WaveParameters::default();
        params.set(ParameterName::AmplitudeZ, 3.5);
        assert_eq!(params.z.amplitude, 3.5);
        assert_eq!(params.get(ParameterName::AmplitudeZ), 3.5);
        assert_eq!(WaveParameters::from_values(params.values()), params);
    }

    #[test]
    fn test_defaults() {
        let params = WaveParameters::default();
        assert_eq!(params.values()[..3], [2.0, 2.0, 0.0]);
        assert!((params.y.phase - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_autoscale_limit() {
        let mut params = WaveParameters::default();
        params.x = AxisWave::new(1.0, 1.0, 0.0, 0.0);
        params.y = AxisWave::new(1.0, 2.0, 0.0, 0.0);
        params.z = AxisWave::new(1.0, 3.0, 0.0, 1.0);
        assert_eq!(params.autoscale_limit(), 4.0);
    }
}
