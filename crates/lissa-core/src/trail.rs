use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{WaveError, WaveResult};

/// A vector drawn from the origin to a point on the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub origin: DVec3,
    pub tip: DVec3,
}

impl Segment {
    pub fn from_origin(tip: DVec3) -> Self {
        Self { origin: DVec3::ZERO, tip }
    }
}

/// One ring slot: optional geometry plus its opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailSlot {
    pub segment: Option<Segment>,
    pub opacity: f64,
}

impl Default for TrailSlot {
    fn default() -> Self {
        Self { segment: None, opacity: 1.0 }
    }
}

impl TrailSlot {
    pub fn clear(&mut self) {
        self.segment = None;
    }
}

/// Fixed-capacity ring of trailing vectors with per-slot opacity.
///
/// The newest vector is fully opaque and each older one fades by
/// `1/n` until the oldest sits at `1/n`. Resizing reallocates and copies the
/// surviving prefix; it never grows in place.
#[derive(Debug, Clone)]
pub struct VectorTrailBuffer {
    slots: Box<[TrailSlot]>,
}

impl VectorTrailBuffer {
    pub fn new(size: usize) -> Self {
        Self { slots: vec![TrailSlot::default(); size].into_boxed_slice() }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> WaveResult<&TrailSlot> {
        self.slots
            .get(index)
            .ok_or(WaveError::IndexOutOfRange { index, len: self.slots.len() })
    }

    pub fn slots(&self) -> &[TrailSlot] {
        &self.slots
    }

    /// Resize to `new_size`. Slots below `min(old, new)` are kept as they are;
    /// new slots start empty; dropped slots are cleared before removal.
    pub fn resize(&mut self, new_size: usize) {
        let old_size = self.slots.len();
        if new_size == old_size {
            return;
        }
        for slot in self.slots.iter_mut().skip(new_size) {
            slot.clear();
        }
        let mut resized = vec![TrailSlot::default(); new_size].into_boxed_slice();
        let keep = old_size.min(new_size);
        resized[..keep].copy_from_slice(&self.slots[..keep]);
        self.slots = resized;
        log::debug!("vector trail resized {} -> {}", old_size, new_size);
    }

    /// Clear geometry in every slot.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.clear();
        }
    }

    /// Store the vector to `position` in slot `time mod n_vect`.
    /// Returns the slot index written.
    pub fn write_vector(&mut self, time: usize, n_vect: usize, position: DVec3) -> WaveResult<usize> {
        self.check_ring(n_vect)?;
        let index = time % n_vect;
        self.slots[index].segment = Some(Segment::from_origin(position));
        Ok(index)
    }

    /// Fade the first `n_vect` slots so `just_written` is fully opaque and
    /// opacity drops by `1/n_vect` per step back in time, wrapping once
    /// through the ring starting right after `just_written`.
    pub fn apply_opacity(&mut self, n_vect: usize, just_written: usize) -> WaveResult<()> {
        self.check_ring(n_vect)?;
        if just_written >= n_vect {
            return Err(WaveError::IndexOutOfRange { index: just_written, len: n_vect });
        }
        let step = 1.0 / n_vect as f64;
        let mut index = (just_written + 1) % n_vect;
        for count in 1..=n_vect {
            self.slots[index].opacity = if count == n_vect {
                1.0
            } else {
                count as f64 * step
            };
            index += 1;
            if index == n_vect {
                index = 0;
            }
        }
        Ok(())
    }

    fn check_ring(&self, n_vect: usize) -> WaveResult<()> {
        if n_vect == 0 || n_vect > self.slots.len() {
            return Err(WaveError::IndexOutOfRange { index: n_vect, len: self.slots.len() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn filled(size: usize) -> VectorTrailBuffer {
        let mut trail = VectorTrailBuffer::new(size);
        for t in 0..size {
            trail.write_vector(t, size, DVec3::new(t as f64, 0.0, 0.0)).unwrap();
        }
        trail
    }

    #[test]
    fn test_write_wraps_modulo() {
        let mut trail = VectorTrailBuffer::new(4);
        assert_eq!(trail.write_vector(9, 4, DVec3::X).unwrap(), 1);
        let slot = trail.slot(1).unwrap();
        assert_eq!(slot.segment, Some(Segment { origin: DVec3::ZERO, tip: DVec3::X }));
    }

    #[test]
    fn test_opacity_fades_backwards() {
        for n in 1..=7 {
            for time in 0..(3 * n) {
                let mut trail = VectorTrailBuffer::new(n);
                let written = trail.write_vector(time, n, DVec3::ONE).unwrap();
                trail.apply_opacity(n, written).unwrap();

                assert_eq!(written, time % n);
                assert_eq!(trail.slot(written).unwrap().opacity, 1.0);
                let step = 1.0 / n as f64;
                for back in 0..n {
                    let index = (written + n - back) % n;
                    let expected = 1.0 - back as f64 * step;
                    assert!((trail.slot(index).unwrap().opacity - expected).abs() < EPSILON);
                }
                let oldest = (written + 1) % n;
                assert!((trail.slot(oldest).unwrap().opacity - step).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_single_slot_is_opaque() {
        let mut trail = VectorTrailBuffer::new(3);
        let written = trail.write_vector(17, 1, DVec3::Y).unwrap();
        assert_eq!(written, 0);
        trail.apply_opacity(1, written).unwrap();
        assert_eq!(trail.slot(0).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_grow_preserves_prefix() {
        let mut trail = filled(3);
        trail.apply_opacity(3, 2).unwrap();
        let before: Vec<TrailSlot> = trail.slots().to_vec();
        trail.resize(6);
        assert_eq!(trail.len(), 6);
        assert_eq!(&trail.slots()[..3], &before[..]);
        assert!(trail.slots()[3..].iter().all(|s| s.segment.is_none()));
    }

    #[test]
    fn test_shrink_drops_tail() {
        let mut trail = filled(5);
        let before: Vec<TrailSlot> = trail.slots().to_vec();
        trail.resize(2);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail.slots(), &before[..2]);
        // Growing back exposes fresh, empty slots
        trail.resize(5);
        assert!(trail.slots()[2..].iter().all(|s| s.segment.is_none()));
    }

    #[test]
    fn test_ring_bounds() {
        let mut trail = VectorTrailBuffer::new(2);
        assert!(matches!(
            trail.write_vector(0, 3, DVec3::ZERO),
            Err(WaveError::IndexOutOfRange { index: 3, len: 2 })
        ));
        assert!(trail.write_vector(0, 0, DVec3::ZERO).is_err());
        assert!(trail.apply_opacity(2, 2).is_err());
        assert!(trail.slot(2).is_err());
    }

    #[test]
    fn test_clear() {
        let mut trail = filled(4);
        trail.clear();
        assert!(trail.slots().iter().all(|s| s.segment.is_none()));
    }
}
