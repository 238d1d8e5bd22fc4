//! Ring sizing and the point → (ring, position) encode helpers.
//!
//! Rings are counted from south to north. The two polar caps together take the room
//! of one extra ring, so with `n` rings each ring spans `π / (n + 1)` in declination
//! and the caps reach down (up) to half a ring from the poles.

use std::f64::consts::FRAC_PI_2;

use crate::constants::{wrap_two_pi, Radian, TractId, DPI};

/// Ring number: `-1` for the south cap, `0..num_rings` for rings, `num_rings` for the
/// north cap.
pub type RingNum = i64;

/// Immutable ring layout derived from the number of rings.
#[derive(Debug, Clone, PartialEq)]
pub struct RingLayout {
    ring_size: Radian,
    counts: Box<[usize]>,
    /// `offsets[r]` = number of ring tracts in rings `0..r`; one entry per ring plus one.
    offsets: Box<[usize]>,
}

impl RingLayout {
    /// Compute the layout for `num_rings` rings.
    ///
    /// The number of tracts in a ring is chosen at the ring edge closest to the equator,
    /// where a ring-sized tract covers the least right ascension, so that neighbouring
    /// tracts always meet.
    pub fn new(num_rings: u32) -> Self {
        let ring_size = std::f64::consts::PI / (num_rings as f64 + 1.0);

        let counts: Box<[usize]> = (0..num_rings)
            .map(|i| {
                let start_dec = ring_size * (i as f64 + 0.5) - FRAC_PI_2;
                let stop_dec = start_dec + ring_size;
                let dec = start_dec.abs().min(stop_dec.abs());
                (DPI * dec.cos() / ring_size).floor() as usize + 1
            })
            .collect();

        let offsets = std::iter::once(0)
            .chain(counts.iter().scan(0usize, |acc, &n| {
                *acc += n;
                Some(*acc)
            }))
            .collect();

        RingLayout {
            ring_size,
            counts,
            offsets,
        }
    }

    /// Declination extent of a ring (radians).
    pub fn ring_size(&self) -> Radian {
        self.ring_size
    }

    pub fn num_rings(&self) -> usize {
        self.counts.len()
    }

    /// Number of tracts in each ring, south to north.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Ring tracts plus the two polar caps.
    pub fn num_tracts(&self) -> usize {
        self.offsets[self.counts.len()] + 2
    }

    /// Number of ring tracts in the rings below `ring`, for `ring` in `0..=num_rings`.
    pub(crate) fn offset(&self, ring: usize) -> usize {
        self.offsets[ring.min(self.counts.len())]
    }

    /// Lower declination edge of ring 0; the south cap lies below it.
    pub fn first_ring_start(&self) -> Radian {
        self.ring_size * 0.5 - FRAC_PI_2
    }

    /// Declination of the tract centers of `ring`.
    pub fn ring_center_dec(&self, ring: usize) -> Radian {
        self.ring_size * (ring as f64 + 1.0) - FRAC_PI_2
    }

    /// Right ascension of tract `tract_num` of `ring`, for rings starting at `ra_start`.
    pub fn tract_center_ra(&self, ring: usize, tract_num: usize, ra_start: Radian) -> Radian {
        wrap_two_pi(ra_start + DPI * tract_num as f64 / self.counts[ring] as f64)
    }

    /// Ring whose half-open declination span holds `dec`.
    pub fn dec_to_ring_num(&self, dec: Radian) -> RingNum {
        let first_ring_start = self.first_ring_start();
        if dec < first_ring_start {
            -1
        } else if dec > -first_ring_start {
            self.counts.len() as RingNum
        } else {
            let ring = ((dec - first_ring_start) / self.ring_size) as RingNum;
            // dec == -first_ring_start lands on the upper edge of the last ring
            ring.min(self.counts.len() as RingNum - 1)
        }
    }

    /// Position within `ring` of the tract center nearest in right ascension to `ra`.
    ///
    /// The polar caps hold a single tract, so they always give `0`.
    pub fn ra_to_tract_num(&self, ra: Radian, ring: RingNum, ra_start: Radian) -> usize {
        if ring < 0 || ring >= self.counts.len() as RingNum {
            return 0;
        }
        let count = self.counts[ring as usize];
        let tract_num = (wrap_two_pi(ra - ra_start) / (DPI / count as f64) + 0.5) as usize;
        if tract_num >= count {
            0
        } else {
            tract_num
        }
    }

    /// Linear id of the tract at `(ring, tract_num)` under the cumulative numbering.
    pub(crate) fn linear_index(&self, ring: usize, tract_num: usize) -> TractId {
        self.offset(ring) + tract_num + 1
    }
}
