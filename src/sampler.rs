//! Button sampling and key decoding.
//!
//! A press is recognised when the raw bitmask differs from the previous
//! sample and is nonzero. Identical consecutive samples are collapsed,
//! which is the whole debounce policy. When several keys are held the
//! highest-numbered one wins; the others are ignored until the mask
//! changes again.

/// Index of the highest set bit of a nonzero mask.
pub fn highest_key_index(mask: u16) -> Option<u8> {
    if mask == 0 {
        None
    } else {
        Some((u16::BITS - 1 - mask.leading_zeros()) as u8)
    }
}

/// Change-detecting sampler for the raw button bitmask.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputSampler {
    last_mask: u16,
}

impl InputSampler {
    pub const fn new() -> Self {
        Self { last_mask: 0 }
    }

    /// Feed one sample; returns the pressed key when the mask changed to a nonzero value.
    ///
    /// A change to zero (everything released) yields `None`.
    pub fn sample(&mut self, mask: u16) -> Option<u8> {
        if mask == self.last_mask {
            return None;
        }
        self.last_mask = mask;
        highest_key_index(mask)
    }

    pub fn last_mask(&self) -> u16 {
        self.last_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_highest_set_bit() {
        assert_eq!(highest_key_index(0b0000_0000_0010_0000), Some(5));
        assert_eq!(highest_key_index(0b0000_0000_0000_0011), Some(1));
        assert_eq!(highest_key_index(0x0001), Some(0));
        assert_eq!(highest_key_index(0x8001), Some(15));
        assert_eq!(highest_key_index(0), None);
    }

    #[test]
    fn every_single_bit_maps_to_its_position() {
        for bit in 0..16u8 {
            assert_eq!(highest_key_index(1 << bit), Some(bit));
        }
    }

    #[test]
    fn repeated_mask_is_collapsed() {
        let mut sampler = InputSampler::new();
        assert_eq!(sampler.sample(0x0004), Some(2));
        assert_eq!(sampler.sample(0x0004), None);
        assert_eq!(sampler.sample(0x0004), None);
    }

    #[test]
    fn release_produces_no_event() {
        let mut sampler = InputSampler::new();
        assert_eq!(sampler.sample(0x0100), Some(8));
        assert_eq!(sampler.sample(0), None);
        assert_eq!(sampler.last_mask(), 0);
        // Same key again after a release is a new press.
        assert_eq!(sampler.sample(0x0100), Some(8));
    }

    #[test]
    fn adding_a_lower_key_repeats_the_highest() {
        let mut sampler = InputSampler::new();
        assert_eq!(sampler.sample(0x0400), Some(10));
        // Key 3 joins while 10 is still held: mask changed, 10 still wins.
        assert_eq!(sampler.sample(0x0408), Some(10));
        // Key 10 released, 3 still held.
        assert_eq!(sampler.sample(0x0008), Some(3));
    }
}
