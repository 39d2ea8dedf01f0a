/// Lower bound in volts of levels 1 through 4. Each band is `[low, high)`.
pub const THRESHOLDS: [f32; 4] = [0.2, 0.6, 1.2, 2.0];

/// Discrete loudness step shown on the matrix, always in `0..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
pub struct IntensityLevel(u8);

impl IntensityLevel {
    pub const SILENT: Self = Self(0);
    pub const MAX: Self = Self(THRESHOLDS.len() as u8);

    /// `None` when `level` is above `MAX`.
    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX.0 {
            Some(Self(level))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Every level from silent to max, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=Self::MAX.0).map(Self)
    }
}

impl From<IntensityLevel> for u8 {
    fn from(level: IntensityLevel) -> u8 {
        level.0
    }
}

/// Map a loudness in volts onto its band.
///
/// Boundary values belong to the higher band. Negative and NaN inputs are silent.
pub fn classify(loudness: f32) -> IntensityLevel {
    let level = THRESHOLDS
        .iter()
        .take_while(|&&threshold| loudness >= threshold)
        .count();
    IntensityLevel(level as u8)
}
