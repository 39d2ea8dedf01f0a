use embedded_graphics::pixelcolor::Rgb888;
use mic_dsp::IntensityLevel;

use crate::frame::LedFrame;

pub const GREEN: Rgb888 = Rgb888::new(0, 80, 0);
pub const AMBER: Rgb888 = Rgb888::new(80, 52, 0);
pub const YELLOW: Rgb888 = Rgb888::new(80, 80, 0);
pub const RED: Rgb888 = Rgb888::new(80, 0, 0);

/// Group of pixels lit together in one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub color: Rgb888,
    pub pixels: &'static [usize],
}

/// Tiers from quietest to loudest. Level `k` lights the first `k` tiers.
pub const TIERS: [Tier; 4] = [
    // bottom row
    Tier {
        color: GREEN,
        pixels: &[0, 1, 2, 3, 4],
    },
    Tier {
        color: AMBER,
        pixels: &[6, 8, 9],
    },
    Tier {
        color: YELLOW,
        pixels: &[5, 7, 11, 12],
    },
    Tier {
        color: RED,
        pixels: &[10, 13, 14, 16, 17, 18, 19, 20, 22, 23],
    },
];

/// The tiers lit at `level`, lowest first.
pub fn tiers_for(level: IntensityLevel) -> &'static [Tier] {
    &TIERS[..usize::from(level.get())]
}

/// Frame for `level`: dark except for its tiers.
pub fn render(level: IntensityLevel) -> LedFrame {
    let mut frame = LedFrame::dark();
    for tier in tiers_for(level) {
        for &index in tier.pixels {
            frame.set(index, tier.color);
        }
    }
    frame
}
