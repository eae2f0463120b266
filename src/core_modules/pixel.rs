// THEORY:
// The `Pixel` module is the most fundamental unit of the analyzer. It is a
// "dumb" data container for a single RGBA pixel plus the small set of
// single-pixel heuristics the flash and pattern guidelines are written in
// terms of. Anything that needs another pixel or another frame (gradients,
// transitions) belongs in the higher layers.
//
// Key architectural principles:
// 1.  **Single-pixel scope**: Every method here is a pure function of one
//     pixel's channels. No neighbors, no history.
// 2.  **Guideline arithmetic, verbatim**: The luminance weighting (Rec. 601)
//     and the red-dominance rule are the exact formulas the compliance
//     criteria are defined against, so they live in one place and every
//     higher layer shares them.
// 3.  **Cheap construction**: A `Pixel` is four bytes; it is built straight
//     from a slice of the frame buffer with no intermediate allocation.

pub mod pixel {
    pub type Luminance = f64;
    pub type Saturation = f64;

    /// A "dumb" data container for a single RGBA pixel.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Pixel {
        pub red: u8,
        pub green: u8,
        pub blue: u8,
        pub alpha: u8,
    }

    impl From<&[u8]> for Pixel {
        /// Builds a pixel from the next four bytes of an RGBA frame buffer.
        fn from(bytes: &[u8]) -> Self {
            Self {
                red: bytes[0],
                green: bytes[1],
                blue: bytes[2],
                alpha: bytes[3],
            }
        }
    }

    impl Pixel {
        /// Perceptual luminance on the 0-255 scale (Rec. 601 weighting).
        pub fn luminance(&self) -> Luminance {
            0.299 * self.red as f64 + 0.587 * self.green as f64 + 0.114 * self.blue as f64
        }

        /// HSV-style saturation in [0, 1]: (max - min) / max, 0 for black.
        pub fn saturation(&self) -> Saturation {
            let max = self.red.max(self.green).max(self.blue);
            if max == 0 {
                return 0.0;
            }
            let min = self.red.min(self.green).min(self.blue);
            (max - min) as f64 / max as f64
        }

        /// Whether this pixel counts toward saturated-red screen coverage:
        /// red must strictly dominate both other channels and the color must
        /// be strongly saturated.
        pub fn is_red_dominant(&self) -> bool {
            self.red > self.green && self.red > self.blue && self.saturation() > 0.5
        }
    }
}
