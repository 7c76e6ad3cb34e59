#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// From a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }
}

/// Piecewise linear colormap over [0, 1] given by `(position, color)` stops in
/// ascending position order.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<(f64, Rgb)>,
}

impl Colormap {
    pub fn new(stops: impl IntoIterator<Item = (f64, Rgb)>) -> Self {
        Self {
            stops: stops.into_iter().collect(),
        }
    }

    pub fn sample(&self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);

        let Some(&(first_pos, first_color)) = self.stops.first() else {
            return Rgb(0, 0, 0);
        };
        if t <= first_pos {
            return first_color;
        }

        for window in self.stops.windows(2) {
            let (lo_pos, lo_color) = window[0];
            let (hi_pos, hi_color) = window[1];
            if t <= hi_pos {
                let span = hi_pos - lo_pos;
                if span <= 0.0 {
                    return hi_color;
                }
                return lo_color.lerp(hi_color, (t - lo_pos) / span);
            }
        }

        self.stops[self.stops.len() - 1].1
    }

    /// `n` evenly spaced colors from 0 to 1, for renderers that only take a
    /// uniform color ramp.
    pub fn resample(&self, n: usize) -> Vec<Rgb> {
        match n {
            0 => Vec::new(),
            1 => vec![self.sample(0.0)],
            _ => (0..n)
                .map(|i| self.sample(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_to_green() -> Colormap {
        Colormap::new([
            (0.0, Rgb::from_hex(0xd93a54)),
            (0.2, Rgb::from_hex(0xd93a54)),
            (1.0, Rgb::from_hex(0x2abb7f)),
        ])
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!(Rgb::from_hex(0x48c78e).to_hex(), "#48c78e");
    }

    #[test]
    fn flat_segment_below_second_stop() {
        let cmap = red_to_green();
        assert_eq!(cmap.sample(0.1), Rgb::from_hex(0xd93a54));
        assert_eq!(cmap.sample(0.2), Rgb::from_hex(0xd93a54));
    }

    #[test]
    fn interpolates_between_stops() {
        let cmap = Colormap::new([(0.0, Rgb(0, 0, 0)), (1.0, Rgb(200, 100, 50))]);
        assert_eq!(cmap.sample(0.5), Rgb(100, 50, 25));
    }

    #[test]
    fn clamps_outside_unit_interval() {
        let cmap = red_to_green();
        assert_eq!(cmap.sample(-1.0), cmap.sample(0.0));
        assert_eq!(cmap.sample(2.0), Rgb::from_hex(0x2abb7f));
    }

    #[test]
    fn resample_hits_both_ends() {
        let ramp = red_to_green().resample(11);
        assert_eq!(ramp.len(), 11);
        assert_eq!(ramp[0], Rgb::from_hex(0xd93a54));
        assert_eq!(ramp[2], Rgb::from_hex(0xd93a54));
        assert_eq!(ramp[10], Rgb::from_hex(0x2abb7f));
    }
}
