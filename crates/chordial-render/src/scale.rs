//! Band and linear scales for the bar chart axes.

/// Evenly spaced bands over `0..len` with proportional inner/outer padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    len: usize,
    step: f64,
    start: f64,
    padding: f64,
}

impl BandScale {
    pub fn new(len: usize, range: (f64, f64), padding: f64) -> Self {
        let n = len as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n + padding).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) / 2.0;
        Self {
            len,
            step,
            start,
            padding,
        }
    }

    /// Left edge of band `i`.
    pub fn position(&self, i: usize) -> f64 {
        debug_assert!(i < self.len);
        self.start + self.step * i as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.step * (1.0 - self.padding)
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Expands the domain outward to round tick increments.
    pub fn nice(mut self, count: usize) -> Self {
        let (orig0, orig1) = self.domain;
        let (mut d0, mut d1) = self.domain;
        let mut prestep = 0.0;
        for _ in 0..10 {
            let step = tick_increment(d0, d1, count);
            if step == prestep || step == 0.0 || !step.is_finite() {
                break;
            }
            if step > 0.0 {
                d0 = (orig0 / step).floor() * step;
                d1 = (orig1 / step).ceil() * step;
            } else {
                d0 = (orig0 * -step).floor() / -step;
                d1 = (orig1 * -step).ceil() / -step;
            }
            prestep = step;
        }
        self.domain = (d0, d1);
        self
    }

    pub fn scale(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Round tick values covering `[start, stop]`, at most roughly `count` of
/// them, stepping by 1, 2, or 5 times a power of ten.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (a, b) = if reverse { (stop, start) } else { (start, stop) };
    let inc = tick_increment(a, b, count);
    if inc == 0.0 || !inc.is_finite() {
        return Vec::new();
    }

    let mut out: Vec<f64> = if inc > 0.0 {
        let i1 = (a / inc).ceil() as i64;
        let i2 = (b / inc).floor() as i64;
        (i1..=i2).map(|i| i as f64 * inc).collect()
    } else {
        let inc = -inc;
        let i1 = (a * inc).ceil() as i64;
        let i2 = (b * inc).floor() as i64;
        (i1..=i2).map(|i| i as f64 / inc).collect()
    };
    if reverse {
        out.reverse();
    }
    out
}

fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / (count.max(1) as f64);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_scale_respects_padding_and_range() {
        let x = BandScale::new(4, (40.0, 770.0), 0.1);
        // Steps are uniform and bands sit inside the range.
        assert!((x.position(1) - x.position(0) - x.step()).abs() < 1e-9);
        assert!(x.position(0) >= 40.0);
        assert!(x.position(3) + x.bandwidth() <= 770.0 + 1e-9);
        assert!((x.bandwidth() - x.step() * 0.9).abs() < 1e-9);
    }

    #[test]
    fn ticks_are_round_and_cover_the_domain() {
        let t = ticks(0.0, 9.0, 10);
        assert_eq!(t, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);

        let t = ticks(0.0, 970.0, 10);
        assert_eq!(t.first().copied(), Some(0.0));
        assert!(t.iter().all(|v| v % 100.0 == 0.0));
    }

    #[test]
    fn nice_expands_to_round_bounds() {
        let y = LinearScale::new((0.0, 9.7), (360.0, 20.0)).nice(10);
        assert_eq!(y.domain(), (0.0, 10.0));

        let y = LinearScale::new((0.0, 123.0), (360.0, 20.0)).nice(10);
        assert!(y.domain().1 >= 123.0);
        assert_eq!(y.domain().1 % 10.0, 0.0);
    }

    #[test]
    fn linear_scale_maps_and_inverts_direction() {
        let y = LinearScale::new((0.0, 10.0), (360.0, 20.0));
        assert_eq!(y.scale(0.0), 360.0);
        assert_eq!(y.scale(10.0), 20.0);
        assert_eq!(y.scale(5.0), 190.0);
    }

    #[test]
    fn degenerate_domain_pins_to_range_start() {
        let y = LinearScale::new((0.0, 0.0), (360.0, 20.0));
        assert_eq!(y.scale(0.0), 360.0);
        assert_eq!(ticks(0.0, 0.0, 10), vec![0.0]);
    }
}
