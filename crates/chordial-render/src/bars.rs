use crate::model::{AxisTickLayout, BarChartLayout, BarLayout, Bounds};
use crate::scale::{BandScale, LinearScale};
use crate::{Error, Result, Surface};
use chordial_core::ValueSeries;

#[derive(Debug, Clone, Copy)]
struct Margins {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

const MARGINS: Margins = Margins {
    top: 20.0,
    right: 30.0,
    bottom: 40.0,
    left: 40.0,
};

const Y_TICK_COUNT: usize = 10;

/// Bar chart layout: band x-scale over indices, niced linear y-scale from
/// zero to the series maximum, bars dropping to the bottom-axis baseline.
pub fn layout_bars(series: &ValueSeries, surface: Surface) -> Result<BarChartLayout> {
    let w = surface.width;
    let h = surface.height;
    if w - MARGINS.left - MARGINS.right <= 0.0 || h - MARGINS.top - MARGINS.bottom <= 0.0 {
        return Err(Error::DegenerateSurface {
            width: w,
            height: h,
        });
    }

    let x = BandScale::new(series.len(), (MARGINS.left, w - MARGINS.right), 0.1);
    let y = LinearScale::new((0.0, series.max()), (h - MARGINS.bottom, MARGINS.top))
        .nice(Y_TICK_COUNT);

    let baseline_y = y.scale(0.0);

    let bars: Vec<BarLayout> = series
        .values()
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let top = y.scale(v);
            BarLayout {
                index: i,
                value: v,
                x: x.position(i),
                y: top,
                width: x.bandwidth(),
                height: baseline_y - top,
            }
        })
        .collect();

    let x_ticks: Vec<AxisTickLayout> = (0..series.len())
        .map(|i| AxisTickLayout {
            position: x.position(i) + x.bandwidth() / 2.0,
            label: format!("Item {}", i + 1),
        })
        .collect();

    let y_ticks: Vec<AxisTickLayout> = y
        .ticks(Y_TICK_COUNT)
        .into_iter()
        .map(|v| AxisTickLayout {
            position: y.scale(v),
            label: crate::svg::fmt(v),
        })
        .collect();

    Ok(BarChartLayout {
        width: w,
        height: h,
        bars,
        x_ticks,
        y_ticks,
        baseline_y,
        axis_x: MARGINS.left,
        axis_right: w - MARGINS.right,
        bounds: Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: w,
            max_y: h,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordial_core::SeriesDataset;

    fn series(values: Vec<f64>) -> ValueSeries {
        SeriesDataset { values }.validate().unwrap()
    }

    fn surface() -> Surface {
        Surface::new(800.0, 400.0).unwrap()
    }

    #[test]
    fn one_bar_per_value_dropping_to_the_baseline() {
        let layout = layout_bars(&series(vec![3.0, 7.0, 5.0]), surface()).unwrap();
        assert_eq!(layout.bars.len(), 3);
        for bar in &layout.bars {
            assert!((bar.y + bar.height - layout.baseline_y).abs() < 1e-9);
            assert!(bar.height >= 0.0);
            assert!(bar.x >= 40.0 && bar.x + bar.width <= 770.0 + 1e-9);
        }
        // Taller value, taller bar.
        assert!(layout.bars[1].height > layout.bars[0].height);
    }

    #[test]
    fn baseline_sits_at_the_bottom_margin() {
        let layout = layout_bars(&series(vec![1.0, 2.0]), surface()).unwrap();
        assert_eq!(layout.baseline_y, 360.0);
        assert_eq!(layout.axis_x, 40.0);
    }

    #[test]
    fn x_ticks_are_centered_under_bars() {
        let layout = layout_bars(&series(vec![1.0, 2.0]), surface()).unwrap();
        assert_eq!(layout.x_ticks.len(), 2);
        assert_eq!(layout.x_ticks[0].label, "Item 1");
        let bar = &layout.bars[0];
        assert!((layout.x_ticks[0].position - (bar.x + bar.width / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn y_ticks_cover_the_niced_domain() {
        let layout = layout_bars(&series(vec![9.7]), surface()).unwrap();
        assert_eq!(layout.y_ticks.first().map(|t| t.label.as_str()), Some("0"));
        assert_eq!(layout.y_ticks.last().map(|t| t.label.as_str()), Some("10"));
        // Top tick sits at the top margin since the domain was niced to 10.
        assert!((layout.y_ticks.last().unwrap().position - 20.0).abs() < 1e-9);
    }

    #[test]
    fn surface_smaller_than_the_margins_is_rejected() {
        let err = layout_bars(&series(vec![3.0, 7.0]), Surface::new(50.0, 50.0).unwrap())
            .unwrap_err();
        assert!(matches!(err, crate::Error::DegenerateSurface { .. }));

        // Just past the margins is drawable again.
        let layout = layout_bars(&series(vec![3.0, 7.0]), Surface::new(71.0, 61.0).unwrap())
            .unwrap();
        for bar in &layout.bars {
            assert!(bar.width > 0.0);
            assert!(bar.height >= 0.0);
        }
    }

    #[test]
    fn all_zero_series_yields_flat_bars() {
        let layout = layout_bars(&series(vec![0.0, 0.0]), surface()).unwrap();
        for bar in &layout.bars {
            assert_eq!(bar.height, 0.0);
            assert_eq!(bar.y, layout.baseline_y);
        }
    }
}
