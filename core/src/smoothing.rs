use std::collections::VecDeque;

use ordered_float::OrderedFloat;

/// Etterslepende glidende snitt over de siste `window` verdiene.
/// Vindu 1 = ingen glatting.
#[derive(Debug, Clone)]
pub struct TrailingAverage {
    window: usize,
    buf: VecDeque<f64>,
    sum: f64,
}

impl TrailingAverage {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self { window, buf: VecDeque::with_capacity(window), sum: 0.0 }
    }

    /// Legg til ny verdi og returner snittet av vinduet (kortere i starten).
    pub fn push(&mut self, x: f64) -> f64 {
        self.buf.push_back(x);
        self.sum += x;
        if self.buf.len() > self.window {
            if let Some(old) = self.buf.pop_front() {
                self.sum -= old;
            }
        }
        self.sum / self.buf.len() as f64
    }

    pub fn reset(&mut self) {
        self.buf.clear();
        self.sum = 0.0;
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

/// Robust 3-punkts medianfilter.
/// Endepunkter bruker seg selv som naboverdi (repeteres) for å holde lengden.
pub fn median3(xs: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let a0 = if i > 0 { xs[i - 1] } else { xs[i] };
        let a1 = xs[i];
        let a2 = if i + 1 < n { xs[i + 1] } else { xs[i] };

        let mut win = [OrderedFloat(a0), OrderedFloat(a1), OrderedFloat(a2)];
        win.sort();
        out.push(win[1].0); // median
    }

    out
}
