// Arc splitting adapted from AngleIter, https://vcs.cozydsp.space/cozy-dsp/cozy-ui/src/commit/d4706ec9f4592137307ce8acafb56b881ea54e35/src/util.rs#L49

/// Splits the arc from `start` to `end` (radians) into consecutive pieces no
/// wider than `max_step`, yielding `(piece_start, piece_end)` pairs.
pub struct ArcSteps {
    start: Option<f32>,
    end: f32,
    max_step: f32,
}

impl ArcSteps {
    pub fn new(start_angle: f32, end_angle: f32, max_step: f32) -> Self {
        Self {
            start: Some(start_angle),
            end: end_angle,
            max_step: max_step.abs().max(f32::EPSILON),
        }
    }
}

impl Iterator for ArcSteps {
    type Item = (f32, f32);

    fn next(&mut self) -> Option<Self::Item> {
        self.start.map(|start| {
            let diff = self.end - start;
            if diff.abs() <= self.max_step {
                self.start = None;
                (start, self.end)
            } else {
                let new_start = start + (self.max_step * diff.signum());
                self.start = Some(new_start);
                (start, new_start)
            }
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (
            0,
            self.start
                .map(|start| ((self.end - start).abs() / self.max_step).ceil().max(1.0) as usize),
        )
    }
}
