use foundation::time::Time;

/// Deterministic frame metadata.
///
/// This is the timebase the viewer's animation loop advances by. It is
/// intentionally small and pure so a flight can be replayed frame by frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    /// A 60 Hz frame at `index`.
    pub fn at_60hz(index: u64) -> Self {
        Self::new(index, 1.0 / 60.0)
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }

    /// Iterate `count` consecutive frames starting after `self`.
    pub fn following(self, count: u64) -> impl Iterator<Item = Frame> {
        let dt_s = self.dt_s;
        (1..=count).map(move |i| Frame::new(self.index + i, dt_s))
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 1.0 / 60.0);
        let b = Frame::new(10, 1.0 / 60.0);
        assert_eq!(a, b);
        assert_eq!(a.time, Time(10.0 / 60.0));
    }

    #[test]
    fn next_advances_index_and_time() {
        let f0 = Frame::new(0, 0.5);
        let f1 = f0.next();
        assert_eq!(f1.index, 1);
        assert_eq!(f1.time, Time(0.5));
    }

    #[test]
    fn following_yields_consecutive_frames() {
        let frames: Vec<u64> = Frame::new(4, 0.25).following(3).map(|f| f.index).collect();
        assert_eq!(frames, vec![5, 6, 7]);
    }
}
