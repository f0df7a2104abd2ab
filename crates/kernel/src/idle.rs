/// Ask the application to export the current frame as a thumbnail.
///
/// Carries the frame index it was raised on. Fulfilling it is best-effort and
/// must happen off the frame path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRequest {
    pub frame: u64,
}

/// Counts still frames and asks for one snapshot once the viewer has been
/// idle for longer than the threshold.
///
/// The counter is decremented on every frame. A frame with motion puts it back
/// to the threshold; a still frame that leaves it below zero raises a request
/// and puts it back as well, so a long idle period exports periodically.
#[derive(Debug, Clone)]
pub struct IdleSnapshotPolicy {
    threshold: i32,
    counter: i32,
}

impl IdleSnapshotPolicy {
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold,
            counter: threshold,
        }
    }

    pub fn counter(&self) -> i32 {
        self.counter
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    pub fn is_idle(&self) -> bool {
        self.counter < self.threshold
    }

    pub fn maybe_export(&mut self, frame_had_motion: bool, frame: u64) -> Option<ExportRequest> {
        self.counter -= 1;
        if frame_had_motion {
            self.counter = self.threshold;
            return None;
        }
        if self.counter < 0 {
            self.counter = self.threshold;
            tracing::debug!(frame, "idle snapshot requested");
            return Some(ExportRequest { frame });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_still(policy: &mut IdleSnapshotPolicy, frames: u64, first: u64) -> Vec<ExportRequest> {
        (first..first + frames)
            .filter_map(|f| policy.maybe_export(false, f))
            .collect()
    }

    #[test]
    fn exports_once_after_threshold_still_frames() {
        let mut policy = IdleSnapshotPolicy::new(100);
        assert_eq!(policy.threshold(), 100);
        assert!(run_still(&mut policy, 100, 0).is_empty());
        assert_eq!(policy.counter(), 0);
        assert_eq!(policy.maybe_export(false, 100), Some(ExportRequest { frame: 100 }));
        assert_eq!(policy.counter(), 100);
    }

    #[test]
    fn motion_resets_and_suppresses() {
        let mut policy = IdleSnapshotPolicy::new(100);
        assert!(run_still(&mut policy, 90, 0).is_empty());
        assert_eq!(policy.maybe_export(true, 90), None);
        assert_eq!(policy.counter(), 100);
        assert!(!policy.is_idle());
        assert!(run_still(&mut policy, 100, 91).is_empty());
        assert!(policy.is_idle());
    }

    #[test]
    fn long_idle_exports_periodically() {
        let mut policy = IdleSnapshotPolicy::new(100);
        let requests = run_still(&mut policy, 303, 0);
        let frames: Vec<u64> = requests.iter().map(|r| r.frame).collect();
        assert_eq!(frames, vec![100, 201, 302]);
    }

    #[test]
    fn motion_never_exports() {
        let mut policy = IdleSnapshotPolicy::new(3);
        for f in 0..50 {
            assert_eq!(policy.maybe_export(true, f), None);
        }
    }
}
