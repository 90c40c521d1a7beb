/// Pre-arrival margin in logical pixels: loading starts before the sentinel
/// is literally visible.
pub const SENTINEL_MARGIN: f32 = 160.0;

/// Proximity check for the invisible anchor after the last rendered row.
/// The surface feeds it scroll metrics; the coordinator decides whether a
/// near sentinel may actually advance paging.
#[derive(Debug, Clone, Copy)]
pub struct SentinelProbe {
    pub margin: f32,
}

impl Default for SentinelProbe {
    fn default() -> Self {
        Self {
            margin: SENTINEL_MARGIN,
        }
    }
}

impl SentinelProbe {
    pub fn new(margin: f32) -> Self {
        Self { margin }
    }

    /// True once the gap below the viewport shrinks to the margin. A
    /// content run shorter than the viewport counts as near: the sentinel
    /// sits inside the visible region.
    pub fn near(&self, content_height: f32, viewport_offset_y: f32, viewport_height: f32) -> bool {
        content_height - (viewport_offset_y + viewport_height) <= self.margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_from_the_end_stays_quiet() {
        let probe = SentinelProbe::default();
        assert!(!probe.near(5000.0, 0.0, 600.0));
    }

    #[test]
    fn margin_fires_before_the_sentinel_is_visible() {
        let probe = SentinelProbe::new(160.0);
        assert!(probe.near(5000.0, 4250.0, 600.0));
        assert!(!probe.near(5000.0, 4200.0, 600.0));
    }

    #[test]
    fn short_content_is_always_near() {
        let probe = SentinelProbe::default();
        assert!(probe.near(300.0, 0.0, 600.0));
    }
}
