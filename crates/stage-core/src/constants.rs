use std::time::Duration;

// Shared choreography tuning constants used by the engine and the web frontend.

// Timeline phase bounds (normalized pin progress)
pub const ENTRANCE_END: f32 = 0.3; // entrance occupies [0, 0.3)
pub const EXIT_START: f32 = 0.7; // settle occupies [0.3, 0.7), exit [0.7, 1.0]

// Snap coordination
pub const SNAP_BUFFER: f64 = 0.02; // tolerance band around each pinned range
pub const SNAP_EDGE_EPSILON: f64 = 1e-9; // keeps buffer edges inclusive under float error
pub const SNAP_SETTLE_DELAY: Duration = Duration::from_millis(100); // wait before reading pin geometry
pub const SNAP_DURATION_MIN_SEC: f64 = 0.15;
pub const SNAP_DURATION_MAX_SEC: f64 = 0.35;
pub const SNAP_SEC_PER_UNIT: f64 = 2.5; // normalized distance -> seconds, before clamping
pub const SNAP_MIN_DISTANCE_PX: f64 = 1.0; // below this the page is already "there"
pub const SNAP_TAKEOVER_PX: f64 = 3.0; // page moved this far from the last snap write = someone else scrolled
pub const SCROLL_SETTLE_IDLE: Duration = Duration::from_millis(120); // no scroll events for this long = settled

// Scrub damping: time constant per unit of scrub lag
pub const SCRUB_TAU_PER_LAG_SEC: f32 = 0.25;
pub const SCRUB_SETTLE_EPSILON: f32 = 1e-4; // snap smoothed progress onto its target below this gap

// Flowing reveals
pub const REVEAL_DURATION_SEC: f32 = 0.8;
pub const REVEAL_CARD_DURATION_SEC: f32 = 0.6;

// Metric counters
pub const COUNTER_DURATION_SEC: f64 = 2.0;
pub const COUNTER_STAGGER_SEC: f64 = 0.15;

// Ambient voice-wave loop
pub const AMBIENT_PERIOD_SEC: f32 = 1.2;
pub const AMBIENT_STAGGER_SEC: f32 = 0.1;
pub const AMBIENT_LOW_SCALE: f32 = 0.6;

// Process-wide motion switch (pin/scrub/snap/reveal); load intro ignores it
pub const ENABLE_SCROLL_ANIMATIONS: bool = true;
