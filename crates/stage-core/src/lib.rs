pub mod anchor;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod controller;
pub mod counter;
pub mod easing;
pub mod error;
pub mod host;
pub mod intro;
pub mod parallax;
pub mod pin;
pub mod registry;
pub mod reveal;
pub mod sampler;
pub mod snap;
pub mod stage;
pub mod style;
pub mod timeline;

pub use catalog::Catalog;
pub use config::MotionConfig;
pub use error::StageError;
pub use host::ElementHost;
pub use sampler::{ScrollMetrics, ScrollSampler, SectionGeometry, Viewport};
pub use snap::{PinnedRange, SnapRegistry};
pub use stage::{Stage, StageOutput};
pub use style::{ElementStyle, Frame, TargetKey};
