pub mod activity;
pub mod autoscroll;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod reconcile;
pub mod timer;
pub mod transport;

pub use activity::{
    ADAPTIVE_CARD_CONTENT_TYPE, Activity, Attachment, FinalMessage, MessageActivity, Role, SuggestedAction,
    TypingDelta, decode_activity, decode_feed,
};
pub use autoscroll::{AutoscrollController, AutoscrollState, ScrollBehavior, ScrollMetrics, ScrollRequest, Viewport};
pub use config::{AutoscrollConfig, Config, DemoConfig};
pub use error::{ActivityError, Error, Result};
pub use feed::{ActivityFeed, FeedSnapshot};
pub use reconcile::{ReconciledView, Reconciler, ViewChange, normalize_line_breaks, reconcile};
pub use timer::CoalescingTimer;
pub use transport::{ActivityTransport, OutgoingActivity};
