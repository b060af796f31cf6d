pub mod dispatcher;
pub mod poller;
pub mod reconcile;
pub mod registry;
pub mod selection;

pub use dispatcher::CommandDispatcher;
pub use poller::StatusPoller;
pub use reconcile::StatusReconciler;
pub use registry::RunRegistry;
pub use selection::{Stage, StageSelection, StartCommand};
