pub mod mock_service;
pub mod poll_service;
pub mod stream_service;

pub use mock_service::MockService;
pub use poll_service::{FailurePolicy, PollService};
pub use stream_service::StreamService;
