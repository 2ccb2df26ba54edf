mod claimset;
mod cycle;
mod lock;
mod poller;
mod protocol;

pub use claimset::{ClaimGuard, ClaimSet};
pub use poller::run;
pub use protocol::{uri_to_path, FileEntry, FileProtocol, LocalFileProtocol};
