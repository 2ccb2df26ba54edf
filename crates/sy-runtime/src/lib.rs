pub mod config;
pub mod http_inbound;
pub mod supervisor;

pub use config::DeploymentConfig;
pub use supervisor::run;
