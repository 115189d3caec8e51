pub mod datastore;
pub mod dependency;
pub mod executable;
pub mod launch_mode;
pub mod parameters;
pub mod platform;
pub mod record;
pub mod repository;

pub use datastore::Datastore;
pub use dependency::Dependency;
pub use executable::Executable;
pub use launch_mode::LaunchMode;
pub use parameters::ParameterSet;
pub use platform::PlatformInformation;
pub use record::{join_tags, split_tags, SimRecord};
pub use repository::Repository;
