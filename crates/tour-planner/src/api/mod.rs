// Remote services: the trip planner and the account service.

pub mod client;
pub mod session;
