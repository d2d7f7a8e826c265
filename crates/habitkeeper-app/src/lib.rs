// Application layer - services and queries the API collaborator consumes

pub mod application;
pub mod bootstrap;
