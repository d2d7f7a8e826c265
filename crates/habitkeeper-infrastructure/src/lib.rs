// Infrastructure layer - sqlx/SQLite implementations of the domain ports

pub mod persistence;
