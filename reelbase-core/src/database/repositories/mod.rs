//! PostgreSQL repository implementations.

pub mod cast_members;
pub mod categories;
pub mod genres;
pub mod videos;

pub use cast_members::PostgresCastMembersRepository;
pub use categories::PostgresCategoriesRepository;
pub use genres::PostgresGenresRepository;
pub use videos::PostgresVideosRepository;
