//! Repository ports for the catalog resources.

pub mod cast_members;
pub mod categories;
pub mod genres;
pub mod videos;

pub use cast_members::CastMembersRepository;
pub use categories::CategoriesRepository;
pub use genres::GenresRepository;
pub use videos::VideosRepository;
