pub mod movies;
pub mod providers;
pub mod ranker;

pub use movies::MovieService;
