pub mod seaorm;

pub use seaorm::SeaOrmListingRepository;
