pub mod seaorm;

pub use seaorm::SeaOrmCommentRepository;
