pub mod models;
pub mod repo;

pub use self::models::User;
pub use self::repo::UserRepo;
