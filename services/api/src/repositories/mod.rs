//! Repositories for database operations

pub mod filter;
pub mod house;
pub mod interest;
pub mod user;

pub use house::HouseRepository;
pub use interest::InterestRepository;
pub use user::UserRepository;
