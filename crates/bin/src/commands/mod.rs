pub mod health;
pub mod keys;
pub mod serve;
pub mod verify;
