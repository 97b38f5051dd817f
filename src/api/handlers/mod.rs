pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::login;

pub mod active;
pub use self::active::active;

#[cfg(test)]
mod tests;
