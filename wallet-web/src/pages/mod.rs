//! Page modules

pub mod account;
pub mod connect;

pub use account::AccountPage;
pub use connect::ConnectPage;
