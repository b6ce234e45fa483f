//! UI Components

pub mod connect_button;
pub mod navbar;
pub mod send_modal;

pub use connect_button::ConnectButton;
pub use navbar::Navbar;
pub use send_modal::SendModal;
