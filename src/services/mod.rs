pub mod compare;
pub mod rankings;
pub mod roster_admin;
pub mod server;
