pub mod capabilities;
pub mod hardware;
pub mod host;
pub mod load;
pub mod system;
