pub mod clock;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod engine;
pub mod jet;
pub mod pressure;
pub mod ripple;
pub mod status;
pub mod topology;
pub mod transfer;
pub mod vessel;

pub use clock::*;
pub use config::*;
pub use cycle::*;
pub use engine::*;
pub use jet::*;
pub use pressure::*;
pub use ripple::*;
pub use status::*;
pub use topology::*;
pub use transfer::*;
pub use vessel::*;
