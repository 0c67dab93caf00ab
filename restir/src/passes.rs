mod init_light_plus_temporal;
mod spatial_reuse;
mod update_reservoir_plus_shade;

pub use self::init_light_plus_temporal::*;
pub use self::spatial_reuse::*;
pub use self::update_reservoir_plus_shade::*;
