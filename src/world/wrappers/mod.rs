//! Wrapper worlds that compose a base [`World`](crate::world::World).
//!
//! Two families: [`Scale`] and [`OneHot`] post-process the observation
//! returned by the inner world; [`Integrator`] and [`Freeze`] extend the
//! action set with local "device" actions that never advance the inner
//! world, letting a memoryless model carry information across time by
//! learning when to set flags.

mod device;
mod one_hot;
mod scale;

pub use device::{Device, DeviceWorld, Freeze, Integrator};
pub use one_hot::{OneHot, Range};
pub use scale::Scale;
