pub mod controls;

pub use controls::ZoomControl;
