//! Touch panel calibration: corner sampling, the calibration file and the
//! coordinate transform applied to live touch input.

pub mod calibration;
#[cfg(test)]
pub mod calibration_test;
pub mod sampler;
#[cfg(test)]
pub mod sampler_test;
pub mod target;
pub mod transform;
