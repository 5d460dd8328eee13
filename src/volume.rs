use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub struct Volume {
    volume: f32,
}

#[derive(Error, Debug, PartialEq)]
pub enum VolumeError {
    #[error("volume {0} exceeds 1.0")]
    ExceedMaximum(f32),
    #[error("volume {0} is below 0.0")]
    BelowMinimum(f32),
}

impl Volume {
    pub const FULL: Volume = Volume { volume: 1.0 };

    pub fn new(volume: f32) -> Result<Self, VolumeError> {
        Self::check(volume)?;
        Ok(Volume { volume })
    }

    pub fn get_volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<(), VolumeError> {
        Self::check(volume)?;
        self.volume = volume;
        Ok(())
    }

    fn check(volume: f32) -> Result<(), VolumeError> {
        if volume > 1.0 {
            Err(VolumeError::ExceedMaximum(volume))
        } else if volume < 0.0 {
            Err(VolumeError::BelowMinimum(volume))
        } else {
            Ok(())
        }
    }
}
