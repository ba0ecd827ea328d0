use serde::{Deserialize, Serialize};

/// Video fields that survive a snapshot: the CRTC scroll RAM and the
/// layer-enable register. Tile and sprite RAM belong to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSaveState {
    pub version: u32,
    pub scroll: [u16; 4],
    pub layer_enable: u8,
}

impl VideoSaveState {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn check_version(&self) -> Result<(), String> {
        if self.version > Self::CURRENT_VERSION {
            return Err(format!(
                "Save state version {} is not supported (current: {})",
                self.version,
                Self::CURRENT_VERSION
            ));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        let state: VideoSaveState = bincode::deserialize(data)?;
        state.check_version()?;
        Ok(state)
    }

    pub fn save_to_file(&self, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
        let data = self.to_bytes()?;
        std::fs::write(filename, data)?;
        log::info!("Save state written to: {}", filename);
        Ok(())
    }

    pub fn load_from_file(filename: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read(filename)?;
        let state = Self::from_bytes(&data)?;
        log::info!("Save state loaded from: {}", filename);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_round_trip() {
        let state = VideoSaveState {
            version: VideoSaveState::CURRENT_VERSION,
            scroll: [0x0123, 0xFFFF, 0x8000, 0x0042],
            layer_enable: 0x11,
        };
        let bytes = state.to_bytes().unwrap();
        assert_eq!(VideoSaveState::from_bytes(&bytes).unwrap(), state);
    }

    #[test]
    fn test_future_version_rejected() {
        let state = VideoSaveState {
            version: VideoSaveState::CURRENT_VERSION + 1,
            scroll: [0; 4],
            layer_enable: 0,
        };
        let bytes = state.to_bytes().unwrap();
        assert!(VideoSaveState::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_truncated_data_is_an_error() {
        assert!(VideoSaveState::from_bytes(&[1, 0]).is_err());
    }
}
