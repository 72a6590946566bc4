//! Device detection for model inference
//!
//! Detects the compute devices this build can use (CPU always, CUDA and Metal behind
//! cargo features) and resolves a configured preference to a concrete candle device.

use crate::error::{BrieflyError, Result};
use candle_core::Device;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Device types supported for ML inference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeviceType {
    /// CPU inference
    Cpu,
    /// CUDA GPU inference
    Cuda(usize),
    /// Metal GPU inference (macOS)
    Metal,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Cpu => write!(f, "cpu"),
            DeviceType::Cuda(ordinal) => write!(f, "cuda:{}", ordinal),
            DeviceType::Metal => write!(f, "metal"),
        }
    }
}

impl FromStr for DeviceType {
    type Err = BrieflyError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "cpu" => Ok(DeviceType::Cpu),
            "metal" => Ok(DeviceType::Metal),
            "cuda" | "gpu" => Ok(DeviceType::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|ordinal| ordinal.parse().ok())
                .map(DeviceType::Cuda)
                .ok_or_else(|| BrieflyError::Config(format!("Unknown device '{}'", s))),
        }
    }
}

/// Device information and capabilities
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Device type
    pub device_type: DeviceType,
    /// Candle device instance
    pub device: Device,
    /// Device name/description
    pub name: String,
}

/// Set of devices available to this process
pub struct DeviceManager {
    available_devices: Vec<DeviceInfo>,
}

impl DeviceManager {
    /// Probe the devices compiled into this build
    pub fn detect() -> Self {
        let mut available_devices = vec![DeviceInfo {
            device_type: DeviceType::Cpu,
            device: Device::Cpu,
            name: "CPU".to_string(),
        }];

        #[cfg(feature = "cuda")]
        {
            for ordinal in 0..8 {
                match Device::new_cuda(ordinal) {
                    Ok(device) => {
                        log::info!("Detected CUDA device {}", ordinal);
                        available_devices.push(DeviceInfo {
                            device_type: DeviceType::Cuda(ordinal),
                            device,
                            name: format!("CUDA GPU {}", ordinal),
                        });
                    }
                    Err(_) => break,
                }
            }
        }

        #[cfg(feature = "metal")]
        {
            if let Ok(device) = Device::new_metal(0) {
                log::info!("Detected Metal GPU");
                available_devices.push(DeviceInfo {
                    device_type: DeviceType::Metal,
                    device,
                    name: "Metal GPU".to_string(),
                });
            }
        }

        Self { available_devices }
    }

    /// All detected devices
    pub fn available_devices(&self) -> &[DeviceInfo] {
        &self.available_devices
    }

    /// Resolve a preference, falling back to the CPU when it is not available
    pub fn select(&self, preferred: DeviceType) -> &DeviceInfo {
        match self
            .available_devices
            .iter()
            .find(|d| d.device_type == preferred)
        {
            Some(info) => info,
            None => {
                log::warn!("Device {} not available, falling back to CPU", preferred);
                &self.available_devices[0]
            }
        }
    }
}
