//! Compute device enumeration and selection.
//!
//! A platform is a wgpu backend (Vulkan, Metal, DX12, GL); a device is one
//! adapter on a platform. The catalog only queries the runtime — it never
//! creates contexts or mutates global state. Selection is deterministic:
//! every lookup scans the enumeration order once and ties break on the
//! lowest index.

use serde::Serialize;
use wgpu::{Adapter, Backend, Instance};

use crate::error::FilterError;

/// Coarse device classification, independent of the backend's own taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceClass {
    Cpu,
    Gpu,
    Other,
}

impl DeviceClass {
    fn from_device_type(device_type: wgpu::DeviceType) -> Self {
        match device_type {
            wgpu::DeviceType::DiscreteGpu
            | wgpu::DeviceType::IntegratedGpu
            | wgpu::DeviceType::VirtualGpu => DeviceClass::Gpu,
            wgpu::DeviceType::Cpu => DeviceClass::Cpu,
            wgpu::DeviceType::Other => DeviceClass::Other,
        }
    }
}

/// A selectable compute device.
///
/// Read-only and cheap to clone (`wgpu::Adapter` is reference counted), so
/// descriptors can be shared freely across engine instances. The engine
/// consumes a descriptor; it never touches the catalog itself.
#[derive(Debug, Clone)]
pub struct DeviceDescriptor {
    adapter: Adapter,
    name: String,
    class: DeviceClass,
    backend: Backend,
}

impl DeviceDescriptor {
    fn from_adapter(adapter: Adapter) -> Self {
        let info = adapter.get_info();
        Self {
            name: info.name,
            class: DeviceClass::from_device_type(info.device_type),
            backend: info.backend,
            adapter,
        }
    }

    /// Human-readable device name as reported by the driver.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> DeviceClass {
        self.class
    }

    /// The platform this device was enumerated on.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub(crate) fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Serializable summary for settings UIs and diagnostics.
    pub fn info(&self) -> DeviceInfo {
        DeviceInfo {
            name: self.name.clone(),
            class: self.class,
            backend: self.backend.to_string(),
        }
    }
}

/// Plain-data device summary (what a device picker needs to render a row).
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub name: String,
    pub class: DeviceClass,
    pub backend: String,
}

/// Enumerates compute platforms and devices.
///
/// Enumeration is fresh on every call; nothing is cached beyond the wgpu
/// instance itself.
pub struct DeviceCatalog {
    instance: Instance,
}

impl DeviceCatalog {
    /// Create a catalog over all native backends.
    pub fn new() -> Self {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self { instance }
    }

    /// Ordered list of platforms that expose at least one device.
    ///
    /// Empty means no compute runtime is available on this host.
    pub fn platforms(&self) -> Vec<Backend> {
        let mut platforms = Vec::new();
        for adapter in self.instance.enumerate_adapters(wgpu::Backends::all()) {
            let backend = adapter.get_info().backend;
            if !platforms.contains(&backend) {
                platforms.push(backend);
            }
        }
        platforms
    }

    /// Devices on one platform, in enumeration order. Empty is a valid,
    /// non-error result.
    pub fn devices(&self, platform: Backend) -> Vec<DeviceDescriptor> {
        self.instance
            .enumerate_adapters(wgpu::Backends::all())
            .into_iter()
            .filter(|a| a.get_info().backend == platform)
            .map(DeviceDescriptor::from_adapter)
            .collect()
    }

    /// Every device across all platforms, in enumeration order.
    pub fn all_devices(&self) -> Vec<DeviceDescriptor> {
        self.instance
            .enumerate_adapters(wgpu::Backends::all())
            .into_iter()
            .map(DeviceDescriptor::from_adapter)
            .collect()
    }

    /// Driver-reported names of every device, for device-picker menus.
    pub fn device_names(&self) -> Vec<String> {
        self.all_devices()
            .into_iter()
            .map(|d| d.name)
            .collect()
    }

    /// First device on the first platform.
    pub fn default_device(&self) -> Result<DeviceDescriptor, FilterError> {
        let device = self
            .all_devices()
            .into_iter()
            .next()
            .ok_or(FilterError::NoDeviceAvailable)?;
        log::debug!(
            "default device: {} ({:?}, {:?})",
            device.name,
            device.backend,
            device.class
        );
        Ok(device)
    }

    /// First device whose class matches, scanning enumeration order once.
    pub fn device_by_class(&self, class: DeviceClass) -> Result<DeviceDescriptor, FilterError> {
        self.all_devices()
            .into_iter()
            .find(|d| d.class == class)
            .ok_or(FilterError::DeviceClassNotFound(class))
    }

    /// Device at an explicit (platform index, device index) position.
    pub fn device_at(
        &self,
        platform_index: usize,
        device_index: usize,
    ) -> Result<DeviceDescriptor, FilterError> {
        let platform = self
            .platforms()
            .into_iter()
            .nth(platform_index)
            .ok_or(FilterError::NoDeviceAvailable)?;
        self.devices(platform)
            .into_iter()
            .nth(device_index)
            .ok_or(FilterError::NoDeviceAvailable)
    }
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platforms_and_devices_consistent() {
        let catalog = DeviceCatalog::new();
        let platforms = catalog.platforms();
        let total: usize = platforms.iter().map(|&p| catalog.devices(p).len()).sum();
        assert_eq!(total, catalog.all_devices().len());
        // Every listed platform has at least one device by construction.
        for p in platforms {
            assert!(!catalog.devices(p).is_empty());
        }
    }

    #[test]
    fn test_default_device_matches_enumeration() {
        let catalog = DeviceCatalog::new();
        if catalog.platforms().is_empty() {
            assert!(matches!(
                catalog.default_device(),
                Err(FilterError::NoDeviceAvailable)
            ));
        } else {
            let first = catalog.all_devices().remove(0);
            let default = catalog.default_device().unwrap();
            assert_eq!(default.name(), first.name());
            assert!(!default.name().is_empty());
        }
    }

    #[test]
    fn test_device_by_class_is_first_match() {
        let catalog = DeviceCatalog::new();
        let devices = catalog.all_devices();
        match devices.iter().find(|d| d.class() == DeviceClass::Gpu) {
            Some(first_gpu) => {
                let picked = catalog.device_by_class(DeviceClass::Gpu).unwrap();
                assert_eq!(picked.name(), first_gpu.name());
            }
            None => {
                assert!(matches!(
                    catalog.device_by_class(DeviceClass::Gpu),
                    Err(FilterError::DeviceClassNotFound(DeviceClass::Gpu))
                ));
            }
        }
    }

    #[test]
    fn test_device_at_out_of_range() {
        let catalog = DeviceCatalog::new();
        assert!(matches!(
            catalog.device_at(usize::MAX, 0),
            Err(FilterError::NoDeviceAvailable)
        ));
    }

    #[test]
    fn test_device_names_match_devices() {
        let catalog = DeviceCatalog::new();
        let names = catalog.device_names();
        let devices = catalog.all_devices();
        assert_eq!(names.len(), devices.len());
        for (name, device) in names.iter().zip(&devices) {
            assert_eq!(name, device.name());
        }
    }
}
