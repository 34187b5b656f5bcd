//! Adapter Selection
//!
//! Picks the first enumerated adapter backed by GPU hardware. Software
//! and virtual adapters report no dedicated video memory and cannot hold
//! the swapchain we are about to create.

use wgpu::DeviceType;

/// Whether an adapter's device type counts as real GPU hardware.
pub(crate) fn adapter_suitable(device_type: DeviceType) -> bool {
    matches!(
        device_type,
        DeviceType::DiscreteGpu | DeviceType::IntegratedGpu
    )
}

/// First enumerated adapter that passes [`adapter_suitable`], in
/// enumeration order.
pub(crate) fn find_suitable_adapter(adapters: Vec<wgpu::Adapter>) -> Option<wgpu::Adapter> {
    log::info!("Looking for suitable adapter...");

    for adapter in adapters {
        let info = adapter.get_info();
        log::info!("Validating adapter: {}", info.name);

        if adapter_suitable(info.device_type) {
            log::info!(
                "Adapter validated! {} ({:?} on {:?}) is suitable",
                info.name,
                info.device_type,
                info.backend
            );
            return Some(adapter);
        }

        log::warn!("Adapter validated! {} is unsuitable", info.name);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::adapter_suitable;
    use wgpu::DeviceType;

    #[test]
    fn hardware_gpus_are_suitable() {
        assert!(adapter_suitable(DeviceType::DiscreteGpu));
        assert!(adapter_suitable(DeviceType::IntegratedGpu));
    }

    #[test]
    fn software_and_virtual_adapters_are_rejected() {
        assert!(!adapter_suitable(DeviceType::Cpu));
        assert!(!adapter_suitable(DeviceType::VirtualGpu));
        assert!(!adapter_suitable(DeviceType::Other));
    }
}
