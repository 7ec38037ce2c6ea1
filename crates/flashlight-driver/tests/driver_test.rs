//! Platform driver matching and device table tests.

mod common;

use std::sync::Arc;

use common::*;
use flashlight_core::{DeviceState, DriverConfig, Error, LineValue};
use flashlight_driver::{FlashlightDriver, PlatformDevice, PlatformEvent};
use flashlight_hardware::GpioTable;

#[test]
fn test_probe_and_remove() {
    let rig = Rig::new();
    let driver = rig.driver();
    assert_eq!(driver.name(), "flashlight");

    driver.probe(camera_flash()).unwrap();
    assert!(driver.is_attached(DEVICE));
    assert_eq!(driver.state(DEVICE), Some(DeviceState::Active));
    assert_eq!(driver.device_names(), vec![DEVICE.to_string()]);

    driver.remove(DEVICE).unwrap();
    assert!(!driver.is_attached(DEVICE));
    assert_eq!(driver.state(DEVICE), None);
    rig.assert_clean();
}

#[test]
fn test_probe_rejects_incompatible_device() {
    let rig = Rig::new();
    let driver = rig.driver();
    let device = PlatformDevice::new(
        "sensor",
        ["vendor,other", "vendor,fallback"],
        Arc::new(gpios(ENABLE_GPIO, TRIGGER_GPIO)),
    );

    let result = driver.probe(device);
    assert!(matches!(result, Err(Error::NoMatchingDevice { device }) if device == "sensor"));
    rig.assert_clean();
}

#[test]
fn test_probe_matches_any_compatible_entry() {
    let rig = Rig::new();
    let driver = rig.driver();
    let device = PlatformDevice::new(
        DEVICE,
        ["vendor,board-flash", "qcom,camera-flash"],
        Arc::new(gpios(ENABLE_GPIO, TRIGGER_GPIO)),
    );

    driver.probe(device).unwrap();
    assert!(driver.is_attached(DEVICE));
}

#[test]
fn test_probe_same_name_twice() {
    let rig = Rig::new();
    let driver = rig.driver();
    driver.probe(camera_flash()).unwrap();

    let result = driver.probe(device(DEVICE, gpios(20, 21)));
    assert!(matches!(result, Err(Error::AlreadyAttached(name)) if name == DEVICE));
    assert_eq!(rig.chip.requested_count(), 2);
    assert!(!rig.chip.is_requested(line(20)));
}

#[test]
fn test_failed_probe_is_not_recorded() {
    let rig = Rig::new();
    let driver = rig.driver();
    let table = GpioTable::new().with_collection("qcom,flash-gpios", [ENABLE_GPIO]);

    let result = driver.probe(device(DEVICE, table));
    assert!(matches!(result, Err(Error::Config(_))));
    assert!(driver.device_names().is_empty());

    // A corrected description attaches under the same name.
    driver.probe(camera_flash()).unwrap();
    assert_eq!(driver.state(DEVICE), Some(DeviceState::Active));
}

#[test]
fn test_remove_unknown_device() {
    let rig = Rig::new();
    let driver = rig.driver();
    let result = driver.remove("nope");
    assert!(matches!(result, Err(Error::UnknownDevice(_))));
}

#[test]
fn test_events() {
    let rig = Rig::new();
    let driver = rig.driver();

    let attach = PlatformEvent::Attach(camera_flash());
    driver.handle_event(attach).unwrap();
    rig.tree.write(FLASH_ON_PATH, "1").unwrap();

    driver
        .handle_event(PlatformEvent::Detach(DEVICE.to_string()))
        .unwrap();
    rig.assert_clean();

    let again = PlatformEvent::Detach(DEVICE.to_string());
    assert!(driver.handle_event(again).is_err());
}

#[test]
fn test_with_device_and_status() {
    let rig = Rig::new();
    let driver = rig.driver();
    driver.probe(camera_flash()).unwrap();

    driver
        .with_device(DEVICE, |context| context.flash_on().write("1\n"))
        .unwrap()
        .unwrap();

    let status = driver.status(DEVICE).unwrap();
    assert_eq!(status.enable_value, Some(LineValue::HIGH));
    assert_eq!(status.enable_line, line(ENABLE_GPIO));

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["state"], "active");
    assert_eq!(json["enable_line"], 12);
    assert_eq!(json["enable_value"], 1);

    assert!(driver.with_device("nope", |_| ()).is_err());
}

#[test]
fn test_two_devices_with_separate_surfaces() {
    let rig = Rig::new();
    let mut config = DriverConfig::default();
    config.torch.enabled = false;
    let driver = FlashlightDriver::new(config, rig.platform());

    driver.probe(device("a", gpios(12, 13))).unwrap();
    // Surface names collide, so the second device is rolled back.
    let result = driver.probe(device("b", gpios(20, 21)));
    assert!(matches!(result, Err(Error::Registration { .. })));
    assert_eq!(driver.device_names(), vec!["a".to_string()]);
    assert!(!rig.chip.is_requested(line(20)));
}

#[test]
fn test_shutdown_detaches_everything() {
    let rig = Rig::new();
    let driver = rig.driver();
    driver.probe(camera_flash()).unwrap();

    driver.shutdown();
    assert!(driver.device_names().is_empty());
    rig.assert_clean();
}

#[test]
fn test_drop_detaches_everything() {
    let rig = Rig::new();
    {
        let driver = rig.driver();
        driver.probe(camera_flash()).unwrap();
    }
    rig.assert_clean();
}
