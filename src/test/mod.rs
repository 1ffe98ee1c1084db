
pub use transport::*;

use crate::{
    client::{Session, SessionGate},
    config::TraversalConfig,
    model::{CimClass, CimInstance, CimType, ObjectPath, Property, Qualifier},
};

pub const NAMESPACE: &str = "root/cimv2";

// Helper function to create a key property
pub fn create_key(name: &str, value: &str) -> Property {
    Property::new(name, value).with_qualifier(Qualifier::new("Key", true))
}

// Helper function to create a logical disk instance keyed by DeviceID
pub fn create_disk(device_id: &str, size: u64) -> CimInstance {
    CimInstance::new("CIM_LogicalDisk")
        .with_property(create_key("DeviceID", device_id))
        .with_property(Property::new("Size", size).with_qualifier(Qualifier::new("Units", "Bytes")))
        .with_property(Property::declared("VolumeName", CimType::String))
}

// Helper function to create the path of a disk created by create_disk
pub fn disk_path(device_id: &str) -> ObjectPath {
    ObjectPath::new(NAMESPACE, "CIM_LogicalDisk").with_key("DeviceID", device_id)
}

// Helper function to create a class with one key property
pub fn create_class(name: &str, superclass: Option<&str>) -> CimClass {
    let class = CimClass::new(name)
        .with_qualifier(Qualifier::new("Description", format!("The {} class", name)))
        .with_property(
            Property::declared("Name", CimType::String).with_qualifier(Qualifier::new("Key", true)),
        );
    match superclass {
        Some(parent) => class.with_superclass(parent),
        None => class,
    }
}

// Helper function to create a small class hierarchy
pub fn create_hierarchy(transport: MockTransport) -> MockTransport {
    transport
        .with_class(create_class("CIM_ManagedElement", None))
        .with_class(create_class(
            "CIM_LogicalElement",
            Some("CIM_ManagedElement"),
        ))
        .with_class(create_class(
            "CIM_LogicalDevice",
            Some("CIM_LogicalElement"),
        ))
        .with_class(create_class("CIM_LogicalDisk", Some("CIM_LogicalDevice")))
}

// Helper function to create a session connected to `transport`
pub fn create_session(transport: &MockTransport) -> Session<MockConnector> {
    create_session_with(transport, TraversalConfig::default())
}

// Helper function to create a session connected to `transport` using `config`
pub fn create_session_with(
    transport: &MockTransport,
    config: TraversalConfig,
) -> Session<MockConnector> {
    let mut session = Session::with_config(MockConnector::new(transport.clone()), config);
    assert!(session.connect("http://localhost:5988", NAMESPACE));
    session
}
