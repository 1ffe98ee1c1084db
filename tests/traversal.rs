//! Integration tests walking a small in-memory broker through the public API.
//!
//! The broker below models a host with two logical disks, the computer system they belong to,
//! and the association instances linking them.

use std::{cell::RefCell, rc::Rc};

use cimscope::{
    codec::projector::{QUALIFIERS_KEY, VALUE_KEY},
    prelude::*,
};
use url::Url;

const NAMESPACE: &str = "root/cimv2";

#[derive(Default)]
struct BrokerState {
    instances: Vec<CimInstance>,
    classes: Vec<CimClass>,
    links: Vec<(ObjectPath, ObjectPath, CimInstance)>,
    online: bool,
}

/// A broker shared between the test and every transport opened to it.
#[derive(Clone, Default)]
struct Broker {
    state: Rc<RefCell<BrokerState>>,
}

impl Broker {
    fn new() -> Self {
        let broker = Broker::default();
        broker.state.borrow_mut().online = true;
        broker
    }

    fn with_instance(self, instance: CimInstance) -> Self {
        self.state.borrow_mut().instances.push(instance);
        self
    }

    fn with_class(self, class: CimClass) -> Self {
        self.state.borrow_mut().classes.push(class);
        self
    }

    fn with_link(self, from: ObjectPath, to: ObjectPath, association: CimInstance) -> Self {
        self.state.borrow_mut().links.push((from, to, association));
        self
    }

    fn set_online(&self, online: bool) {
        self.state.borrow_mut().online = online;
    }

    fn check(&self) -> Result<()> {
        if self.state.borrow().online {
            Ok(())
        } else {
            Err(Error::Disconnected("broker went away".to_string()))
        }
    }

    fn path_of(instance: &CimInstance) -> ObjectPath {
        cimscope::codec::path::from_instance(NAMESPACE, instance)
    }

    /// Paths linked to `path`, with the association instance linking them.
    fn linked(&self, path: &ObjectPath) -> Vec<(ObjectPath, CimInstance)> {
        self.state
            .borrow()
            .links
            .iter()
            .filter_map(|(from, to, association)| {
                if from.is_equivalent(path) {
                    Some((to.clone(), association.clone()))
                } else if to.is_equivalent(path) {
                    Some((from.clone(), association.clone()))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Key-only handle, as a broker returns from enumerations.
    fn handle(instance: &CimInstance) -> CimInstance {
        let mut handle = CimInstance::new(instance.class_name.as_str());
        for key in instance.key_properties() {
            handle.set_property(key.clone());
        }
        handle
    }
}

impl CimTransport for Broker {
    fn enumerate_namespaces(&self) -> Result<Vec<String>> {
        self.check()?;
        Ok(vec![NAMESPACE.to_string()])
    }

    fn enumerate_instance_names(
        &self,
        _namespace: &str,
        class_name: &str,
    ) -> Result<Elements<'_, ObjectPath>> {
        self.check()?;
        let paths: Vec<ObjectPath> = self
            .state
            .borrow()
            .instances
            .iter()
            .filter(|instance| instance.class_name == class_name)
            .map(Broker::path_of)
            .collect();
        Ok(Box::new(VecSource::new(paths)))
    }

    fn enumerate_instances(
        &self,
        _namespace: &str,
        class_name: &str,
        _flags: EnumerationFlags,
    ) -> Result<Elements<'_, CimInstance>> {
        self.check()?;
        let handles: Vec<CimInstance> = self
            .state
            .borrow()
            .instances
            .iter()
            .filter(|instance| instance.class_name == class_name)
            .map(Broker::handle)
            .collect();
        Ok(Box::new(VecSource::new(handles)))
    }

    fn get_instance(&self, path: &ObjectPath, _flags: EnumerationFlags) -> Result<CimInstance> {
        self.check()?;
        self.state
            .borrow()
            .instances
            .iter()
            .find(|instance| Broker::path_of(instance).is_equivalent(path))
            .cloned()
            .ok_or_else(|| Error::remote(format!("CIM_ERR_NOT_FOUND: {}", path)))
    }

    fn delete_instance(&self, path: &ObjectPath) -> Result<()> {
        self.check()?;
        let mut state = self.state.borrow_mut();
        let before = state.instances.len();
        state
            .instances
            .retain(|instance| !Broker::path_of(instance).is_equivalent(path));
        if state.instances.len() == before {
            return Err(Error::remote(format!("CIM_ERR_NOT_FOUND: {}", path)));
        }
        Ok(())
    }

    fn enumerate_class_names(
        &self,
        namespace: &str,
        class_name: &str,
        depth: DeepFlag,
    ) -> Result<Elements<'_, String>> {
        let classes =
            self.enumerate_classes(namespace, class_name, depth, EnumerationFlags::empty())?;
        let mut names = Vec::new();
        for class in EnumerationCursor::new(classes) {
            names.push(class?.name);
        }
        Ok(Box::new(VecSource::new(names)))
    }

    fn enumerate_classes(
        &self,
        _namespace: &str,
        class_name: &str,
        _depth: DeepFlag,
        _flags: EnumerationFlags,
    ) -> Result<Elements<'_, CimClass>> {
        self.check()?;
        let classes: Vec<CimClass> = self
            .state
            .borrow()
            .classes
            .iter()
            .filter(|class| class.superclass.as_deref().unwrap_or_default() == class_name)
            .cloned()
            .collect();
        Ok(Box::new(VecSource::new(classes)))
    }

    fn get_class(
        &self,
        _namespace: &str,
        class_name: &str,
        _flags: EnumerationFlags,
    ) -> Result<CimClass> {
        self.check()?;
        self.state
            .borrow()
            .classes
            .iter()
            .find(|class| class.name == class_name)
            .cloned()
            .ok_or_else(|| Error::remote(format!("CIM_ERR_INVALID_CLASS: {}", class_name)))
    }

    fn associator_names(
        &self,
        path: &ObjectPath,
        _filter: &AssociationFilter,
    ) -> Result<Elements<'_, ObjectPath>> {
        self.check()?;
        let paths: Vec<ObjectPath> = self
            .linked(path)
            .into_iter()
            .map(|(other, _)| other)
            .collect();
        Ok(Box::new(VecSource::new(paths)))
    }

    fn associators(
        &self,
        path: &ObjectPath,
        _filter: &AssociationFilter,
        _flags: EnumerationFlags,
    ) -> Result<Elements<'_, CimInstance>> {
        self.check()?;
        let handles: Vec<CimInstance> = self
            .linked(path)
            .into_iter()
            .map(|(other, _)| CimInstance::new(other.class_name.as_str()).with_path(other))
            .collect();
        Ok(Box::new(VecSource::new(handles)))
    }

    fn reference_names(
        &self,
        path: &ObjectPath,
        _filter: &ReferenceFilter,
    ) -> Result<Elements<'_, ObjectPath>> {
        self.check()?;
        let paths: Vec<ObjectPath> = self
            .linked(path)
            .iter()
            .map(|(_, association)| Broker::path_of(association))
            .collect();
        Ok(Box::new(VecSource::new(paths)))
    }

    fn references(
        &self,
        path: &ObjectPath,
        _filter: &ReferenceFilter,
        _flags: EnumerationFlags,
    ) -> Result<Elements<'_, CimInstance>> {
        self.check()?;
        let handles: Vec<CimInstance> = self
            .linked(path)
            .iter()
            .map(|(_, association)| Broker::handle(association))
            .collect();
        Ok(Box::new(VecSource::new(handles)))
    }
}

// Helper function to create a key property
fn key(name: &str, value: &str) -> Property {
    Property::new(name, value).with_qualifier(Qualifier::new(KEY_QUALIFIER, true))
}

// Helper function to create a broker with two disks on one system
fn create_broker() -> Broker {
    let system = CimInstance::new("CIM_ComputerSystem")
        .with_property(key("Name", "host1"))
        .with_property(Property::new("Dedicated", 0u16));
    let disk_c = CimInstance::new("CIM_LogicalDisk")
        .with_property(key("DeviceID", "C:"))
        .with_property(Property::new("Size", 512_000u64));
    let disk_d = CimInstance::new("CIM_LogicalDisk")
        .with_property(key("DeviceID", "D:"))
        .with_property(Property::new("Size", 1_024_000u64));

    let system_path = ObjectPath::new(NAMESPACE, "CIM_ComputerSystem").with_key("Name", "host1");
    let c_path = ObjectPath::new(NAMESPACE, "CIM_LogicalDisk").with_key("DeviceID", "C:");
    let link = CimInstance::new("CIM_SystemDevice")
        .with_property(key("GroupComponent", &system_path.to_string()))
        .with_property(key("PartComponent", &c_path.to_string()));

    Broker::new()
        .with_instance(system)
        .with_instance(disk_c)
        .with_instance(disk_d)
        .with_instance(link.clone())
        .with_link(system_path, c_path, link)
        .with_class(CimClass::new("CIM_ManagedElement"))
        .with_class(CimClass::new("CIM_LogicalElement").with_superclass("CIM_ManagedElement"))
        .with_class(
            CimClass::new("CIM_LogicalDevice")
                .with_superclass("CIM_LogicalElement")
                .with_property(
                    Property::declared("DeviceID", CimType::String)
                        .with_qualifier(Qualifier::new(KEY_QUALIFIER, true)),
                ),
        )
}

// Helper function to create a session connected to `broker`
fn connect(broker: &Broker) -> Result<Session<impl Connector>> {
    let broker = broker.clone();
    let connector = move |_url: &Url, _namespace: &str| -> Result<Box<dyn CimTransport>> {
        Ok(Box::new(broker.clone()))
    };
    let mut session = Session::new(connector);
    session.try_connect("https://broker.example:5989", NAMESPACE)?;
    Ok(session)
}

#[test]
fn test_enumerate_instance_names() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;

    let names = GraphTraversal::new(&session).enumerate_instance_names("CIM_LogicalDisk")?;
    assert_eq!(
        names,
        vec![
            r#"root/cimv2:CIM_LogicalDisk.DeviceID="C:""#.to_string(),
            r#"root/cimv2:CIM_LogicalDisk.DeviceID="D:""#.to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_enumerate_instances_fetches_full_objects() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;

    let disks = GraphTraversal::new(&session).enumerate_instances("CIM_LogicalDisk")?;
    assert_eq!(disks.len(), 2);

    let size = disks[1]["Size"].get(VALUE_KEY);
    assert_eq!(size, Some(&GenericValue::Int(1_024_000)));

    let device = &disks[0]["DeviceID"];
    assert_eq!(device.get(VALUE_KEY), Some(&GenericValue::from("C:")));
    assert_eq!(
        device
            .get(QUALIFIERS_KEY)
            .and_then(|q| q.get(KEY_QUALIFIER)),
        Some(&GenericValue::Bool(true))
    );
    Ok(())
}

#[test]
fn test_empty_result_is_not_an_error() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;

    let traversal = GraphTraversal::new(&session);
    assert!(traversal.enumerate_instance_names("CIM_Fan")?.is_empty());
    assert!(traversal.enumerate_instances("CIM_Fan")?.is_empty());
    Ok(())
}

#[test]
fn test_get_instance_by_text() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;

    let system =
        GraphTraversal::new(&session).get_instance(r#"CIM_ComputerSystem.Name="host1""#)?;
    assert_eq!(
        system["Name"].get(VALUE_KEY),
        Some(&GenericValue::from("host1"))
    );
    assert_eq!(
        system["Dedicated"].get(VALUE_KEY),
        Some(&GenericValue::Int(0))
    );
    Ok(())
}

#[test]
fn test_get_instance_errors() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;
    let traversal = GraphTraversal::new(&session);

    assert!(matches!(
        traversal.get_instance("CIM_LogicalDisk.DeviceID="),
        Err(Error::MalformedPath { .. })
    ));
    assert!(matches!(
        traversal.get_instance(r#"CIM_LogicalDisk.DeviceID="Z:""#),
        Err(Error::RemoteProtocol { .. })
    ));
    Ok(())
}

#[test]
fn test_class_hierarchy() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;
    let traversal = GraphTraversal::new(&session);

    assert_eq!(
        traversal.enumerate_class_names("", DeepFlag::Shallow)?,
        vec!["CIM_ManagedElement".to_string()]
    );
    assert_eq!(
        traversal.enumerate_class_names("CIM_LogicalElement", DeepFlag::Shallow)?,
        vec!["CIM_LogicalDevice".to_string()]
    );

    let devices = traversal.enumerate_classes("CIM_LogicalElement", DeepFlag::Shallow)?;
    assert_eq!(devices.len(), 1);
    assert_eq!(
        devices[0]["DeviceID"].get(VALUE_KEY),
        Some(&GenericValue::Void)
    );

    let device = traversal.get_class("CIM_LogicalDevice")?;
    assert!(device.contains_key("DeviceID"));
    Ok(())
}

#[test]
fn test_associations_and_references() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;
    let traversal = GraphTraversal::new(&session);
    let disk = ObjectPath::new(NAMESPACE, "CIM_LogicalDisk").with_key("DeviceID", "C:");

    let filter = AssociationFilter::new().assoc_class("CIM_SystemDevice");
    assert_eq!(
        traversal.associator_names(&disk, &filter)?,
        vec![r#"root/cimv2:CIM_ComputerSystem.Name="host1""#.to_string()]
    );

    let systems = traversal.associators(&disk, &filter)?;
    assert_eq!(systems.len(), 1);
    assert_eq!(
        systems[0]["Name"].get(VALUE_KEY),
        Some(&GenericValue::from("host1"))
    );

    let references = traversal.reference_names(&disk, &ReferenceFilter::new())?;
    assert_eq!(references.len(), 1);
    assert!(references[0].starts_with("root/cimv2:CIM_SystemDevice."));

    let links = traversal.references(&disk, &ReferenceFilter::new())?;
    assert_eq!(links.len(), 1);
    assert!(links[0].contains_key("PartComponent"));

    let d_drive = ObjectPath::new(NAMESPACE, "CIM_LogicalDisk").with_key("DeviceID", "D:");
    assert!(traversal.associator_names(&d_drive, &filter)?.is_empty());
    Ok(())
}

#[test]
fn test_delete_instance() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;
    let traversal = GraphTraversal::new(&session);

    assert!(traversal.delete_instance(r#"CIM_LogicalDisk.DeviceID="D:""#)?);
    assert!(!traversal.delete_instance(r#"CIM_LogicalDisk.DeviceID="D:""#)?);
    assert_eq!(
        traversal.enumerate_instance_names("CIM_LogicalDisk")?.len(),
        1
    );
    Ok(())
}

#[test]
fn test_unavailable_broker() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;
    broker.set_online(false);

    let traversal = GraphTraversal::new(&session);
    assert!(!session.is_available());
    assert!(matches!(
        traversal.enumerate_instance_names("CIM_LogicalDisk"),
        Err(Error::Unavailable)
    ));
    assert!(matches!(
        traversal.get_class("CIM_LogicalDevice"),
        Err(Error::Unavailable)
    ));

    broker.set_online(true);
    assert_eq!(
        traversal.enumerate_instance_names("CIM_LogicalDisk")?.len(),
        2
    );
    Ok(())
}

#[test]
fn test_connect_to_offline_broker() {
    let broker = create_broker();
    broker.set_online(false);

    let cloned = broker.clone();
    let connector = move |_url: &Url, _namespace: &str| -> Result<Box<dyn CimTransport>> {
        Ok(Box::new(cloned.clone()))
    };
    let mut session = Session::new(connector);
    assert!(!session.connect("http://localhost:5988", NAMESPACE));
    assert!(!session.is_connected());
    assert!(matches!(
        session.try_connect("not a url", NAMESPACE),
        Err(Error::InvalidUrl(_))
    ));
}

#[test]
fn test_create_object_path_without_session() -> Result<()> {
    let mut keys = GenericMap::new();
    keys.insert("DeviceID".to_string(), GenericValue::from("C:"));
    keys.insert("Index".to_string(), GenericValue::Int(3));

    assert_eq!(
        create_object_path(NAMESPACE, "CIM_LogicalDisk", &keys)?,
        r#"root/cimv2:CIM_LogicalDisk.DeviceID="C:",Index="3""#
    );
    Ok(())
}

#[test]
fn test_dispatcher_round_trip() -> Result<()> {
    let broker = create_broker();
    let session = connect(&broker)?;
    let mut dispatcher = Dispatcher::new(session);

    let names = dispatcher.call(
        "EnumerateInstanceNames",
        &[GenericValue::from("CIM_LogicalDisk")],
    )?;
    let first = names
        .as_list()
        .and_then(|list| list.first())
        .and_then(GenericValue::as_str)
        .map(str::to_string)
        .unwrap_or_default();

    let disk = dispatcher.call("GetInstance", &[GenericValue::from(first)])?;
    assert_eq!(
        disk.get("DeviceID").and_then(|p| p.get(VALUE_KEY)),
        Some(&GenericValue::from("C:"))
    );
    assert_eq!(dispatcher.last_error(), "");

    assert!(dispatcher.call("NoSuchOperation", &[]).is_err());
    let last = dispatcher.call("LastError", &[])?;
    assert!(last
        .as_str()
        .is_some_and(|message| message.contains("NoSuchOperation")));
    Ok(())
}
