use serde_json::{Value, json};

pub const SERVICE_ROOT_PATH: &str = "/redfish/v1";
pub const SYSTEMS_COLLECTION_PATH: &str = "/redfish/v1/Systems";
pub const SYSTEM_PATH: &str = "/redfish/v1/Systems/1";
pub const MANAGERS_COLLECTION_PATH: &str = "/redfish/v1/Managers";
pub const MANAGER_PATH: &str = "/redfish/v1/Managers/1";

/// Action target for power control. Not a catalog entry; POST only.
pub const RESET_ACTION_PATH: &str = "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset";

pub const RESET_TYPE_ALLOWABLE_VALUES: [&str; 5] = [
    "On",
    "ForceOff",
    "GracefulShutdown",
    "GracefulRestart",
    "ForceRestart",
];

/// Immutable path → document table built once at startup. Lookups strip
/// exactly one trailing slash; documents are handed out by reference and
/// never mutated after construction.
#[derive(Debug)]
pub struct ResourceCatalog {
    entries: Vec<(&'static str, Value)>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self {
            entries: vec![
                (SERVICE_ROOT_PATH, service_root()),
                (SYSTEMS_COLLECTION_PATH, systems_collection()),
                (SYSTEM_PATH, computer_system()),
                (MANAGERS_COLLECTION_PATH, managers_collection()),
                (MANAGER_PATH, manager()),
            ],
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(path, _)| *path)
    }

    /// Exact-match lookup after trailing-slash normalization. Returns the
    /// canonical path alongside the stored document.
    pub fn lookup(&self, path: &str) -> Option<(&'static str, &Value)> {
        let normalized = normalize_path(path);
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == normalized)
            .map(|(candidate, doc)| (*candidate, doc))
    }
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips exactly one trailing slash; no recursive normalization.
pub fn normalize_path(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

fn service_root() -> Value {
    json!({
        "@odata.type": "#ServiceRoot.v1_15_0.ServiceRoot",
        "@odata.id": SERVICE_ROOT_PATH,
        "Id": "RootService",
        "Name": "Mock BMC Root Service",
        "RedfishVersion": "1.15.0",
        "UUID": "00000000-0000-0000-0000-000000000001",
        "Systems": { "@odata.id": SYSTEMS_COLLECTION_PATH },
        "Managers": { "@odata.id": MANAGERS_COLLECTION_PATH },
    })
}

fn systems_collection() -> Value {
    json!({
        "@odata.type": "#ComputerSystemCollection.ComputerSystemCollection",
        "@odata.id": SYSTEMS_COLLECTION_PATH,
        "Name": "Computer System Collection",
        "Members@odata.count": 1,
        "Members": [{ "@odata.id": SYSTEM_PATH }],
    })
}

fn computer_system() -> Value {
    json!({
        "@odata.type": "#ComputerSystem.v1_20_0.ComputerSystem",
        "@odata.id": SYSTEM_PATH,
        "Id": "1",
        "Name": "Mock Bare Metal Server",
        "Manufacturer": "MockVendor",
        "Model": "PowerEdge Mock",
        "SerialNumber": "MOCK-SN-001",
        "UUID": "4c4c4544-004a-4d10-804b-b4c04f333031",
        // Placeholder; the live value is overlaid from the power state cell
        // on every read.
        "PowerState": "On",
        "Status": { "State": "Enabled", "Health": "OK" },
        "Boot": {
            "BootSourceOverrideEnabled": "Once",
            "BootSourceOverrideTarget": "Pxe",
            "BootSourceOverrideTarget@Redfish.AllowableValues": [
                "None", "Pxe", "Cd", "Hdd", "BiosSetup",
            ],
        },
        "ProcessorSummary": { "Count": 2, "Model": "Intel Xeon Mock" },
        "MemorySummary": { "TotalSystemMemoryGiB": 128 },
        "Actions": {
            "#ComputerSystem.Reset": {
                "target": RESET_ACTION_PATH,
                "ResetType@Redfish.AllowableValues": RESET_TYPE_ALLOWABLE_VALUES,
            }
        },
    })
}

fn managers_collection() -> Value {
    json!({
        "@odata.type": "#ManagerCollection.ManagerCollection",
        "@odata.id": MANAGERS_COLLECTION_PATH,
        "Name": "Manager Collection",
        "Members@odata.count": 1,
        "Members": [{ "@odata.id": MANAGER_PATH }],
    })
}

fn manager() -> Value {
    json!({
        "@odata.type": "#Manager.v1_17_0.Manager",
        "@odata.id": MANAGER_PATH,
        "Id": "1",
        "Name": "Manager",
        "ManagerType": "BMC",
        "FirmwareVersion": "1.00.00",
        "Status": { "State": "Enabled", "Health": "OK" },
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lookup_resolves_every_canonical_path() {
        let catalog = ResourceCatalog::new();
        for path in [
            SERVICE_ROOT_PATH,
            SYSTEMS_COLLECTION_PATH,
            SYSTEM_PATH,
            MANAGERS_COLLECTION_PATH,
            MANAGER_PATH,
        ] {
            let (canonical, doc) = catalog.lookup(path).unwrap();
            assert_eq!(canonical, path);
            assert_eq!(doc["@odata.id"], path);
        }
    }

    #[test]
    fn lookup_is_trailing_slash_insensitive() {
        let catalog = ResourceCatalog::new();
        for path in catalog.paths().collect::<Vec<_>>() {
            let with_slash = format!("{path}/");
            let (canonical, _) = catalog.lookup(&with_slash).unwrap();
            assert_eq!(canonical, path);
        }
    }

    #[test]
    fn lookup_strips_only_one_trailing_slash() {
        let catalog = ResourceCatalog::new();
        assert!(catalog.lookup("/redfish/v1//").is_none());
    }

    #[test]
    fn lookup_rejects_unknown_and_prefix_paths() {
        let catalog = ResourceCatalog::new();
        assert!(catalog.lookup("/redfish").is_none());
        assert!(catalog.lookup("/redfish/v1/Systems/2").is_none());
        assert!(catalog.lookup("/redfish/v1/Chassis").is_none());
        assert!(catalog.lookup(RESET_ACTION_PATH).is_none());
    }

    #[test]
    fn collections_reference_their_single_member() {
        let catalog = ResourceCatalog::new();
        let (_, systems) = catalog.lookup(SYSTEMS_COLLECTION_PATH).unwrap();
        assert_eq!(systems["Members@odata.count"], 1);
        assert_eq!(systems["Members"][0]["@odata.id"], SYSTEM_PATH);

        let (_, managers) = catalog.lookup(MANAGERS_COLLECTION_PATH).unwrap();
        assert_eq!(managers["Members@odata.count"], 1);
        assert_eq!(managers["Members"][0]["@odata.id"], MANAGER_PATH);
    }

    #[test]
    fn system_declares_reset_action_metadata() {
        let catalog = ResourceCatalog::new();
        let (_, system) = catalog.lookup(SYSTEM_PATH).unwrap();
        let action = &system["Actions"]["#ComputerSystem.Reset"];
        assert_eq!(action["target"], RESET_ACTION_PATH);
        let allowable = action["ResetType@Redfish.AllowableValues"].as_array().unwrap();
        assert_eq!(allowable.len(), RESET_TYPE_ALLOWABLE_VALUES.len());
    }

    #[test]
    fn normalize_path_strips_exactly_one_slash() {
        assert_eq!(normalize_path("/redfish/v1/"), "/redfish/v1");
        assert_eq!(normalize_path("/redfish/v1"), "/redfish/v1");
        assert_eq!(normalize_path("/redfish/v1//"), "/redfish/v1/");
    }
}
